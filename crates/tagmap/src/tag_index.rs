use crate::association::{Association, AssociationId};
use crate::entity_id::EntityId;
use crate::index_error::IndexError;
use crate::registry::{EntityTypeRef, KindRegistry};
use crate::tag::{Tag, TagId, TagLabel};
use crate::tag_store::TagStore;
use crate::taggable::Taggable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// The lookup component over tags and their associations.
///
/// A `TagIndex` owns the association store, the [`TagStore`] and the
/// [`KindRegistry`] it resolves kinds against. Entity owners call
/// [`attach`](Self::attach) and [`tags_for`](Self::tags_for) with their own
/// kind name and numeric id; the index never validates that the id names a
/// live entity, so dangling associations are possible and are not an error.
///
/// Association ids grow monotonically and the store iterates in id order, so
/// query results keep insertion order and are stable across repeated calls
/// absent mutation.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagIndex {
    registry: KindRegistry,
    tags: TagStore,
    associations: BTreeMap<AssociationId, Association>,
    next_association_id: u64,
}

impl TagIndex {
    pub fn new(registry: KindRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    pub fn create_tag(&mut self, label: TagLabel) -> TagId {
        let id = self.tags.create(label);
        debug!("created tag {id}");
        id
    }

    pub fn get_tag(&self, id: TagId) -> Result<&Tag, IndexError> {
        self.tags.get(id)
    }

    /// Delete a tag and every association referencing it, in one step.
    ///
    /// Returns the number of associations that were cascaded away. Succeeds
    /// even when the tag has no associations.
    pub fn delete_tag(&mut self, id: TagId) -> Result<usize, IndexError> {
        self.tags.delete(id)?;
        let before = self.associations.len();
        self.associations.retain(|_, association| association.tag() != id);
        let cascaded = before - self.associations.len();
        info!("deleted tag {id} and cascaded {cascaded} associations");
        Ok(cascaded)
    }

    /// Attach a tag to a (kind, entity id) pair.
    ///
    /// Attaching the same tag to the same entity twice creates two records;
    /// there is deliberately no deduplication. Callers wanting set semantics
    /// must check [`tags_for`](Self::tags_for) before attaching. A failed
    /// attach creates no record.
    pub fn attach(
        &mut self,
        tag: TagId,
        kind: &str,
        entity_id: u64,
    ) -> Result<AssociationId, IndexError> {
        let entity_type = self.registry.resolve(kind)?;
        let entity_id = EntityId::new(entity_id)?;
        if !self.tags.contains(tag) {
            return Err(IndexError::TagNotFound(tag));
        }
        self.next_association_id += 1;
        let id = AssociationId::from(self.next_association_id);
        self.associations
            .insert(id, Association::new(id, tag, entity_type, entity_id));
        debug!("attached tag {tag} to {kind}/{entity_id} as association {id}");
        Ok(id)
    }

    pub fn attach_to<T: Taggable>(
        &mut self,
        tag: TagId,
        entity_id: u64,
    ) -> Result<AssociationId, IndexError> {
        self.attach(tag, T::kind(), entity_id)
    }

    /// Remove a single association.
    pub fn detach(&mut self, id: AssociationId) -> Result<Association, IndexError> {
        let removed = self
            .associations
            .remove(&id)
            .ok_or(IndexError::AssociationNotFound(id))?;
        debug!("detached association {id}");
        Ok(removed)
    }

    /// All associations for a (kind, entity id) pair, each pre-joined with
    /// its tag so callers never do a second lookup per association.
    ///
    /// An entity with no attachments yields an empty vec, not an error, and
    /// the entity id is not checked against the owning kind's store. Only an
    /// undeclared kind fails.
    pub fn tags_for(
        &self,
        kind: &str,
        entity_id: u64,
    ) -> Result<Vec<(&Association, &Tag)>, IndexError> {
        let entity_type = self.registry.resolve(kind)?;
        Ok(self
            .associations
            .values()
            .filter(|association| {
                association.entity_type() == entity_type
                    && u64::from(association.entity_id()) == entity_id
            })
            // every stored association references a live tag (delete_tag
            // cascades), so this join lookup cannot miss
            .filter_map(|association| {
                self.tags
                    .get(association.tag())
                    .ok()
                    .map(|tag| (association, tag))
            })
            .collect())
    }

    pub fn tags_for_value<T: Taggable>(
        &self,
        entity_id: u64,
    ) -> Result<Vec<(&Association, &Tag)>, IndexError> {
        self.tags_for(T::kind(), entity_id)
    }

    /// All (kind, entity id) pairs carrying a tag, in attachment order.
    pub fn entities_for(&self, tag: TagId) -> Result<Vec<(EntityTypeRef, EntityId)>, IndexError> {
        if !self.tags.contains(tag) {
            return Err(IndexError::TagNotFound(tag));
        }
        Ok(self
            .associations
            .values()
            .filter(|association| association.tag() == tag)
            .map(|association| (association.entity_type(), association.entity_id()))
            .collect())
    }

    pub fn association(&self, id: AssociationId) -> Result<&Association, IndexError> {
        self.associations
            .get(&id)
            .ok_or(IndexError::AssociationNotFound(id))
    }

    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.values()
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    pub fn create_from_db(db: &Path) -> Result<Self, DbReadError> {
        Ok(serde_json::from_str(&std::fs::read_to_string(db)?)?)
    }

    pub fn save_to_db(&self, db: &Path) -> Result<(), DbWriteError> {
        let mut file = File::create(db)?;
        let json_text = serde_json::to_string(self)?;
        file.write_all(json_text.as_bytes())?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum DbReadError {
    #[error("fs error")]
    FSError(#[from] std::io::Error),

    #[error("json error")]
    JSONError(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum DbWriteError {
    #[error("fs error")]
    FSError(#[from] std::io::Error),

    #[error("json error")]
    JSONError(#[from] serde_json::Error),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entity_id::InvalidEntityIdError;

    pub(crate) fn label(text: &str) -> TagLabel {
        TagLabel::new(text).unwrap()
    }

    pub(crate) fn storefront_index() -> TagIndex {
        TagIndex::new(KindRegistry::new(["product", "article"]))
    }

    struct Product;

    impl Taggable for Product {
        fn kind() -> &'static str {
            "product"
        }
    }

    mod test_attach {
        use super::*;

        #[track_caller]
        fn check_tag_count(index: &TagIndex, entity_id: u64, count: usize) {
            assert_eq!(index.tags_for("product", entity_id).unwrap().len(), count);
        }

        #[test]
        fn attach_adds_one_entry() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            check_tag_count(&index, 42, 0);
            index.attach(sale, "product", 42).unwrap();
            check_tag_count(&index, 42, 1);
        }

        #[test]
        fn attach_twice_yields_two_entries() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            index.attach(sale, "product", 42).unwrap();
            index.attach(sale, "product", 42).unwrap();
            let tags = index.tags_for("product", 42).unwrap();
            assert_eq!(tags.len(), 2);
            assert!(tags.iter().all(|(_, tag)| tag.id() == sale));
        }

        #[test]
        fn attach_with_zero_entity_id_fails_and_creates_nothing() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            assert_eq!(
                index.attach(sale, "product", 0),
                Err(IndexError::InvalidEntityId(InvalidEntityIdError(0)))
            );
            assert_eq!(index.association_count(), 0);
        }

        #[test]
        fn attach_with_unknown_kind_fails_and_creates_nothing() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            assert_eq!(
                index.attach(sale, "video", 42),
                Err(IndexError::UnknownEntityKind {
                    kind: "video".to_owned()
                })
            );
            assert_eq!(index.association_count(), 0);
        }

        #[test]
        fn attach_with_missing_tag_fails_and_creates_nothing() {
            let mut index = storefront_index();
            let missing = TagId::from(99);
            assert_eq!(
                index.attach(missing, "product", 42),
                Err(IndexError::TagNotFound(missing))
            );
            assert_eq!(index.association_count(), 0);
        }

        #[test]
        fn typed_attach_matches_string_attach() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            index.attach_to::<Product>(sale, 42).unwrap();
            check_tag_count(&index, 42, 1);
        }
    }

    mod test_queries {
        use super::*;

        #[test]
        fn untagged_entity_yields_empty_not_error() {
            let index = storefront_index();
            assert!(index.tags_for("product", 9999).unwrap().is_empty());
        }

        #[test]
        fn query_does_not_validate_entity_existence() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            // 9999 does not exist in any product store; the index doesn't care
            index.attach(sale, "product", 9999).unwrap();
            assert_eq!(index.tags_for("product", 9999).unwrap().len(), 1);
        }

        #[test]
        fn query_with_unknown_kind_is_an_error() {
            let index = storefront_index();
            assert_eq!(
                index.tags_for("video", 1),
                Err(IndexError::UnknownEntityKind {
                    kind: "video".to_owned()
                })
            );
        }

        #[test]
        fn results_keep_insertion_order() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            let featured = index.create_tag(label("featured"));
            index.attach(featured, "product", 7).unwrap();
            index.attach(sale, "product", 7).unwrap();
            let tags = index.tags_for("product", 7).unwrap();
            let labels: Vec<&str> = tags.iter().map(|(_, tag)| tag.label().as_str()).collect();
            assert_eq!(labels, vec!["featured", "sale"]);
        }

        #[test]
        fn same_id_under_other_kind_is_invisible() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            index.attach(sale, "product", 42).unwrap();
            assert!(index.tags_for("article", 42).unwrap().is_empty());
        }

        #[test]
        fn entities_for_lists_all_pairs() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            index.attach(sale, "product", 42).unwrap();
            index.attach(sale, "article", 7).unwrap();
            let entities = index.entities_for(sale).unwrap();
            assert_eq!(entities.len(), 2);
            let kinds: Vec<&str> = entities
                .iter()
                .filter_map(|(type_ref, _)| index.registry().name_of(*type_ref))
                .collect();
            assert_eq!(kinds, vec!["product", "article"]);
        }

        #[test]
        fn entities_for_unused_tag_is_empty() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            assert!(index.entities_for(sale).unwrap().is_empty());
        }

        #[test]
        fn entities_for_missing_tag_is_not_found() {
            let index = storefront_index();
            let missing = TagId::from(3);
            assert_eq!(
                index.entities_for(missing),
                Err(IndexError::TagNotFound(missing))
            );
        }
    }

    mod test_delete_and_detach {
        use super::*;

        #[test]
        fn delete_tag_cascades_over_associations() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            index.attach(sale, "product", 42).unwrap();
            index.attach(sale, "product", 42).unwrap();
            index.attach(sale, "article", 7).unwrap();
            assert_eq!(index.delete_tag(sale).unwrap(), 3);
            assert!(index.tags_for("product", 42).unwrap().is_empty());
            assert!(index.tags_for("article", 7).unwrap().is_empty());
        }

        #[test]
        fn delete_tag_leaves_other_tags_alone() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            let featured = index.create_tag(label("featured"));
            index.attach(sale, "product", 42).unwrap();
            index.attach(featured, "product", 42).unwrap();
            index.delete_tag(sale).unwrap();
            let tags = index.tags_for("product", 42).unwrap();
            assert_eq!(tags.len(), 1);
            assert_eq!(tags[0].1.id(), featured);
        }

        #[test]
        fn delete_tag_without_associations_succeeds() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            assert_eq!(index.delete_tag(sale).unwrap(), 0);
        }

        #[test]
        fn delete_missing_tag_is_not_found() {
            let mut index = storefront_index();
            let missing = TagId::from(12);
            assert_eq!(
                index.delete_tag(missing),
                Err(IndexError::TagNotFound(missing))
            );
        }

        #[test]
        fn detach_removes_exactly_one_record() {
            let mut index = storefront_index();
            let sale = index.create_tag(label("sale"));
            let first = index.attach(sale, "product", 42).unwrap();
            index.attach(sale, "product", 42).unwrap();
            index.detach(first).unwrap();
            assert_eq!(index.tags_for("product", 42).unwrap().len(), 1);
        }

        #[test]
        fn detach_missing_association_is_not_found() {
            let mut index = storefront_index();
            let missing = AssociationId::from(5);
            assert_eq!(
                index.detach(missing),
                Err(IndexError::AssociationNotFound(missing))
            );
        }
    }
}
