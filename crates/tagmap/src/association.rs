use crate::entity_id::EntityId;
use crate::registry::EntityTypeRef;
use crate::tag::TagId;
use crate::utils::now;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub struct AssociationId(u64);

impl std::fmt::Display for AssociationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AssociationId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<AssociationId> for u64 {
    fn from(value: AssociationId) -> Self {
        value.0
    }
}

/// One record binding a tag to an (entity kind, entity id) pair.
///
/// The tag is referenced by id, not held by value. Many associations may
/// reference the same tag, and many may reference the same entity pair; there
/// is no uniqueness constraint across (tag, entity_type, entity_id).
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Association {
    id: AssociationId,
    tag: TagId,
    entity_type: EntityTypeRef,
    entity_id: EntityId,
    created_at: NaiveDateTime,
}

impl Association {
    pub(crate) fn new(
        id: AssociationId,
        tag: TagId,
        entity_type: EntityTypeRef,
        entity_id: EntityId,
    ) -> Self {
        Self {
            id,
            tag,
            entity_type,
            entity_id,
            created_at: now(),
        }
    }

    pub fn id(&self) -> AssociationId {
        self.id
    }

    pub fn tag(&self) -> TagId {
        self.tag
    }

    pub fn entity_type(&self) -> EntityTypeRef {
        self.entity_type
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}
