use crate::index_error::IndexError;
use crate::tag::{Tag, TagId, TagLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CRUD storage for [`Tag`] records, keyed by id.
///
/// Ids are assigned from a monotone counter starting at 1 and never reused.
/// Deleting a tag here removes only the record itself; cascading over its
/// associations is the job of the owning [`TagIndex`](crate::TagIndex).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagStore {
    tags: BTreeMap<TagId, Tag>,
    next_id: u64,
}

impl TagStore {
    pub fn create(&mut self, label: TagLabel) -> TagId {
        self.next_id += 1;
        let id = TagId::from(self.next_id);
        self.tags.insert(id, Tag::new(id, label));
        id
    }

    pub fn get(&self, id: TagId) -> Result<&Tag, IndexError> {
        self.tags.get(&id).ok_or(IndexError::TagNotFound(id))
    }

    pub fn delete(&mut self, id: TagId) -> Result<Tag, IndexError> {
        self.tags.remove(&id).ok_or(IndexError::TagNotFound(id))
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.tags.contains_key(&id)
    }

    /// All tags in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
