use crate::utils::now;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub struct TagId(u64);

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TagId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<TagId> for u64 {
    fn from(value: TagId) -> Self {
        value.0
    }
}

/// A display string for a tag, guaranteed non-empty.
///
/// Uniqueness is not enforced anywhere. Two tags may carry the same label and
/// remain distinct records with distinct ids.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagLabel(String);

impl TagLabel {
    pub fn new(label: impl Into<String>) -> Result<Self, InvalidLabelError> {
        let label = label.into();
        if label.trim().is_empty() {
            Err(InvalidLabelError)
        } else {
            Ok(Self(label))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagLabel {
    type Error = InvalidLabelError;

    fn try_from(value: String) -> Result<Self, InvalidLabelError> {
        Self::new(value)
    }
}

impl std::str::FromStr for TagLabel {
    type Err = InvalidLabelError;

    fn from_str(s: &str) -> Result<Self, InvalidLabelError> {
        Self::new(s)
    }
}

impl From<TagLabel> for String {
    fn from(value: TagLabel) -> Self {
        value.0
    }
}

impl std::fmt::Display for TagLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("tag labels must contain at least one non-whitespace character")]
pub struct InvalidLabelError;

/// A named label, independent of whatever it is attached to.
///
/// Tags are created on their own and referenced from associations by id only.
/// Deleting a tag cascades over its associations; see
/// [`TagIndex::delete_tag`](crate::TagIndex::delete_tag).
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    label: TagLabel,
    created_at: NaiveDateTime,
}

impl Tag {
    pub(crate) fn new(id: TagId, label: TagLabel) -> Self {
        Self {
            id,
            label,
            created_at: now(),
        }
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn label(&self) -> &TagLabel {
        &self.label
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}
