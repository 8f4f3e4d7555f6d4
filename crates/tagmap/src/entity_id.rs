use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a tagged instance within its own kind's store.
///
/// The value is always positive. The index never checks that the id names a
/// live entity in the owning kind's store; a dangling id is permitted and
/// simply matches nothing in queries.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct EntityId(u64);

impl EntityId {
    pub fn new(value: u64) -> Result<Self, InvalidEntityIdError> {
        if value == 0 {
            Err(InvalidEntityIdError(0))
        } else {
            Ok(Self(value))
        }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for EntityId {
    type Error = InvalidEntityIdError;

    fn try_from(value: u64) -> Result<Self, InvalidEntityIdError> {
        Self::new(value)
    }
}

impl TryFrom<i64> for EntityId {
    type Error = InvalidEntityIdError;

    fn try_from(value: i64) -> Result<Self, InvalidEntityIdError> {
        if value < 1 {
            Err(InvalidEntityIdError(value))
        } else {
            Ok(Self(value as u64))
        }
    }
}

impl From<EntityId> for u64 {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("entity ids must be positive, got {0}")]
pub struct InvalidEntityIdError(pub i64);
