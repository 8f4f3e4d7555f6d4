use crate::association::AssociationId;
use crate::entity_id::InvalidEntityIdError;
use crate::tag::TagId;
use thiserror::Error;

/// Per-call failures surfaced by [`TagIndex`](crate::TagIndex) operations.
///
/// None of these are fatal; every failure leaves the index unchanged and the
/// caller free to retry or give up. Note that `attach` is not idempotent, so
/// blindly retrying it after an ambiguous outcome can create duplicates.
#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum IndexError {
    #[error("entity kind `{kind}` is not declared in the registry")]
    UnknownEntityKind { kind: String },

    #[error("no tag with id {0}")]
    TagNotFound(TagId),

    #[error("no association with id {0}")]
    AssociationNotFound(AssociationId),

    #[error(transparent)]
    InvalidEntityId(#[from] InvalidEntityIdError),
}
