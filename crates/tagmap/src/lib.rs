//! # Tagmap
//! A library for attaching labels ("tags") to instances of any entity kind
//! without per-kind join tables. Entity owners keep their own storage and
//! identifiers; the index only records (tag, kind, id) triples and never
//! inspects the entities themselves.
//! # Quickstart
//! Build a [`KindRegistry`] listing every kind your deployment intends to tag,
//! wrap it in a [`TagIndex`] and start attaching:
//! ```
//! use tagmap::{KindRegistry, TagIndex, TagLabel};
//!
//! let mut index = TagIndex::new(KindRegistry::new(["product", "article"]));
//! let sale = index.create_tag(TagLabel::new("sale")?);
//! index.attach(sale, "product", 42)?;
//! assert_eq!(index.tags_for("product", 42)?.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod association;
pub mod catalog;
mod entity_id;
mod index_error;
mod registry;
mod tag;
mod tag_index;
mod tag_store;
mod taggable;
mod utils;

pub use association::Association;
pub use association::AssociationId;
pub use entity_id::EntityId;
pub use entity_id::InvalidEntityIdError;
pub use index_error::IndexError;
pub use registry::EntityTypeRef;
pub use registry::KindRegistry;
pub use tag::InvalidLabelError;
pub use tag::Tag;
pub use tag::TagId;
pub use tag::TagLabel;
#[doc(inline)]
pub use tag_index::TagIndex;
pub use tag_index::{DbReadError, DbWriteError};
pub use tag_store::TagStore;
pub use taggable::Taggable;
