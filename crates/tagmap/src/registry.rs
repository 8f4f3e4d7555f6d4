use crate::index_error::IndexError;
use crate::taggable::Taggable;
use serde::{Deserialize, Serialize};

/// Stable storage key for "what kind of thing is tagged".
///
/// Values are assigned by a [`KindRegistry`] in declaration order, so the
/// mapping from kind name to ref is deterministic for a given configuration.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub struct EntityTypeRef(u32);

impl std::fmt::Display for EntityTypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Explicit table of every entity kind a deployment intends to tag.
///
/// There is no implicit or global registration: a kind must be declared here
/// before anything of that kind can be tagged, and resolving an undeclared
/// kind is an error. Resolution is a pure lookup with no side effects.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindRegistry {
    kinds: Vec<String>,
}

impl KindRegistry {
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for kind in kinds {
            registry.register(kind);
        }
        registry
    }

    /// Declare a kind. Declaring the same name twice keeps its original ref.
    pub fn register(&mut self, kind: impl Into<String>) -> EntityTypeRef {
        let kind = kind.into();
        if let Some(existing) = self.position(&kind) {
            return existing;
        }
        self.kinds.push(kind);
        EntityTypeRef((self.kinds.len() - 1) as u32)
    }

    fn position(&self, kind: &str) -> Option<EntityTypeRef> {
        self.kinds
            .iter()
            .position(|known| known == kind)
            .map(|index| EntityTypeRef(index as u32))
    }

    pub fn resolve(&self, kind: &str) -> Result<EntityTypeRef, IndexError> {
        self.position(kind).ok_or_else(|| IndexError::UnknownEntityKind {
            kind: kind.to_owned(),
        })
    }

    pub fn resolve_of<T: Taggable>(&self) -> Result<EntityTypeRef, IndexError> {
        self.resolve(T::kind())
    }

    /// Reverse lookup for display purposes.
    pub fn name_of(&self, type_ref: EntityTypeRef) -> Option<&str> {
        self.kinds.get(type_ref.0 as usize).map(String::as_str)
    }

    /// All declared kind names, in [`EntityTypeRef`] order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
