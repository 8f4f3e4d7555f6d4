/// A domain type whose instances can carry tags.
///
/// Implementing this trait does not change the type's own storage in any way.
/// It only names the kind under which the type is declared in a
/// [`KindRegistry`](crate::KindRegistry), so callers can resolve a kind from a
/// typed value instead of a string.
pub trait Taggable {
    /// Stable kind name, e.g. `"product"`.
    fn kind() -> &'static str;
}
