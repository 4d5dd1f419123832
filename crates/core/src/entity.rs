//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Implementors are looked up, patched and removed by their identifier; the
/// identifier itself never changes once the entity exists.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
