//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// True when `other` refers to the same entity, regardless of attribute values.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
