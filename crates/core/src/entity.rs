//! Entity trait: identity of a persisted tenancy row.

/// Entity marker + minimal interface.
///
/// Implemented by every row type of the tenancy graph so generic code
/// (listings, seeding) can key rows without knowing their concrete type.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
