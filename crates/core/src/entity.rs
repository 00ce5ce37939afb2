//! Identity of stored records.

/// A record whose identity survives changes to its other fields.
///
/// Stores key on `Entity::id`, and two values with the same id describe the
/// same record at different points in time.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;
}
