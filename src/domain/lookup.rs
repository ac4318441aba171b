//! Find-or-create addressing
//!
//! Incoming projections carry an optional identifier. An absent identifier asks
//! for a new entity; a present one names an existing entity that must be found
//! and, for children of a book store, validated against that store.

/// How a save request addresses its target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// No identifier was supplied: create a new entity.
    Create,
    /// Update the entity with this identifier.
    Existing(i64),
}

impl From<Option<i64>> for Lookup {
    fn from(id: Option<i64>) -> Self {
        match id {
            Some(id) => Lookup::Existing(id),
            None => Lookup::Create,
        }
    }
}
