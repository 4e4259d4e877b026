//! Entity identifier and allocation utilities.
//!
//! An [`EntityId`] is a lightweight `u32` handle with no inherent data. IDs
//! are handed out by an [`EntityAllocator`] in strictly increasing order and
//! are never reused within one simulation run.

use crate::error::SimError;

/// A unique entity identifier.
///
/// Entities are pure identifiers: they carry no data of their own. Components
/// attached through the [`Directory`](crate::Directory) give them meaning.
/// Removing every component of an entity leaves the ID "empty" but still
/// nominally valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Sentinel marking an empty dense slot. Never handed out by the allocator.
    pub const NONE: EntityId = EntityId(u32::MAX);

    /// Create an entity ID from a raw `u32`.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` identifier.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the ID as an index into a sparse array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` unless this is the [`EntityId::NONE`] sentinel.
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity IDs, starting at 0.
///
/// There is no free list: an ID, once issued, is never issued again. When
/// the counter reaches the sentinel value the allocator reports
/// [`SimError::EntityIdsExhausted`] instead of wrapping.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next_id: u32,
}

impl EntityAllocator {
    /// Creates a new allocator. The first ID issued is `0`.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Allocates a fresh entity ID.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EntityIdsExhausted`] once every non-sentinel ID
    /// has been issued.
    pub fn allocate(&mut self) -> Result<EntityId, SimError> {
        if self.next_id == EntityId::NONE.0 {
            return Err(SimError::EntityIdsExhausted);
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(EntityId(id))
    }

    /// Returns the number of entity IDs allocated so far.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.next_id
    }
}
