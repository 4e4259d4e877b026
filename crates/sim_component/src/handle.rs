//! Entity handles: an entity ID bound to the directory it lives in.
//!
//! [`EntityRef`] only reads. [`EntityMut`] can also attach and remove
//! components. Both are `Copy` and borrow the directory, not a pool, so they
//! can be kept across soft removals.

use std::cell::{Ref, RefMut};

use crate::component::Component;
use crate::directory::Directory;
use crate::entity::EntityId;
use crate::error::SimResult;

/// Read-only handle to one entity.
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    id: EntityId,
    directory: &'a Directory,
}

impl<'a> EntityRef<'a> {
    pub(crate) fn new(id: EntityId, directory: &'a Directory) -> Self {
        Self { id, directory }
    }

    /// The entity ID.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns `true` iff the entity has a live `T`.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.directory.has::<T>(self.id)
    }

    /// Shared access to the entity's `T`.
    ///
    /// # Errors
    ///
    /// [`SimError::NoComponent`](crate::SimError::NoComponent) if the entity
    /// has no `T`, or a borrow conflict with an open mutable pass over `T`.
    pub fn get<T: Component>(&self) -> SimResult<Ref<'a, T>> {
        self.directory.get::<T>(self.id)
    }
}

impl std::fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityRef").field(&self.id).finish()
    }
}

/// Mutable handle to one entity.
#[derive(Clone, Copy)]
pub struct EntityMut<'a> {
    id: EntityId,
    directory: &'a Directory,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(id: EntityId, directory: &'a Directory) -> Self {
        Self { id, directory }
    }

    /// The entity ID.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns `true` iff the entity has a live `T`.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.directory.has::<T>(self.id)
    }

    /// Shared access to the entity's `T`.
    ///
    /// # Errors
    ///
    /// See [`EntityRef::get`].
    pub fn get<T: Component>(&self) -> SimResult<Ref<'a, T>> {
        self.directory.get::<T>(self.id)
    }

    /// Exclusive access to the entity's `T`.
    ///
    /// # Errors
    ///
    /// [`SimError::NoComponent`](crate::SimError::NoComponent) if the entity
    /// has no `T`, or a borrow conflict with an open pass over `T`.
    pub fn get_mut<T: Component>(&self) -> SimResult<RefMut<'a, T>> {
        self.directory.get_mut::<T>(self.id)
    }

    /// Attach `value`, overwriting an existing `T`. Returns the handle so
    /// attaches can be chained.
    ///
    /// ```rust
    /// # use sim_component::{Component, Directory, EntityId};
    /// # struct Position(i32, i32);
    /// # impl Component for Position {}
    /// # struct Speed(i32);
    /// # impl Component for Speed {}
    /// # fn main() -> Result<(), sim_component::SimError> {
    /// let directory = Directory::new();
    /// directory
    ///     .entity_mut(EntityId::from_raw(0))
    ///     .attach(Position(0, 0))?
    ///     .attach(Speed(2))?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// A borrow conflict if a view pass over `T` is open, or a full
    /// directory when `T` is new.
    pub fn attach<T: Component>(self, value: T) -> SimResult<Self> {
        self.directory.attach(self.id, value)?;
        Ok(self)
    }

    /// Soft-remove the entity's `T`. Returns `true` if it had one.
    pub fn detach<T: Component>(self) -> bool {
        self.directory.detach::<T>(self.id)
    }

    /// Soft-remove the entity from every pool.
    pub fn remove(self) {
        self.directory.remove(self.id);
    }

    /// Downgrade to a read-only handle.
    #[must_use]
    pub fn downgrade(&self) -> EntityRef<'a> {
        EntityRef::new(self.id, self.directory)
    }
}

impl<'a> From<EntityMut<'a>> for EntityRef<'a> {
    fn from(entity: EntityMut<'a>) -> Self {
        entity.downgrade()
    }
}

impl std::fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityMut").field(&self.id).finish()
    }
}
