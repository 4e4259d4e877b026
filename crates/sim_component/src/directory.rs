//! The pool directory: one [`Pool`] per component type.
//!
//! The directory maps each component type to a small sequential
//! [`ComponentTypeId`] and owns the pool for that type. Pools are created
//! either by [`Directory::register`] at startup, in declaration order, or
//! lazily the first time a type is attached or viewed. Once created, a pool
//! lives as long as the directory.
//!
//! Everything takes `&self`. Pool slots are append-only [`OnceCell`]s, so a
//! `&Pool<T>` handed out by the directory stays valid while new component
//! types keep being registered behind it.

use std::any::TypeId;
use std::cell::{OnceCell, Ref, RefCell, RefMut};
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::component::{Component, ComponentTypeId};
use crate::entity::EntityId;
use crate::error::{SimError, SimResult};
use crate::handle::{EntityMut, EntityRef};
use crate::pool::{AnyPool, Pool};
use crate::query::Query;
use crate::view::{View, ViewMut};

/// Number of component type slots in a directory built with
/// [`Directory::new`].
pub const DEFAULT_COMPONENT_CAPACITY: usize = 64;

/// Owner of every component pool of a simulation.
pub struct Directory {
    by_type: RefCell<HashMap<TypeId, ComponentTypeId>>,
    pools: Box<[OnceCell<Box<dyn AnyPool>>]>,
}

impl Directory {
    /// Create a directory with room for [`DEFAULT_COMPONENT_CAPACITY`]
    /// component types.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_COMPONENT_CAPACITY)
    }

    /// Create a directory with room for `capacity` component types.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_type: RefCell::new(HashMap::new()),
            pools: (0..capacity).map(|_| OnceCell::new()).collect(),
        }
    }

    /// Maximum number of component types this directory can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pools.len()
    }

    /// Number of component types registered so far.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.by_type.borrow().len()
    }

    /// Register `T` and create its pool. Idempotent: a type that is already
    /// known keeps its ID.
    ///
    /// # Errors
    ///
    /// [`SimError::TooManyComponentTypes`] once every slot is taken.
    pub fn register<T: Component>(&self) -> SimResult<ComponentTypeId> {
        if let Some(id) = self.type_id_of::<T>() {
            return Ok(id);
        }
        let mut by_type = self.by_type.borrow_mut();
        let full = SimError::TooManyComponentTypes {
            capacity: self.capacity(),
        };
        let next = by_type.len();
        let Ok(raw) = u32::try_from(next) else {
            return Err(full);
        };
        let Some(slot) = self.pools.get(next) else {
            return Err(full);
        };
        slot.get_or_init(|| Box::new(Pool::<T>::new()));
        let id = ComponentTypeId(raw);
        by_type.insert(TypeId::of::<T>(), id);
        debug!(component = T::type_name(), %id, "registered component pool");
        Ok(id)
    }

    /// The ID assigned to `T`, if it has been registered.
    #[must_use]
    pub fn type_id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        self.by_type.borrow().get(&TypeId::of::<T>()).copied()
    }

    /// The pool for `T`, creating it on first use.
    ///
    /// # Errors
    ///
    /// [`SimError::TooManyComponentTypes`] if `T` is new and the directory is
    /// full.
    pub fn pool<T: Component>(&self) -> SimResult<&Pool<T>> {
        let id = self.register::<T>()?;
        Ok(self.typed_pool(id))
    }

    /// The pool for `T` if it already exists. Never creates one.
    #[must_use]
    pub fn existing_pool<T: Component>(&self) -> Option<&Pool<T>> {
        self.type_id_of::<T>().map(|id| self.typed_pool(id))
    }

    /// Attach `value` to `entity`, creating the pool for `T` if needed.
    ///
    /// # Errors
    ///
    /// See [`Pool::attach`] and [`Directory::pool`].
    pub fn attach<T: Component>(&self, entity: EntityId, value: T) -> SimResult<()> {
        self.pool::<T>()?.attach(entity, value)?;
        trace!(%entity, component = T::type_name(), "attached component");
        Ok(())
    }

    /// Returns `true` iff `entity` has a live `T`. Unknown types have no
    /// components.
    #[must_use]
    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        self.existing_pool::<T>()
            .is_some_and(|pool| pool.has(entity))
    }

    /// Shared access to the `T` of `entity`.
    ///
    /// # Errors
    ///
    /// See [`Pool::get`].
    pub fn get<T: Component>(&self, entity: EntityId) -> SimResult<Ref<'_, T>> {
        match self.existing_pool::<T>() {
            Some(pool) => pool.get(entity),
            None => Err(SimError::NoComponent {
                entity,
                component: T::type_name(),
            }),
        }
    }

    /// Exclusive access to the `T` of `entity`.
    ///
    /// # Errors
    ///
    /// See [`Pool::get_mut`].
    pub fn get_mut<T: Component>(&self, entity: EntityId) -> SimResult<RefMut<'_, T>> {
        match self.existing_pool::<T>() {
            Some(pool) => pool.get_mut(entity),
            None => Err(SimError::NoComponent {
                entity,
                component: T::type_name(),
            }),
        }
    }

    /// Soft-remove the `T` of `entity`. Returns `true` if there was one.
    pub fn detach<T: Component>(&self, entity: EntityId) -> bool {
        self.existing_pool::<T>()
            .is_some_and(|pool| pool.remove(entity))
    }

    /// Soft-remove `entity` from every pool.
    ///
    /// Safe during any view pass. Returns the number of components removed.
    pub fn remove(&self, entity: EntityId) -> usize {
        let removed = self.filled().filter(|pool| pool.remove(entity)).count();
        trace!(%entity, removed, "removed entity");
        removed
    }

    /// Compact every pool, returning the total number of reclaimed slots.
    ///
    /// # Errors
    ///
    /// The first pool error, see [`Pool::compact`].
    pub fn compact_all(&self) -> SimResult<usize> {
        let mut total = 0;
        for pool in self.filled() {
            let reclaimed = pool.compact()?;
            if reclaimed > 0 {
                debug!(
                    component = pool.component_name(),
                    reclaimed,
                    len = pool.len(),
                    "compacted pool"
                );
            }
            total += reclaimed;
        }
        Ok(total)
    }

    /// Number of live components across every pool.
    #[must_use]
    pub fn live_components(&self) -> usize {
        self.filled().map(|pool| pool.live_count()).sum()
    }

    /// Read-only view over entities that have every component in `Q`.
    ///
    /// # Errors
    ///
    /// See [`Directory::pool`].
    pub fn view<Q: Query>(&self) -> SimResult<View<'_, Q>> {
        View::new(self)
    }

    /// Mutable view over entities that have every component in `Q`.
    ///
    /// # Errors
    ///
    /// See [`Directory::pool`].
    pub fn view_mut<Q: Query>(&self) -> SimResult<ViewMut<'_, Q>> {
        ViewMut::new(self)
    }

    /// Read-only handle for `entity`.
    #[must_use]
    pub fn entity(&self, entity: EntityId) -> EntityRef<'_> {
        EntityRef::new(entity, self)
    }

    /// Mutable handle for `entity`.
    #[must_use]
    pub fn entity_mut(&self, entity: EntityId) -> EntityMut<'_> {
        EntityMut::new(entity, self)
    }

    fn filled(&self) -> impl Iterator<Item = &dyn AnyPool> {
        self.pools
            .iter()
            .filter_map(OnceCell::get)
            .map(|pool| pool.as_ref())
    }

    fn typed_pool<T: Component>(&self, id: ComponentTypeId) -> &Pool<T> {
        match self
            .pools
            .get(id.index())
            .and_then(OnceCell::get)
            .and_then(|pool| pool.as_any().downcast_ref::<Pool<T>>())
        {
            Some(pool) => pool,
            None => unreachable!("{id} is not a pool of {}", T::type_name()),
        }
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_map();
        for pool in self.filled() {
            list.entry(&pool.component_name(), &pool.live_count());
        }
        list.finish()
    }
}
