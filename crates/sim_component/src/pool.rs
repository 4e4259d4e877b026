//! Sparse-set component pool.
//!
//! A [`Pool<T>`] stores every component of one type in three parallel arrays:
//!
//! ```text
//! sparse : entity id  -> dense slot   (NO_SLOT when absent or removed)
//! ids    : dense slot -> entity id    (EntityId::NONE when the slot is a hole)
//! values : dense slot -> component
//! ```
//!
//! Removal is soft: it clears both mappings and leaves a hole in the dense
//! arrays, so nothing else moves and any open pass over the pool stays
//! valid. [`Pool::compact`] later fills every hole by swapping the tail
//! element into it and shrinking the arrays.
//!
//! The index (`sparse` + `ids`) and the values live in separate cells. A view
//! pass holds a borrow on the values only, which is what lets a system remove
//! entities while it is iterating.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};

use crate::component::Component;
use crate::entity::EntityId;
use crate::error::{Access, SimError, SimResult};

/// Sentinel in the sparse array for "no slot".
const NO_SLOT: usize = usize::MAX;

/// Sparse and dense id mappings of a pool.
#[derive(Debug, Default)]
struct SlotIndex {
    sparse: Vec<usize>,
    ids: Vec<EntityId>,
}

impl SlotIndex {
    fn slot_of(&self, entity: EntityId) -> Option<usize> {
        match self.sparse.get(entity.index()) {
            Some(&slot) if slot != NO_SLOT => Some(slot),
            _ => None,
        }
    }

    fn bind(&mut self, entity: EntityId, slot: usize) {
        if entity.index() >= self.sparse.len() {
            self.sparse.resize(entity.index() + 1, NO_SLOT);
        }
        self.sparse[entity.index()] = slot;
        if slot >= self.ids.len() {
            self.ids.resize(slot + 1, EntityId::NONE);
        }
        self.ids[slot] = entity;
    }

    fn unbind(&mut self, entity: EntityId) -> Option<usize> {
        let slot = self.slot_of(entity)?;
        self.sparse[entity.index()] = NO_SLOT;
        self.ids[slot] = EntityId::NONE;
        Some(slot)
    }
}

/// Storage for all components of type `T`, keyed by entity.
///
/// All operations take `&self`; the pool guards its own cells and reports
/// conflicting access as [`SimError::BorrowConflict`] instead of panicking.
#[derive(Debug)]
pub struct Pool<T> {
    index: RefCell<SlotIndex>,
    values: RefCell<Vec<T>>,
}

impl<T: Component> Pool<T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: RefCell::new(SlotIndex::default()),
            values: RefCell::new(Vec::new()),
        }
    }

    /// Number of dense slots, holes included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.borrow().ids.len()
    }

    /// Returns `true` if the pool has no dense slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots that hold a live component.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.index.borrow().ids.iter().filter(|id| id.is_some()).count()
    }

    /// Returns `true` iff `entity` currently maps to a live slot.
    #[must_use]
    pub fn has(&self, entity: EntityId) -> bool {
        self.index.borrow().slot_of(entity).is_some()
    }

    /// Dense slot of `entity`, if it has a live one.
    #[must_use]
    pub fn slot_of(&self, entity: EntityId) -> Option<usize> {
        self.index.borrow().slot_of(entity)
    }

    /// The owner of dense slot `slot`, or `None` for holes and slots past the
    /// end.
    #[must_use]
    pub fn entity_at(&self, slot: usize) -> Option<EntityId> {
        self.index
            .borrow()
            .ids
            .get(slot)
            .copied()
            .filter(|id| id.is_some())
    }

    /// Shared access to the component of `entity`.
    ///
    /// The returned guard stays valid across soft removals; compaction is
    /// refused while it is alive.
    ///
    /// # Errors
    ///
    /// [`SimError::NoComponent`] if `entity` has no live slot, or
    /// [`SimError::BorrowConflict`] if the values are mutably borrowed.
    pub fn get(&self, entity: EntityId) -> SimResult<Ref<'_, T>> {
        let slot = self.slot_of(entity).ok_or_else(|| Self::missing(entity))?;
        let values = self.values()?;
        Ref::filter_map(values, |values| values.get(slot)).map_err(|_| Self::missing(entity))
    }

    /// Exclusive access to the component of `entity`.
    ///
    /// # Errors
    ///
    /// [`SimError::NoComponent`] if `entity` has no live slot, or
    /// [`SimError::BorrowConflict`] if the values are already borrowed.
    pub fn get_mut(&self, entity: EntityId) -> SimResult<RefMut<'_, T>> {
        let slot = self.slot_of(entity).ok_or_else(|| Self::missing(entity))?;
        let values = self.values_mut()?;
        RefMut::filter_map(values, |values| values.get_mut(slot))
            .map_err(|_| Self::missing(entity))
    }

    /// Attach `value` to `entity`.
    ///
    /// A new component is appended to the dense arrays. If `entity` already
    /// has a live slot the value there is overwritten in place, so an entity
    /// never owns more than one slot of a pool.
    ///
    /// # Errors
    ///
    /// [`SimError::BorrowConflict`] if the values are borrowed, e.g. by an
    /// open view pass over this component type.
    pub fn attach(&self, entity: EntityId, value: T) -> SimResult<()> {
        let mut values = self.values_mut()?;
        let mut index = self.index.borrow_mut();
        if let Some(slot) = index.slot_of(entity) {
            values[slot] = value;
            return Ok(());
        }
        let slot = values.len();
        values.push(value);
        index.bind(entity, slot);
        Ok(())
    }

    /// Soft-remove the component of `entity`.
    ///
    /// Marks the slot as a hole without moving anything, so it is safe in
    /// the middle of a pass over this pool. Returns `true` if the entity had
    /// a live slot. The stale value is dropped at the next compaction.
    pub fn remove(&self, entity: EntityId) -> bool {
        self.index.borrow_mut().unbind(entity).is_some()
    }

    /// Reclaim every hole and return how many slots were reclaimed.
    ///
    /// Scans dense slots from the front. Whenever the scanned slot is a hole,
    /// the tail slot is swapped into it, the arrays shrink by one and the
    /// same slot is examined again, because the element that moved in may
    /// itself be a hole. Invalidates every outstanding slot number.
    ///
    /// # Errors
    ///
    /// [`SimError::BorrowConflict`] if the values are borrowed, or
    /// [`SimError::InvalidCompaction`] if a reclaimed slot turns out to be
    /// live.
    pub fn compact(&self) -> SimResult<usize> {
        let mut values = self.values_mut()?;
        let mut index = self.index.borrow_mut();
        let mut reclaimed = 0;
        let mut slot = 0;
        while slot < index.ids.len() {
            if index.ids[slot].is_some() {
                slot += 1;
                continue;
            }
            Self::swap_remove_hole(&mut index, &mut values, slot)?;
            reclaimed += 1;
        }
        Ok(reclaimed)
    }

    /// Visit every live `(entity, component)` pair in dense order.
    ///
    /// The dense length is re-read on every step and removal during the pass
    /// is allowed; attaching to this pool during the pass is refused.
    ///
    /// # Errors
    ///
    /// [`SimError::BorrowConflict`] if the values are mutably borrowed.
    pub fn for_each(&self, mut f: impl FnMut(EntityId, &T)) -> SimResult<()> {
        let values = self.values()?;
        let mut slot = 0;
        while slot < self.len() {
            if let (Some(entity), Some(value)) = (self.entity_at(slot), values.get(slot)) {
                f(entity, value);
            }
            slot += 1;
        }
        Ok(())
    }

    /// Like [`Pool::for_each`] with mutable component access.
    ///
    /// # Errors
    ///
    /// [`SimError::BorrowConflict`] if the values are already borrowed.
    pub fn for_each_mut(&self, mut f: impl FnMut(EntityId, &mut T)) -> SimResult<()> {
        let mut values = self.values_mut()?;
        let mut slot = 0;
        while slot < self.len() {
            if let (Some(entity), Some(value)) = (self.entity_at(slot), values.get_mut(slot)) {
                f(entity, value);
            }
            slot += 1;
        }
        Ok(())
    }

    pub(crate) fn values(&self) -> SimResult<Ref<'_, Vec<T>>> {
        self.values.try_borrow().map_err(|_| SimError::BorrowConflict {
            component: T::type_name(),
            access: Access::Read,
        })
    }

    pub(crate) fn values_mut(&self) -> SimResult<RefMut<'_, Vec<T>>> {
        self.values.try_borrow_mut().map_err(|_| SimError::BorrowConflict {
            component: T::type_name(),
            access: Access::Write,
        })
    }

    fn swap_remove_hole(index: &mut SlotIndex, values: &mut Vec<T>, slot: usize) -> SimResult<()> {
        if index.ids[slot].is_some() {
            return Err(SimError::InvalidCompaction {
                component: T::type_name(),
                slot,
            });
        }
        let last = index.ids.len() - 1;
        let last_id = index.ids[last];
        values.swap(slot, last);
        index.ids.swap(slot, last);
        if last_id.is_some() {
            index.sparse[last_id.index()] = slot;
        }
        values.pop();
        index.ids.pop();
        Ok(())
    }

    fn missing(entity: EntityId) -> SimError {
        SimError::NoComponent {
            entity,
            component: T::type_name(),
        }
    }
}

impl<T: Component> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a pool, used by the directory for operations that
/// apply to every component type.
pub(crate) trait AnyPool {
    fn component_name(&self) -> &'static str;
    fn remove(&self, entity: EntityId) -> bool;
    fn compact(&self) -> SimResult<usize>;
    fn len(&self) -> usize;
    fn live_count(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Component> AnyPool for Pool<T> {
    fn component_name(&self) -> &'static str {
        T::type_name()
    }

    fn remove(&self, entity: EntityId) -> bool {
        Pool::remove(self, entity)
    }

    fn compact(&self) -> SimResult<usize> {
        Pool::compact(self)
    }

    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn live_count(&self) -> usize {
        Pool::live_count(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
