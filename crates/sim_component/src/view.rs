//! Filtered iteration over entities that have a given set of components.
//!
//! A view walks the dense slots of its first component's pool (the anchor)
//! from the front and yields every slot whose owner is live in all pools of
//! the query. The anchor length is read again on every step, so a pass sees
//! removals made while it runs and never skips or repeats a survivor.
//!
//! There are three call forms for a pass:
//!
//! - `for_each(|entity, a, b| ..)`: entity handle plus component references.
//! - `for_each_components(|a, b| ..)`: component references only.
//! - `try_for_each(|entity, a, b| -> anyhow::Result<()>)`: stops at the
//!   first error.
//!
//! A pass borrows the values of every queried pool for its whole duration.
//! Inside it, soft removal is always allowed. Attaching to a queried pool or
//! compacting it is refused with a borrow conflict, as is mutable access to
//! a pool that a [`ViewMut`] pass is already writing.
//!
//! ```rust
//! use sim_component::{Component, Directory, EntityId};
//!
//! struct Position(i32, i32);
//! impl Component for Position {}
//! struct Speed(i32);
//! impl Component for Speed {}
//!
//! # fn main() -> Result<(), sim_component::SimError> {
//! let directory = Directory::new();
//! directory
//!     .entity_mut(EntityId::from_raw(0))
//!     .attach(Position(0, 0))?
//!     .attach(Speed(3))?;
//!
//! directory
//!     .view_mut::<(Position, Speed)>()?
//!     .for_each_components(|pos, speed| pos.0 += speed.0)?;
//!
//! assert_eq!(directory.get::<Position>(EntityId::from_raw(0))?.0, 3);
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;

use crate::component::Component;
use crate::directory::Directory;
use crate::entity::EntityId;
use crate::error::SimResult;
use crate::handle::{EntityMut, EntityRef};
use crate::query::Query;

/// Anchor-slot cursor shared by views and their iterators.
struct Cursor<'a, Q: Query> {
    pools: Q::Pools<'a>,
    slot: usize,
}

impl<'a, Q: Query> Cursor<'a, Q> {
    fn new(pools: Q::Pools<'a>) -> Self {
        Self { pools, slot: 0 }
    }

    fn next_match(&mut self) -> Option<EntityId> {
        while self.slot < Q::anchor_len(self.pools) {
            let slot = self.slot;
            self.slot += 1;
            if let Some(entity) = Q::anchor_entity(self.pools, slot) {
                if Q::matches(self.pools, entity) {
                    return Some(entity);
                }
            }
        }
        None
    }
}

/// Read-only view over every entity that has all components of `Q`.
pub struct View<'a, Q: Query> {
    directory: &'a Directory,
    pools: Q::Pools<'a>,
}

impl<'a, Q: Query> View<'a, Q> {
    pub(crate) fn new(directory: &'a Directory) -> SimResult<Self> {
        Ok(Self {
            directory,
            pools: Q::pools(directory)?,
        })
    }

    /// Returns `true` if no entity currently matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Cursor::<Q>::new(self.pools).next_match().is_none()
    }

    /// Number of entities that currently match.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Lazily iterate the matching entities.
    ///
    /// The iterator holds no borrow on component values, so the caller may
    /// attach, read or remove freely between steps.
    #[must_use]
    pub fn iter(&self) -> Iter<'a, Q> {
        Iter {
            directory: self.directory,
            cursor: Cursor::new(self.pools),
        }
    }

    fn try_visit<E>(&self, mut each: impl FnMut(EntityId) -> Result<(), E>) -> Result<(), E> {
        let mut cursor = Cursor::<Q>::new(self.pools);
        while let Some(entity) = cursor.next_match() {
            each(entity)?;
        }
        Ok(())
    }

    fn visit(&self, mut each: impl FnMut(EntityId)) {
        let Ok(()) = self.try_visit(|entity| {
            each(entity);
            Ok::<(), Infallible>(())
        });
    }
}

impl<'a, Q: Query> IntoIterator for &View<'a, Q> {
    type Item = EntityRef<'a>;
    type IntoIter = Iter<'a, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable view over every entity that has all components of `Q`.
pub struct ViewMut<'a, Q: Query> {
    inner: View<'a, Q>,
}

impl<'a, Q: Query> ViewMut<'a, Q> {
    pub(crate) fn new(directory: &'a Directory) -> SimResult<Self> {
        Ok(Self {
            inner: View::new(directory)?,
        })
    }

    /// Returns `true` if no entity currently matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of entities that currently match.
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// Lazily iterate the matching entities as mutable handles.
    #[must_use]
    pub fn iter(&self) -> IterMut<'a, Q> {
        IterMut {
            inner: self.inner.iter(),
        }
    }
}

impl<'a, Q: Query> IntoIterator for &ViewMut<'a, Q> {
    type Item = EntityMut<'a>;
    type IntoIter = IterMut<'a, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entities of a [`View`].
pub struct Iter<'a, Q: Query> {
    directory: &'a Directory,
    cursor: Cursor<'a, Q>,
}

impl<'a, Q: Query> Iterator for Iter<'a, Q> {
    type Item = EntityRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.cursor.next_match()?;
        Some(EntityRef::new(entity, self.directory))
    }
}

/// Iterator over the entities of a [`ViewMut`].
pub struct IterMut<'a, Q: Query> {
    inner: Iter<'a, Q>,
}

impl<'a, Q: Query> Iterator for IterMut<'a, Q> {
    type Item = EntityMut<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.inner.cursor.next_match()?;
        Some(EntityMut::new(entity, self.inner.directory))
    }
}

macro_rules! impl_view_passes {
    ($(($T:ident, $idx:tt, $c:ident)),+) => {
        impl<'a, $($T: Component),+> View<'a, ($($T,)+)> {
            /// Visit every matching entity with its components.
            ///
            /// # Errors
            ///
            /// A borrow conflict if a mutable pass over one of the
            /// components is open.
            pub fn for_each<Func>(&self, mut f: Func) -> SimResult<()>
            where
                Func: FnMut(EntityRef<'a>, $(&$T),+),
            {
                let pools = self.pools;
                let guards = ($(pools.$idx.values()?,)+);
                let directory = self.directory;
                self.visit(|entity| {
                    if let ($(Some($c),)+) = ($(pools.$idx.slot_of(entity),)+) {
                        if let ($(Some($c),)+) = ($(guards.$idx.get($c),)+) {
                            f(EntityRef::new(entity, directory), $($c),+);
                        }
                    }
                });
                Ok(())
            }

            /// Visit the components of every matching entity.
            ///
            /// # Errors
            ///
            /// See [`View::for_each`].
            pub fn for_each_components<Func>(&self, mut f: Func) -> SimResult<()>
            where
                Func: FnMut($(&$T),+),
            {
                self.for_each(|_, $($c),+| f($($c),+))
            }

            /// Like [`View::for_each`], stopping at the first error the
            /// callback returns.
            ///
            /// # Errors
            ///
            /// The callback's error, or a borrow conflict.
            pub fn try_for_each<Func>(&self, mut f: Func) -> anyhow::Result<()>
            where
                Func: FnMut(EntityRef<'a>, $(&$T),+) -> anyhow::Result<()>,
            {
                let pools = self.pools;
                let guards = ($(pools.$idx.values()?,)+);
                let directory = self.directory;
                self.try_visit(|entity| {
                    if let ($(Some($c),)+) = ($(pools.$idx.slot_of(entity),)+) {
                        if let ($(Some($c),)+) = ($(guards.$idx.get($c),)+) {
                            return f(EntityRef::new(entity, directory), $($c),+);
                        }
                    }
                    Ok(())
                })
            }
        }

        impl<'a, $($T: Component),+> ViewMut<'a, ($($T,)+)> {
            /// Visit every matching entity with mutable components.
            ///
            /// # Errors
            ///
            /// A borrow conflict if any other pass over one of the components
            /// is open, or if the same component appears twice in the tuple.
            pub fn for_each<Func>(&self, mut f: Func) -> SimResult<()>
            where
                Func: FnMut(EntityMut<'a>, $(&mut $T),+),
            {
                let pools = self.inner.pools;
                let mut guards = ($(pools.$idx.values_mut()?,)+);
                let directory = self.inner.directory;
                self.inner.visit(|entity| {
                    if let ($(Some($c),)+) = ($(pools.$idx.slot_of(entity),)+) {
                        if let ($(Some($c),)+) = ($(guards.$idx.get_mut($c),)+) {
                            f(EntityMut::new(entity, directory), $($c),+);
                        }
                    }
                });
                Ok(())
            }

            /// Visit the mutable components of every matching entity.
            ///
            /// # Errors
            ///
            /// See [`ViewMut::for_each`].
            pub fn for_each_components<Func>(&self, mut f: Func) -> SimResult<()>
            where
                Func: FnMut($(&mut $T),+),
            {
                self.for_each(|_, $($c),+| f($($c),+))
            }

            /// Like [`ViewMut::for_each`], stopping at the first error the
            /// callback returns.
            ///
            /// # Errors
            ///
            /// The callback's error, or a borrow conflict.
            pub fn try_for_each<Func>(&self, mut f: Func) -> anyhow::Result<()>
            where
                Func: FnMut(EntityMut<'a>, $(&mut $T),+) -> anyhow::Result<()>,
            {
                let pools = self.inner.pools;
                let mut guards = ($(pools.$idx.values_mut()?,)+);
                let directory = self.inner.directory;
                self.inner.try_visit(|entity| {
                    if let ($(Some($c),)+) = ($(pools.$idx.slot_of(entity),)+) {
                        if let ($(Some($c),)+) = ($(guards.$idx.get_mut($c),)+) {
                            return f(EntityMut::new(entity, directory), $($c),+);
                        }
                    }
                    Ok(())
                })
            }
        }
    };
}

impl_view_passes!((A, 0, c0));
impl_view_passes!((A, 0, c0), (B, 1, c1));
impl_view_passes!((A, 0, c0), (B, 1, c1), (C, 2, c2));
impl_view_passes!((A, 0, c0), (B, 1, c1), (C, 2, c2), (D, 3, c3));
impl_view_passes!((A, 0, c0), (B, 1, c1), (C, 2, c2), (D, 3, c3), (E, 4, c4));
impl_view_passes!((A, 0, c0), (B, 1, c1), (C, 2, c2), (D, 3, c3), (E, 4, c4), (F, 5, c5));
