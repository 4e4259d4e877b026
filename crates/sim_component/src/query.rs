//! Component-set queries over the directory.
//!
//! A query is a tuple of component types such as `(Position, Speed)`. It
//! resolves to the pools of those types and answers two questions for a
//! [`View`](crate::View): which entities to visit (the dense order of the
//! first pool, the *anchor*) and whether a visited entity has every other
//! component of the tuple.
//!
//! Implemented for tuples of one to six component types.

use crate::component::Component;
use crate::directory::Directory;
use crate::entity::EntityId;
use crate::error::SimResult;
use crate::pool::Pool;

/// A tuple of component types that can be viewed together.
pub trait Query: 'static {
    /// Borrowed pools of every component in the tuple.
    type Pools<'a>: Copy;

    /// Resolve the pools, creating any that do not exist yet.
    ///
    /// # Errors
    ///
    /// [`SimError::TooManyComponentTypes`](crate::SimError::TooManyComponentTypes)
    /// if a new pool does not fit into the directory.
    fn pools(directory: &Directory) -> SimResult<Self::Pools<'_>>;

    /// Current dense length of the anchor pool, holes included.
    fn anchor_len(pools: Self::Pools<'_>) -> usize;

    /// Owner of anchor slot `slot`, `None` for holes.
    fn anchor_entity(pools: Self::Pools<'_>, slot: usize) -> Option<EntityId>;

    /// Returns `true` iff `entity` is live in every pool of the tuple.
    fn matches(pools: Self::Pools<'_>, entity: EntityId) -> bool;
}

macro_rules! impl_query {
    ($(($T:ident, $idx:tt)),+) => {
        impl<$($T: Component),+> Query for ($($T,)+) {
            type Pools<'a> = ($(&'a Pool<$T>,)+);

            fn pools(directory: &Directory) -> SimResult<Self::Pools<'_>> {
                Ok(($(directory.pool::<$T>()?,)+))
            }

            fn anchor_len(pools: Self::Pools<'_>) -> usize {
                pools.0.len()
            }

            fn anchor_entity(pools: Self::Pools<'_>, slot: usize) -> Option<EntityId> {
                pools.0.entity_at(slot)
            }

            fn matches(pools: Self::Pools<'_>, entity: EntityId) -> bool {
                $(pools.$idx.has(entity))&&+
            }
        }
    };
}

impl_query!((A, 0));
impl_query!((A, 0), (B, 1));
impl_query!((A, 0), (B, 1), (C, 2));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_query!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));

#[cfg(test)]
mod tests {
    use super::*;

    struct Pos;
    impl Component for Pos {}

    struct Speed;
    impl Component for Speed {}

    #[test]
    fn test_pools_registers_in_tuple_order() {
        let dir = Directory::new();
        <(Speed, Pos)>::pools(&dir).unwrap();
        assert_eq!(dir.type_id_of::<Speed>().unwrap().0, 0);
        assert_eq!(dir.type_id_of::<Pos>().unwrap().0, 1);
    }

    #[test]
    fn test_matches_requires_every_component() {
        let dir = Directory::new();
        let e0 = EntityId::from_raw(0);
        let e1 = EntityId::from_raw(1);
        dir.attach(e0, Pos).unwrap();
        dir.attach(e0, Speed).unwrap();
        dir.attach(e1, Pos).unwrap();

        let pools = <(Pos, Speed)>::pools(&dir).unwrap();
        assert!(<(Pos, Speed)>::matches(pools, e0));
        assert!(!<(Pos, Speed)>::matches(pools, e1));
        assert_eq!(<(Pos, Speed)>::anchor_len(pools), 2);
        assert_eq!(<(Pos, Speed)>::anchor_entity(pools, 1), Some(e1));
    }
}
