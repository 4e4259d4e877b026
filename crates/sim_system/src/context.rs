//! Per-dispatch context handed to systems.

use sim_component::{
    Directory, EntityId, EntityMut, EntityRef, Query, SimResult, View, ViewMut,
};

/// Context provided to a system for one event delivery.
///
/// Holds the current cycle number and a reference to the simulation's
/// directory. It is rebuilt for every event, so a system cannot keep it.
/// Compaction is not reachable from here; only the driver compacts, and only
/// between cycles.
#[derive(Debug)]
pub struct Context<'a> {
    cycle: u64,
    directory: &'a Directory,
}

impl<'a> Context<'a> {
    /// Create a context for `cycle` over `directory`.
    #[must_use]
    pub fn new(cycle: u64, directory: &'a Directory) -> Self {
        Self { cycle, directory }
    }

    /// The current cycle number, starting at 0.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Read-only view over entities that have every component in `Q`.
    ///
    /// # Errors
    ///
    /// Fails only if a new component type does not fit into the directory.
    pub fn view<Q: Query>(&self) -> SimResult<View<'a, Q>> {
        self.directory.view()
    }

    /// Mutable view over entities that have every component in `Q`.
    ///
    /// # Errors
    ///
    /// See [`Context::view`].
    pub fn view_mut<Q: Query>(&mut self) -> SimResult<ViewMut<'a, Q>> {
        self.directory.view_mut()
    }

    /// Read-only handle for `entity`.
    #[must_use]
    pub fn entity(&self, entity: EntityId) -> EntityRef<'a> {
        self.directory.entity(entity)
    }

    /// Mutable handle for `entity`.
    #[must_use]
    pub fn entity_mut(&mut self, entity: EntityId) -> EntityMut<'a> {
        self.directory.entity_mut(entity)
    }

    /// Soft-remove `entity` from every pool. Safe inside a view pass.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.directory.remove(entity);
    }
}

#[cfg(test)]
mod tests {
    use sim_component::Component;

    use super::*;

    struct Hp(u32);
    impl Component for Hp {}

    #[test]
    fn test_context_creation() {
        let directory = Directory::new();
        let ctx = Context::new(7, &directory);
        assert_eq!(ctx.cycle(), 7);
        assert!(ctx.view::<(Hp,)>().unwrap().is_empty());
    }

    #[test]
    fn test_remove_entity_inside_view_pass() {
        let directory = Directory::new();
        for id in 0..4 {
            directory.attach(EntityId::from_raw(id), Hp(id)).unwrap();
        }
        let mut ctx = Context::new(0, &directory);
        let view = ctx.view::<(Hp,)>().unwrap();
        view.for_each(|entity, hp| {
            if hp.0 % 2 == 1 {
                ctx.remove_entity(entity.id());
            }
        })
        .unwrap();
        assert_eq!(ctx.view::<(Hp,)>().unwrap().count(), 2);
    }

    #[test]
    fn test_entity_mut_attach() {
        let directory = Directory::new();
        let mut ctx = Context::new(0, &directory);
        ctx.entity_mut(EntityId::from_raw(3)).attach(Hp(5)).unwrap();
        assert!(ctx.entity(EntityId::from_raw(3)).has::<Hp>());
    }
}
