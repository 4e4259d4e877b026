//! Entity interactions.

use std::marker::PhantomData;

use components::DestroyByTouch;
use sim_component::Component;
use sim_math::Transform;
use sim_system::{Context, Event, Interest, System};
use tracing::debug;

/// Removes every entity with a `T` that comes strictly closer than the
/// touch distance of an entity marked [`DestroyByTouch<T>`].
///
/// Removal is soft, so an entity destroyed earlier in the cycle stops
/// touching immediately but its slot is reclaimed only at the next
/// compaction.
pub struct TouchableTargets<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> Default for TouchableTargets<T> {
    fn default() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T: Component> System for TouchableTargets<T> {
    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::Cycle => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event_with_context(
        &mut self,
        _event: Event,
        ctx: &mut Context<'_>,
    ) -> anyhow::Result<()> {
        let touchers = ctx.view::<(Transform, DestroyByTouch<T>)>()?;
        let touchables = ctx.view::<(T, Transform)>()?;
        let mut destroyed = 0usize;

        touchers.try_for_each(|toucher, at, touch| {
            let reach = touch.min_distance_squared();
            touchables.for_each(|touched, _, there| {
                if toucher.id() != touched.id() && at.dist_squared(there) < reach {
                    ctx.remove_entity(touched.id());
                    destroyed += 1;
                }
            })?;
            Ok(())
        })?;

        if destroyed > 0 {
            debug!(cycle = ctx.cycle(), destroyed, "entities touched");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sim_component::{Directory, EntityId};

    use super::*;

    struct Sheep;
    impl Component for Sheep {}

    struct Wolf;
    impl Component for Wolf {}

    fn e(id: u32) -> EntityId {
        EntityId::from_raw(id)
    }

    fn run(directory: &Directory) {
        let mut ctx = Context::new(0, directory);
        TouchableTargets::<Sheep>::default()
            .on_event_with_context(Event::Cycle, &mut ctx)
            .unwrap();
    }

    #[test]
    fn test_touch_is_strict() {
        let directory = Directory::new();
        directory
            .entity_mut(e(0))
            .attach(Wolf)
            .unwrap()
            .attach(Transform::new(0, 0))
            .unwrap()
            .attach(DestroyByTouch::<Sheep>::new(5))
            .unwrap();
        directory
            .entity_mut(e(1))
            .attach(Sheep)
            .unwrap()
            .attach(Transform::new(3, 4))
            .unwrap();
        directory
            .entity_mut(e(2))
            .attach(Sheep)
            .unwrap()
            .attach(Transform::new(4, 2))
            .unwrap();
        directory
            .entity_mut(e(3))
            .attach(Sheep)
            .unwrap()
            .attach(Transform::new(50, 0))
            .unwrap();

        run(&directory);

        assert!(directory.has::<Sheep>(e(1)));
        assert!(!directory.has::<Sheep>(e(2)));
        assert!(!directory.has::<Transform>(e(2)));
        assert!(directory.has::<Sheep>(e(3)));
        assert!(directory.has::<Wolf>(e(0)));
    }

    #[test]
    fn test_toucher_does_not_destroy_itself() {
        let directory = Directory::new();
        directory
            .entity_mut(e(0))
            .attach(Sheep)
            .unwrap()
            .attach(Transform::new(0, 0))
            .unwrap()
            .attach(DestroyByTouch::<Sheep>::default())
            .unwrap();

        run(&directory);
        assert!(directory.has::<Sheep>(e(0)));
    }

    #[test]
    fn test_destroyed_toucher_stops_touching() {
        let directory = Directory::new();
        for id in 0..2 {
            directory
                .entity_mut(e(id))
                .attach(Sheep)
                .unwrap()
                .attach(Transform::new(0, 0))
                .unwrap()
                .attach(DestroyByTouch::<Sheep>::default())
                .unwrap();
        }

        run(&directory);
        assert!(directory.has::<Sheep>(e(0)));
        assert!(!directory.has::<Sheep>(e(1)));
    }

    #[test]
    fn test_far_apart_entities_do_not_touch() {
        let directory = Directory::new();
        directory
            .entity_mut(e(0))
            .attach(Transform::new(i32::MIN, i32::MIN))
            .unwrap()
            .attach(DestroyByTouch::<Sheep>::default())
            .unwrap();
        directory
            .entity_mut(e(1))
            .attach(Sheep)
            .unwrap()
            .attach(Transform::new(i32::MAX, i32::MAX))
            .unwrap();

        run(&directory);
        assert!(directory.has::<Sheep>(e(1)));
    }
}
