//! World boundary enforcement.

use sim_math::{Bounds, Transform};
use sim_system::{Context, Event, Interest, System};

/// Clamps every [`Transform`] into the world bounds after each cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldBoundary {
    bounds: Bounds,
}

impl WorldBoundary {
    /// Enforce custom bounds.
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }
}

impl System for WorldBoundary {
    fn name(&self) -> &str {
        "world_boundary"
    }

    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::PostCycle => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event_with_context(
        &mut self,
        _event: Event,
        ctx: &mut Context<'_>,
    ) -> anyhow::Result<()> {
        let bounds = self.bounds;
        ctx.view_mut::<(Transform,)>()?
            .for_each_components(|t| t.position = bounds.clamp(t.position))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sim_component::{Directory, EntityId};

    use super::*;

    #[test]
    fn test_clamps_out_of_bounds_transforms() {
        let directory = Directory::new();
        let outside = EntityId::from_raw(0);
        let inside = EntityId::from_raw(1);
        directory.attach(outside, Transform::new(-20, 1500)).unwrap();
        directory.attach(inside, Transform::new(10, 10)).unwrap();

        let mut ctx = Context::new(0, &directory);
        WorldBoundary::default()
            .on_event_with_context(Event::PostCycle, &mut ctx)
            .unwrap();

        assert_eq!(*directory.get::<Transform>(outside).unwrap(), Transform::new(0, 1000));
        assert_eq!(*directory.get::<Transform>(inside).unwrap(), Transform::new(10, 10));
    }
}
