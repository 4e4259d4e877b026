//! Per-cycle movement.

use components::{RandomTarget, Target};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_math::{IVec2, Movable, Transform, step_towards};
use sim_system::{Context, Event, Interest, System};

/// Seed of the default random movement generator.
pub const DEFAULT_SEED: u64 = 42;

/// Moves entities with a [`RandomTarget`] by a random step of up to their
/// speed on each axis.
#[derive(Debug)]
pub struct RandomMovement {
    rng: StdRng,
}

impl RandomMovement {
    /// Use a generator seeded with `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMovement {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl System for RandomMovement {
    fn name(&self) -> &str {
        "random_movement"
    }

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
        let rng = &mut self.rng;
        ctx.view_mut::<(Transform, Movable, RandomTarget)>()?
            .for_each_components(|t, m, _| {
                let step = IVec2::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
                *t = t.translated(step * m.speed);
            })?;
        Ok(())
    }
}

/// Moves every entity with a [`Target`] towards it by up to its speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Movement;

impl System for Movement {
    fn name(&self) -> &str {
        "movement"
    }

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
        ctx.view_mut::<(Transform, Movable, Target)>()?
            .for_each_components(|t, m, target| {
                t.position = step_towards(t.position, target.position, m.speed);
            })?;
        Ok(())
    }
}
