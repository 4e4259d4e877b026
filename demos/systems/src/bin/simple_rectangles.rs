//! A few rectangles: one wanders, two head for the world corners and one
//! chases the wanderer.
//!
//! Usage: `simple_rectangles [CYCLES]` (default 10000). Positions are logged
//! at `debug`.

use anyhow::{Context as _, Result};
use components::{Color, FollowClosest, RandomTarget, Sprite, StaticEntityTarget, Target};
use demo_systems::{
    AsciiRenderer, FollowClosestResolver, Movement, RandomMovement, RendererConfig,
    StaticTargetResolver, WorldBoundary,
};
use sim_math::{Movable, Transform};
use sim_system::{Context, Event, Interest, SimConfig, Simulation, System};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CYCLES: u64 = 10_000;

/// Logs every movable entity once per cycle.
struct PositionLog;

impl System for PositionLog {
    fn name(&self) -> &str {
        "position_log"
    }

    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::Cycle => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event_with_context(&mut self, _event: Event, ctx: &mut Context<'_>) -> Result<()> {
        ctx.view::<(Transform, Movable)>()?.for_each(|entity, t, m| {
            debug!(entity = %entity.id(), x = t.x(), y = t.y(), speed = m.speed, "position");
        })?;
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("simple_rectangles=info".parse()?),
        )
        .init();

    let cycles = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid cycle count {arg:?}"))?,
        None => DEFAULT_CYCLES,
    };

    let renderer = AsciiRenderer::to_stdout(RendererConfig {
        frame_interval: 100,
        ..RendererConfig::default()
    });

    let mut sim = Simulation::from_config(SimConfig::from_env()?)
        .with_system(PositionLog)
        .with_system(StaticTargetResolver)
        .with_system(FollowClosestResolver::<RandomTarget>::default())
        .with_system(RandomMovement::default())
        .with_system(Movement)
        .with_system(WorldBoundary::default())
        .with_system(renderer);

    let red = Sprite::new(Color::rgba(255, 0, 0, 255));
    let green = Sprite::new(Color::rgb(0, 255, 0));

    let top_left = sim.create()?.attach(Transform::new(0, 0))?.id();
    let bottom_right = sim.create()?.attach(Transform::new(1000, 1000))?.id();

    sim.create()?
        .attach(Transform::new(500, 500))?
        .attach(Movable::new(10))?
        .attach(RandomTarget)?
        .attach(green)?;

    for (corner, speed) in [(bottom_right, 5), (top_left, 5)] {
        sim.create()?
            .attach(Transform::new(500, 500))?
            .attach(Movable::new(speed))?
            .attach(Target::default())?
            .attach(StaticEntityTarget { entity: corner })?
            .attach(green)?;
    }

    sim.create()?
        .attach(Transform::new(500, 600))?
        .attach(Movable::default())?
        .attach(Target::new(500, 600))?
        .attach(FollowClosest::<RandomTarget>::new())?
        .attach(red)?;

    sim.run(cycles)?;
    info!(cycles = sim.cycle(), "done");
    Ok(())
}
