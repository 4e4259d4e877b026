//! Sheep graze, wolves hunt sheep, sheep flee from wolves.
//!
//! Usage: `sheep_and_wolves [CYCLES]` (default 1000). The engine reads
//! `SIM_COMPACTION_INTERVAL` and `SIM_COMPONENT_CAPACITY` from the
//! environment.

use anyhow::{Context as _, Result};
use components::{AvoidClosest, Color, DestroyByTouch, FollowClosest, Sprite, Target};
use demo_systems::{
    AsciiRenderer, AvoidClosestResolver, FollowClosestResolver, Movement, RendererConfig,
    TouchableTargets, WorldBoundary,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_component::Component;
use sim_math::{Movable, Transform};
use sim_system::{SimConfig, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CYCLES: u64 = 1000;
const SEED: u64 = 42;
const GRASS: usize = 2000;
const SHEEP: usize = 100;
const WOLVES: usize = 5;

struct Grass;
impl Component for Grass {
    fn type_name() -> &'static str {
        "Grass"
    }
}

struct Sheep;
impl Component for Sheep {
    fn type_name() -> &'static str {
        "Sheep"
    }
}

struct Wolf;
impl Component for Wolf {
    fn type_name() -> &'static str {
        "Wolf"
    }
}

fn random_transform(rng: &mut StdRng) -> Transform {
    Transform::new(rng.gen_range(0..=1000), rng.gen_range(0..=1000))
}

fn random_movable(rng: &mut StdRng) -> Movable {
    Movable::new(rng.gen_range(1..=3))
}

fn populate(sim: &mut Simulation, rng: &mut StdRng) -> Result<()> {
    for _ in 0..GRASS {
        sim.create()?
            .attach(Grass)?
            .attach(random_transform(rng))?
            .attach(Sprite::new(Color::rgb(40, 120, 40)).with_size(4, 4))?;
    }
    for _ in 0..SHEEP {
        let at = random_transform(rng);
        sim.create()?
            .attach(Sheep)?
            .attach(at)?
            .attach(random_movable(rng))?
            .attach(Target { position: at.position })?
            .attach(FollowClosest::<Grass>::new())?
            .attach(AvoidClosest::<Wolf>::default())?
            .attach(DestroyByTouch::<Grass>::default())?
            .attach(Sprite::new(Color::rgb(240, 240, 240)))?;
    }
    for _ in 0..WOLVES {
        let at = random_transform(rng);
        sim.create()?
            .attach(Wolf)?
            .attach(at)?
            .attach(random_movable(rng))?
            .attach(Target { position: at.position })?
            .attach(FollowClosest::<Sheep>::new())?
            .attach(DestroyByTouch::<Sheep>::default())?
            .attach(Sprite::new(Color::rgb(200, 30, 30)).with_size(12, 12))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sheep_and_wolves=info".parse()?),
        )
        .init();

    let cycles = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid cycle count {arg:?}"))?,
        None => DEFAULT_CYCLES,
    };

    let renderer = AsciiRenderer::to_stdout(RendererConfig {
        frame_interval: 10,
        ..RendererConfig::default()
    });

    let mut sim = Simulation::from_config(SimConfig::from_env()?)
        .with_system(FollowClosestResolver::<Grass>::default())
        .with_system(AvoidClosestResolver::<Wolf>::default())
        .with_system(FollowClosestResolver::<Sheep>::default())
        .with_system(Movement)
        .with_system(WorldBoundary::default())
        .with_system(TouchableTargets::<Grass>::default())
        .with_system(TouchableTargets::<Sheep>::default())
        .with_system(renderer)
        .with_component::<Grass>()?
        .with_component::<Sheep>()?
        .with_component::<Wolf>()?;

    let mut rng = StdRng::seed_from_u64(SEED);
    populate(&mut sim, &mut rng)?;
    info!(entities = sim.entity_count(), cycles, "world populated");

    sim.run(cycles)?;

    let directory = sim.directory();
    let grass = directory.view::<(Grass,)>()?.count();
    let sheep = directory.view::<(Sheep,)>()?.count();
    let wolves = directory.view::<(Wolf,)>()?.count();
    info!(grass, sheep, wolves, "survivors");
    Ok(())
}
