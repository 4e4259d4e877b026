//! Minimal run: two systems, three entities, three cycles.
//!
//! `SystemA` logs simulation start/end and each cycle, then lists every
//! `C1`. `SystemB` looks up the `C2` of every entity that has both.

use anyhow::Result;
use sim_component::Component;
use sim_system::{Context, Event, Interest, Simulation, System};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct C1(i32);
impl Component for C1 {
    fn type_name() -> &'static str {
        "C1"
    }
}

#[derive(Debug)]
struct C2(i32);
impl Component for C2 {
    fn type_name() -> &'static str {
        "C2"
    }
}

struct SystemA;

impl System for SystemA {
    fn name(&self) -> &str {
        "system_a"
    }

    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::SimStart | Event::SimEnd => Interest::PLAIN,
            Event::Cycle => Interest::BOTH,
            _ => Interest::NONE,
        }
    }

    fn on_event(&mut self, event: Event) -> Result<()> {
        info!("SystemA: {event}");
        Ok(())
    }

    fn on_event_with_context(&mut self, event: Event, ctx: &mut Context<'_>) -> Result<()> {
        info!("SystemA: {event} {}", ctx.cycle());
        ctx.view::<(C1,)>()?.for_each(|entity, c1| {
            info!("  {} C1({})", entity.id(), c1.0);
        })?;
        Ok(())
    }
}

struct SystemB;

impl System for SystemB {
    fn name(&self) -> &str {
        "system_b"
    }

    fn interest(&self, event: Event) -> Interest {
        match event {
            Event::Cycle => Interest::CONTEXTUAL,
            _ => Interest::NONE,
        }
    }

    fn on_event_with_context(&mut self, _event: Event, ctx: &mut Context<'_>) -> Result<()> {
        for entity in &ctx.view::<(C1, C2)>()? {
            let c2 = entity.get::<C2>()?;
            info!("SystemB: {} C2({})", entity.id(), c2.0);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dummy=info".parse()?))
        .init();

    let mut sim = Simulation::new()
        .with_system(SystemA)
        .with_system(SystemB)
        .with_component::<C1>()?
        .with_component::<C2>()?;

    sim.create()?.attach(C1(1))?;
    sim.create()?.attach(C2(2))?;
    sim.create()?.attach(C1(10))?.attach(C2(20))?;

    sim.run(3)
}
