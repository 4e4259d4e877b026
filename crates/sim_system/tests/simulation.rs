use std::cell::RefCell;
use std::rc::Rc;

use sim_component::{Component, EntityId, SimError};
use sim_system::{Context, Event, Interest, SimConfig, Simulation, System};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position(i32, i32);
impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity(i32, i32);
impl Component for Velocity {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Doomed;
impl Component for Doomed {}

type Log = Rc<RefCell<Vec<String>>>;

/// Records every delivery as `label:event@cycle`.
struct Recorder {
    label: &'static str,
    interest: Interest,
    log: Log,
}

impl System for Recorder {
    fn name(&self) -> &str {
        self.label
    }

    fn interest(&self, _event: Event) -> Interest {
        self.interest
    }

    fn on_event(&mut self, event: Event) -> anyhow::Result<()> {
        self.log
            .borrow_mut()
            .push(format!("{}:{event}", self.label));
        Ok(())
    }

    fn on_event_with_context(&mut self, event: Event, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        self.log
            .borrow_mut()
            .push(format!("{}:{event}@{}", self.label, ctx.cycle()));
        Ok(())
    }
}

/// Applies velocity to position once per cycle.
struct Mover;

impl System for Mover {
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
        ctx.view_mut::<(Position, Velocity)>()?
            .for_each_components(|pos, vel| {
                pos.0 += vel.0;
                pos.1 += vel.1;
            })?;
        Ok(())
    }
}

/// Removes every `Doomed` entity at a given cycle.
struct Reaper {
    at_cycle: u64,
}

impl System for Reaper {
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
        if ctx.cycle() != self.at_cycle {
            return Ok(());
        }
        let doomed = ctx.view::<(Doomed,)>()?;
        doomed.for_each(|entity, _| ctx.remove_entity(entity.id()))?;
        Ok(())
    }
}

struct FailAt {
    cycle: u64,
}

impl System for FailAt {
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
        if ctx.cycle() == self.cycle {
            return Err(SimError::NoComponent {
                entity: EntityId::from_raw(0),
                component: "Position",
            }
            .into());
        }
        Ok(())
    }
}

fn recorder(label: &'static str, interest: Interest, log: &Log) -> Recorder {
    Recorder {
        label,
        interest,
        log: Rc::clone(log),
    }
}

#[test]
fn test_event_sequence_of_a_run() {
    let log = Log::default();
    let mut sim = Simulation::new().with_system(recorder("r", Interest::CONTEXTUAL, &log));
    sim.run(2).unwrap();

    let expected = vec![
        "r:sim_start@0",
        "r:pre_cycle@0",
        "r:cycle@0",
        "r:post_cycle@0",
        "r:render@0",
        "r:pre_cycle@1",
        "r:cycle@1",
        "r:post_cycle@1",
        "r:render@1",
        "r:sim_end@2",
    ];
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn test_zero_cycles_still_starts_and_ends() {
    let log = Log::default();
    let mut sim = Simulation::new().with_system(recorder("r", Interest::PLAIN, &log));
    sim.run(0).unwrap();
    assert_eq!(*log.borrow(), vec!["r:sim_start", "r:sim_end"]);
}

#[test]
fn test_systems_run_in_declared_order() {
    let log = Log::default();
    let mut sim = Simulation::new()
        .with_system(recorder("a", Interest::PLAIN, &log))
        .with_system(recorder("b", Interest::PLAIN, &log));
    sim.run(1).unwrap();

    let log = log.borrow();
    for pair in log.chunks(2) {
        assert!(pair[0].starts_with("a:"));
        assert!(pair[1].starts_with("b:"));
        assert_eq!(pair[0][2..], pair[1][2..]);
    }
}

#[test]
fn test_plain_only_system_called_once_per_event() {
    let log = Log::default();
    let mut sim = Simulation::new().with_system(recorder("p", Interest::PLAIN, &log));
    sim.run(3).unwrap();
    let cycles = log
        .borrow()
        .iter()
        .filter(|line| *line == "p:cycle")
        .count();
    assert_eq!(cycles, 3);
}

#[test]
fn test_system_with_both_forms_called_twice_per_event() {
    let log = Log::default();
    let mut sim = Simulation::new().with_system(recorder("b", Interest::BOTH, &log));
    sim.run(3).unwrap();
    let cycle_calls = log
        .borrow()
        .iter()
        .filter(|line| line.starts_with("b:cycle"))
        .count();
    assert_eq!(cycle_calls, 6);
    assert_eq!(log.borrow()[0], "b:sim_start");
    assert_eq!(log.borrow()[1], "b:sim_start@0");
}

#[test]
fn test_with_systems_appends_boxed_systems() {
    let log = Log::default();
    let systems: Vec<Box<dyn System>> = vec![
        Box::new(recorder("x", Interest::NONE, &log)),
        Box::new(recorder("y", Interest::NONE, &log)),
    ];
    let sim = Simulation::new()
        .with_system(recorder("w", Interest::NONE, &log))
        .with_systems(systems);
    assert_eq!(sim.system_names(), vec!["w", "x", "y"]);
}

#[test]
fn test_systems_mutate_components() {
    let mut sim = Simulation::new().with_system(Mover);
    let moving = sim
        .create()
        .unwrap()
        .attach(Position(0, 0))
        .unwrap()
        .attach(Velocity(2, -1))
        .unwrap()
        .id();
    let still = sim.create().unwrap().attach(Position(5, 5)).unwrap().id();

    sim.run(10).unwrap();

    assert_eq!(*sim.directory().get::<Position>(moving).unwrap(), Position(20, -10));
    assert_eq!(*sim.directory().get::<Position>(still).unwrap(), Position(5, 5));
}

#[test]
fn test_removals_leave_holes_until_next_interval() {
    let mut sim = Simulation::from_config(SimConfig::default().with_compaction_interval(4))
        .with_system(Reaper { at_cycle: 1 });
    for i in 0..10 {
        let entity = sim.create().unwrap().attach(Position(i, 0)).unwrap();
        if i % 2 == 0 {
            entity.attach(Doomed).unwrap();
        }
    }

    sim.run(3).unwrap();
    // Cycle 0 compacted nothing; cycle 1 removed; no compaction at 1 or 2.
    let pool = sim.directory().pool::<Position>().unwrap();
    assert_eq!(pool.len(), 10);
    assert_eq!(pool.live_count(), 5);
}

#[test]
fn test_compaction_runs_on_interval_cycles() {
    let mut sim = Simulation::from_config(SimConfig::default().with_compaction_interval(4))
        .with_system(Reaper { at_cycle: 1 });
    for i in 0..10 {
        let entity = sim.create().unwrap().attach(Position(i, 0)).unwrap();
        if i % 2 == 0 {
            entity.attach(Doomed).unwrap();
        }
    }

    sim.run(5).unwrap();
    let pool = sim.directory().pool::<Position>().unwrap();
    assert_eq!(pool.len(), 5);
    assert_eq!(pool.live_count(), 5);
    let mut xs = Vec::new();
    pool.for_each(|_, pos| xs.push(pos.0)).unwrap();
    xs.sort();
    assert_eq!(xs, vec![1, 3, 5, 7, 9]);
}

#[test]
fn test_default_interval_compacts_every_hundred_cycles() {
    let mut sim = Simulation::new().with_system(Reaper { at_cycle: 0 });
    for i in 0..4 {
        sim.create()
            .unwrap()
            .attach(Position(i, 0))
            .unwrap()
            .attach(Doomed)
            .unwrap();
    }
    sim.create().unwrap().attach(Position(9, 9)).unwrap();

    // Cycle 0 removes after PostCycle and compacts right away.
    sim.run(1).unwrap();
    assert_eq!(sim.directory().pool::<Position>().unwrap().len(), 1);
}

#[test]
fn test_system_error_aborts_run_unmodified() {
    let log = Log::default();
    let mut sim = Simulation::new()
        .with_system(FailAt { cycle: 2 })
        .with_system(recorder("after", Interest::PLAIN, &log));

    let err = sim.run(10).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SimError>(),
        Some(SimError::NoComponent {
            component: "Position",
            ..
        })
    ));
    assert_eq!(sim.cycle(), 2);
    assert_eq!(sim.state(), sim_system::SimState::Finished);

    let log = log.borrow();
    assert!(!log.iter().any(|line| line == "after:sim_end"));
    assert_eq!(log.last().map(String::as_str), Some("after:pre_cycle"));
}

#[test]
fn test_run_after_failure_is_rejected() {
    let mut sim = Simulation::new().with_system(FailAt { cycle: 0 });
    assert!(sim.run(1).is_err());
    let err = sim.run(1).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SimError>(),
        Some(SimError::AlreadyFinished)
    ));
}
