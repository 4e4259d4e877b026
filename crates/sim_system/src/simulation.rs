//! The simulation driver.
//!
//! A [`Simulation`] owns the directory, the entity allocator and the
//! dispatcher, and runs the cycle state machine:
//!
//! ```text
//! NotStarted --run(n)--> Running { cycle } --done or failed--> Finished
//! ```
//!
//! `run(n)` emits `SimStart`, then for each of the `n` cycles `PreCycle`,
//! `Cycle`, `PostCycle` and `Render`, compacting every pool after the four
//! emissions when the configured interval divides the cycle number, and
//! finally `SimEnd`.

use sim_component::{
    Component, ComponentTypeId, Directory, EntityAllocator, EntityId, EntityMut, EntityRef,
    SimError, SimResult,
};
use tracing::{debug, error, info};

use crate::config::SimConfig;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::event::Event;
use crate::system::System;

/// Lifecycle state of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// `run` has not been called yet.
    NotStarted,
    /// `run` is executing; `cycle` is the cycle being processed.
    Running {
        /// Current cycle number.
        cycle: u64,
    },
    /// `run` returned, successfully or not. The simulation cannot run again.
    Finished,
}

/// A cycle-driven simulation over a fixed list of systems.
///
/// # Examples
///
/// ```rust
/// use sim_component::Component;
/// use sim_system::{Context, Event, Interest, Simulation, System};
///
/// struct Age(u64);
/// impl Component for Age {}
///
/// struct Ageing;
///
/// impl System for Ageing {
///     fn interest(&self, event: Event) -> Interest {
///         if event == Event::Cycle { Interest::CONTEXTUAL } else { Interest::NONE }
///     }
///
///     fn on_event_with_context(&mut self, _: Event, ctx: &mut Context<'_>) -> anyhow::Result<()> {
///         ctx.view_mut::<(Age,)>()?.for_each_components(|age| age.0 += 1)?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let mut sim = Simulation::new().with_system(Ageing);
/// let id = sim.create()?.attach(Age(0))?.id();
/// sim.run(10)?;
/// assert_eq!(sim.directory().get::<Age>(id)?.0, 10);
/// # Ok(())
/// # }
/// ```
pub struct Simulation {
    config: SimConfig,
    directory: Directory,
    allocator: EntityAllocator,
    dispatcher: Dispatcher,
    cycle: u64,
    state: SimState,
}

impl Simulation {
    /// Create a simulation with the default configuration and no systems.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(SimConfig::default())
    }

    /// Create a simulation with `config` and no systems.
    #[must_use]
    pub fn from_config(config: SimConfig) -> Self {
        Self {
            directory: Directory::with_capacity(config.component_capacity),
            config,
            allocator: EntityAllocator::new(),
            dispatcher: Dispatcher::new(),
            cycle: 0,
            state: SimState::NotStarted,
        }
    }

    /// Append a system. Systems are called in the order they are added.
    #[must_use]
    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.dispatcher.push(Box::new(system));
        self
    }

    /// Append several boxed systems, in iteration order.
    #[must_use]
    pub fn with_systems(mut self, systems: impl IntoIterator<Item = Box<dyn System>>) -> Self {
        for system in systems {
            self.dispatcher.push(system);
        }
        self
    }

    /// Register component type `T` now, so type IDs follow declaration
    /// order instead of first use.
    ///
    /// # Errors
    ///
    /// [`SimError::TooManyComponentTypes`] if the directory is full.
    pub fn with_component<T: Component>(self) -> SimResult<Self> {
        self.directory.register::<T>()?;
        Ok(self)
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The number of the next cycle to run, starting at 0.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Number of entity IDs issued so far.
    #[must_use]
    pub fn entity_count(&self) -> u32 {
        self.allocator.count()
    }

    /// Names of the systems in dispatch order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        self.dispatcher.system_names()
    }

    /// The component directory.
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// The type ID of `T`, if it has been registered.
    #[must_use]
    pub fn component_type_id<T: Component>(&self) -> Option<ComponentTypeId> {
        self.directory.type_id_of::<T>()
    }

    /// Allocate a new entity and return a mutable handle to it.
    ///
    /// No pool storage is touched until a component is attached.
    ///
    /// # Errors
    ///
    /// [`SimError::EntityIdsExhausted`] once the ID space is used up.
    pub fn create(&mut self) -> SimResult<EntityMut<'_>> {
        let id = self.allocator.allocate()?;
        Ok(self.directory.entity_mut(id))
    }

    /// Read-only handle for `entity`.
    #[must_use]
    pub fn entity(&self, entity: EntityId) -> EntityRef<'_> {
        self.directory.entity(entity)
    }

    /// Run `cycles` cycles, then finish.
    ///
    /// The simulation ends up [`SimState::Finished`] whether the run succeeds
    /// or not.
    ///
    /// # Errors
    ///
    /// [`SimError::AlreadyFinished`] if called a second time. Otherwise the
    /// first error raised by a system or by compaction, unmodified; the rest
    /// of the run is skipped.
    pub fn run(&mut self, cycles: u64) -> anyhow::Result<()> {
        if self.state == SimState::Finished {
            return Err(SimError::AlreadyFinished.into());
        }
        info!(
            cycles,
            systems = self.dispatcher.len(),
            entities = self.allocator.count(),
            component_types = self.directory.component_count(),
            "simulation starting"
        );
        self.state = SimState::Running { cycle: self.cycle };

        let outcome = self.run_cycles(cycles);
        self.state = SimState::Finished;

        match &outcome {
            Ok(()) => info!(
                cycles = self.cycle,
                live_components = self.directory.live_components(),
                "simulation finished"
            ),
            Err(err) => error!(cycle = self.cycle, error = %err, "simulation aborted"),
        }
        outcome
    }

    fn run_cycles(&mut self, cycles: u64) -> anyhow::Result<()> {
        self.emit(Event::SimStart)?;
        for _ in 0..cycles {
            for event in Event::CYCLE_PHASES {
                self.emit(event)?;
            }
            if self.config.compacts_after(self.cycle) {
                let reclaimed = self.directory.compact_all()?;
                debug!(cycle = self.cycle, reclaimed, "compacted pools");
            }
            debug!(cycle = self.cycle, "cycle complete");
            self.cycle += 1;
            self.state = SimState::Running { cycle: self.cycle };
        }
        self.emit(Event::SimEnd)
    }

    fn emit(&mut self, event: Event) -> anyhow::Result<()> {
        let mut ctx = Context::new(self.cycle, &self.directory);
        self.dispatcher.dispatch(event, &mut ctx)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("state", &self.state)
            .field("cycle", &self.cycle)
            .field("entities", &self.allocator.count())
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
