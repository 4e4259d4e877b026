//! # sim_system
//!
//! Event dispatch and the cycle-driving simulation.
//!
//! This crate provides:
//!
//! - [`Event`]: the six events of a simulation run.
//! - [`System`] and [`Interest`]: behavior units and the call forms they
//!   declare per event.
//! - [`Context`]: cycle number plus directory access for one delivery.
//! - [`Dispatcher`]: routes each event to systems in declared order.
//! - [`Simulation`] and [`SimConfig`]: the driver and its configuration.
//!
//! ## Usage
//!
//! ```rust
//! use sim_system::{Event, Interest, Simulation, System};
//!
//! struct Ticker(u64);
//!
//! impl System for Ticker {
//!     fn interest(&self, event: Event) -> Interest {
//!         if event == Event::Cycle { Interest::PLAIN } else { Interest::NONE }
//!     }
//!
//!     fn on_event(&mut self, _event: Event) -> anyhow::Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut sim = Simulation::new().with_system(Ticker(0));
//! sim.run(3)?;
//! assert_eq!(sim.cycle(), 3);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod event;
pub mod simulation;
pub mod system;

pub use config::SimConfig;
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use event::Event;
pub use simulation::{SimState, Simulation};
pub use system::{Interest, System};
