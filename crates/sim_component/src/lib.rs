//! # sim_component
//!
//! Storage and iteration core of the cycle simulation engine.
//!
//! This crate provides:
//!
//! - [`EntityId`] and [`EntityAllocator`]: `u32` entity identifiers, never
//!   reused within a run.
//! - [`Component`]: the contract every stored value satisfies.
//! - [`Pool`]: sparse-set storage for one component type, with soft removal
//!   and explicit compaction.
//! - [`Directory`]: one pool per component type, addressed by type.
//! - [`View`] and [`ViewMut`]: filtered passes over entities that have a
//!   given set of components.
//! - [`EntityRef`] and [`EntityMut`]: entity handles bound to a directory.
//! - [`SimError`]: the error type shared with the simulation driver.

pub mod component;
pub mod directory;
pub mod entity;
pub mod error;
pub mod handle;
pub mod pool;
pub mod query;
pub mod view;

pub use component::{Component, ComponentTypeId};
pub use directory::{DEFAULT_COMPONENT_CAPACITY, Directory};
pub use entity::{EntityAllocator, EntityId};
pub use error::{Access, SimError, SimResult};
pub use handle::{EntityMut, EntityRef};
pub use pool::Pool;
pub use query::Query;
pub use view::{Iter, IterMut, View, ViewMut};
