//! # sim_math
//!
//! Spatial types for the cycle simulation engine. Re-exports [`glam`]'s
//! integer vector and defines grid-based components that implement
//! [`Component`](sim_component::Component).

pub mod bounds;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::IVec2;

pub use bounds::Bounds;
pub use transform::{Movable, Transform, step_towards};
