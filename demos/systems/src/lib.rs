//! Demo systems for the cycle simulation engine.
//!
//! - [`WorldBoundary`] keeps every transform inside the world.
//! - [`RandomMovement`] and [`Movement`] move entities each cycle.
//! - [`FollowClosestResolver`], [`AvoidClosestResolver`] and
//!   [`StaticTargetResolver`] pick movement targets before each cycle.
//! - [`TouchableTargets`] destroys touched entities.
//! - [`AsciiRenderer`] draws the world to a terminal.

pub mod interaction;
pub mod movement;
pub mod render;
pub mod targeting;
pub mod world;

pub use interaction::TouchableTargets;
pub use movement::{Movement, RandomMovement};
pub use render::{AsciiRenderer, RendererConfig};
pub use targeting::{AvoidClosestResolver, FollowClosestResolver, StaticTargetResolver};
pub use world::WorldBoundary;
