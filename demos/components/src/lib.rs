//! Demo component definitions for the cycle simulation engine.
//!
//! These are plain data components used by the demo systems: appearance
//! ([`Color`], [`Sprite`]), movement targets ([`Target`] and the markers that
//! decide how it is chosen) and interactions ([`DestroyByTouch`]).
//!
//! Marker components generic over `T` refer to "entities that carry a `T`
//! component", e.g. `FollowClosest<Grass>` chases the nearest grass entity.

use std::marker::PhantomData;

use sim_component::{Component, EntityId};
use sim_math::IVec2;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, u8::MAX)
    }

    /// Create a color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Perceived brightness in `0..=255`.
    #[must_use]
    pub fn luma(&self) -> u8 {
        let weighted = 299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b);
        u8::try_from(weighted / 1000).unwrap_or(u8::MAX)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A filled rectangle drawn at the entity's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Fill color.
    pub color: Color,
    /// Width in world units.
    pub width: i32,
    /// Height in world units.
    pub height: i32,
}

impl Sprite {
    /// Default width and height.
    pub const DEFAULT_SIZE: i32 = 10;

    /// A default-sized sprite of the given color.
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
        }
    }

    /// Override the size.
    #[must_use]
    pub const fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new(Color::default())
    }
}

impl Component for Sprite {
    fn type_name() -> &'static str {
        "Sprite"
    }
}

/// The point a movable entity is currently heading to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Target {
    /// Target position on the grid.
    pub position: IVec2,
}

impl Target {
    /// Create a target at `(x, y)`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            position: IVec2::new(x, y),
        }
    }
}

impl Component for Target {
    fn type_name() -> &'static str {
        "Target"
    }
}

/// Wander randomly instead of heading for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomTarget;

impl Component for RandomTarget {
    fn type_name() -> &'static str {
        "RandomTarget"
    }
}

/// Head for a fixed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEntityTarget {
    /// The entity to approach.
    pub entity: EntityId,
}

impl Component for StaticEntityTarget {
    fn type_name() -> &'static str {
        "StaticEntityTarget"
    }
}

/// Move away from a fixed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEntityAvoid {
    /// The entity to flee from.
    pub entity: EntityId,
}

impl Component for StaticEntityAvoid {
    fn type_name() -> &'static str {
        "StaticEntityAvoid"
    }
}

/// Head for the closest entity that has a `T`.
pub struct FollowClosest<T>(PhantomData<fn() -> T>);

/// Move away from the closest entity that has a `T`, while it is within
/// `radius`.
pub struct AvoidClosest<T> {
    /// Only entities closer than this are avoided.
    pub radius: i32,
    marker: PhantomData<fn() -> T>,
}

/// Destroy entities that have a `T` when they come within `min_distance`.
pub struct DestroyByTouch<T> {
    /// Touch distance in world units.
    pub min_distance: i32,
    marker: PhantomData<fn() -> T>,
}

impl<T> FollowClosest<T> {
    /// Create the marker.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FollowClosest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AvoidClosest<T> {
    /// Default avoidance radius.
    pub const DEFAULT_RADIUS: i32 = 100;

    /// Avoid within `radius`.
    #[must_use]
    pub const fn new(radius: i32) -> Self {
        Self {
            radius,
            marker: PhantomData,
        }
    }
}

impl<T> Default for AvoidClosest<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

impl<T> DestroyByTouch<T> {
    /// Default touch distance.
    pub const DEFAULT_MIN_DISTANCE: i32 = 5;

    /// Destroy within `min_distance`.
    #[must_use]
    pub const fn new(min_distance: i32) -> Self {
        Self {
            min_distance,
            marker: PhantomData,
        }
    }

    /// The squared touch distance, for comparing with squared distances.
    #[must_use]
    pub fn min_distance_squared(&self) -> i64 {
        let d = i64::from(self.min_distance);
        d * d
    }
}

impl<T> Default for DestroyByTouch<T> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_DISTANCE)
    }
}

impl<T: 'static> Component for FollowClosest<T> {}
impl<T: 'static> Component for AvoidClosest<T> {}
impl<T: 'static> Component for DestroyByTouch<T> {}

impl<T> std::fmt::Debug for FollowClosest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FollowClosest<{}>", std::any::type_name::<T>())
    }
}

impl<T> std::fmt::Debug for AvoidClosest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvoidClosest")
            .field("of", &std::any::type_name::<T>())
            .field("radius", &self.radius)
            .finish()
    }
}

impl<T> std::fmt::Debug for DestroyByTouch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestroyByTouch")
            .field("of", &std::any::type_name::<T>())
            .field("min_distance", &self.min_distance)
            .finish()
    }
}
