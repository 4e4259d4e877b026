//! 2D grid transform and movement components.
//!
//! Positions are integer grid coordinates. [`Transform`] places an entity,
//! [`Movable`] lets movement systems move it by up to `speed` cells per axis
//! per cycle.

use glam::IVec2;
use sim_component::Component;

/// Position of an entity on the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    /// Grid position.
    pub position: IVec2,
}

impl Transform {
    /// The origin.
    pub const ORIGIN: Self = Self {
        position: IVec2::ZERO,
    };

    /// Create a transform at `(x, y)`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            position: IVec2::new(x, y),
        }
    }

    /// The x coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    /// The y coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Saturates at `i64::MAX` for positions further apart than
    /// `i64` can square, e.g. `i32::MIN` and `i32::MAX` on one axis.
    #[must_use]
    pub fn dist_squared(&self, other: &Transform) -> i64 {
        let dx = i64::from(self.position.x) - i64::from(other.position.x);
        let dy = i64::from(self.position.y) - i64::from(other.position.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: IVec2) -> Self {
        self.position += offset;
        self
    }
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}

/// Marks an entity as movable and sets its speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movable {
    /// Maximum cells moved per axis per cycle.
    pub speed: i32,
}

impl Movable {
    /// Create a movable with the given speed.
    #[must_use]
    pub const fn new(speed: i32) -> Self {
        Self { speed }
    }
}

impl Default for Movable {
    fn default() -> Self {
        Self { speed: 1 }
    }
}

impl Component for Movable {
    fn type_name() -> &'static str {
        "Movable"
    }
}

/// Move `from` towards `to` by at most `speed` cells on each axis, without
/// overshooting.
#[must_use]
pub fn step_towards(from: IVec2, to: IVec2, speed: i32) -> IVec2 {
    let speed = speed.max(0);
    let delta = (to - from).clamp(IVec2::splat(-speed), IVec2::splat(speed));
    from + delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let t = Transform::new(3, -4);
        assert_eq!(t.x(), 3);
        assert_eq!(t.y(), -4);
        assert_eq!(Transform::default(), Transform::ORIGIN);
    }

    #[test]
    fn test_dist_squared() {
        let a = Transform::new(0, 0);
        let b = Transform::new(3, 4);
        assert_eq!(a.dist_squared(&b), 25);
        assert_eq!(b.dist_squared(&a), 25);
        assert_eq!(a.dist_squared(&a), 0);
    }

    #[test]
    fn test_dist_squared_saturates_at_extremes() {
        let a = Transform::new(i32::MIN, 0);
        let b = Transform::new(i32::MAX, 0);
        assert_eq!(a.dist_squared(&b), i64::MAX);
        assert_eq!(b.dist_squared(&a), i64::MAX);

        let corner = Transform::new(i32::MIN, i32::MIN);
        let far = Transform::new(0, i32::MAX);
        assert_eq!(corner.dist_squared(&far), i64::MAX);
    }

    #[test]
    fn test_dist_squared_large_but_exact() {
        let a = Transform::new(-1_000_000, 0);
        let b = Transform::new(1_000_000, 2_000_000);
        assert_eq!(a.dist_squared(&b), 8_000_000_000_000);
    }

    #[test]
    fn test_translated() {
        let t = Transform::new(1, 1).translated(IVec2::new(2, -3));
        assert_eq!(t, Transform::new(3, -2));
    }

    #[test]
    fn test_movable_default_speed() {
        assert_eq!(Movable::default().speed, 1);
    }

    #[test]
    fn test_step_towards_limits_each_axis() {
        let next = step_towards(IVec2::new(0, 0), IVec2::new(10, -1), 3);
        assert_eq!(next, IVec2::new(3, -1));
    }

    #[test]
    fn test_step_towards_does_not_overshoot() {
        let next = step_towards(IVec2::new(5, 5), IVec2::new(6, 5), 3);
        assert_eq!(next, IVec2::new(6, 5));
        assert_eq!(step_towards(next, next, 3), next);
    }
}
