//! Axis-aligned world bounds.

use glam::IVec2;

/// An inclusive axis-aligned rectangle on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Smallest allowed coordinates.
    pub min: IVec2,
    /// Largest allowed coordinates.
    pub max: IVec2,
}

impl Bounds {
    /// The default world: `[0, 1000]` on both axes.
    pub const WORLD: Self = Self {
        min: IVec2::new(0, 0),
        max: IVec2::new(1000, 1000),
    };

    /// Create bounds from two corners.
    #[must_use]
    pub const fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Width and height, counting both edges.
    #[must_use]
    pub fn extent(&self) -> IVec2 {
        self.max - self.min + IVec2::ONE
    }

    /// Returns `true` if `point` lies inside, edges included.
    #[must_use]
    pub fn contains(&self, point: IVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Clamp `point` into the bounds.
    #[must_use]
    pub fn clamp(&self, point: IVec2) -> IVec2 {
        point.clamp(self.min, self.max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::WORLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_bounds() {
        let world = Bounds::default();
        assert_eq!(world.extent(), IVec2::new(1001, 1001));
        assert!(world.contains(IVec2::new(0, 1000)));
        assert!(!world.contains(IVec2::new(-1, 10)));
    }

    #[test]
    fn test_clamp() {
        let world = Bounds::WORLD;
        assert_eq!(world.clamp(IVec2::new(-5, 1200)), IVec2::new(0, 1000));
        assert_eq!(world.clamp(IVec2::new(10, 20)), IVec2::new(10, 20));
    }
}
