//! Axis-aligned rectangular regions
//!
//! A [`Region`] is stored as a center and half-extents. It serves both as the
//! bounding volume of a quad-tree node and as an ad-hoc query range. All tests
//! use closed intervals, so a point exactly on an edge is contained.

use crate::foundation::math::Vec2;

/// One of the four children of a subdivided region
///
/// Directions use screen coordinates: north is negative y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// +x, -y
    NorthEast,
    /// -x, -y
    NorthWest,
    /// +x, +y
    SouthEast,
    /// -x, +y
    SouthWest,
}

impl Quadrant {
    /// Fixed traversal order used for insertion and queries
    pub const ALL: [Self; 4] = [Self::NorthEast, Self::NorthWest, Self::SouthEast, Self::SouthWest];

    const fn signs(self) -> (f32, f32) {
        match self {
            Self::NorthEast => (1.0, -1.0),
            Self::NorthWest => (-1.0, -1.0),
            Self::SouthEast => (1.0, 1.0),
            Self::SouthWest => (-1.0, 1.0),
        }
    }
}

/// Axis-aligned rectangle given by center and half-extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Center of the rectangle
    pub center: Vec2,
    /// Half width and half height
    pub half_extents: Vec2,
}

impl Region {
    /// Create a region from its center and half-extents
    pub const fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self { center, half_extents }
    }

    /// Square region centered on a point
    pub fn square(center: Vec2, half_extent: f32) -> Self {
        Self::new(center, Vec2::new(half_extent, half_extent))
    }

    /// Region covering `[0, width] x [0, height]`
    pub fn from_bounds(width: f32, height: f32) -> Self {
        let half = Vec2::new(width * 0.5, height * 0.5);
        Self::new(half, half)
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Inclusive point-in-rectangle test
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.contains_with_margin(point, 0.0)
    }

    /// Inclusive point-in-rectangle test with the half-extents grown by `margin`
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        let hw = self.half_extents.x + margin;
        let hh = self.half_extents.y + margin;
        point.x >= self.center.x - hw
            && point.x <= self.center.x + hw
            && point.y >= self.center.y - hh
            && point.y <= self.center.y + hh
    }

    /// Separating-axis overlap test; touching rectangles intersect
    pub fn intersects(&self, other: &Self) -> bool {
        let separated = other.center.x + other.half_extents.x < self.center.x - self.half_extents.x
            || other.center.x - other.half_extents.x > self.center.x + self.half_extents.x
            || other.center.y + other.half_extents.y < self.center.y - self.half_extents.y
            || other.center.y - other.half_extents.y > self.center.y + self.half_extents.y;
        !separated
    }

    /// Child region for one quadrant: half the extents, center offset by a quarter size
    pub fn quadrant(&self, quadrant: Quadrant) -> Self {
        let half = self.half_extents * 0.5;
        let (sx, sy) = quadrant.signs();
        Self::new(
            Vec2::new(self.center.x + half.x * sx, self.center.y + half.y * sy),
            half,
        )
    }

    /// True when both half-extents are positive and finite
    pub fn is_valid(&self) -> bool {
        self.half_extents.x > 0.0
            && self.half_extents.y > 0.0
            && self.half_extents.x.is_finite()
            && self.half_extents.y.is_finite()
            && self.center.x.is_finite()
            && self.center.y.is_finite()
    }
}
