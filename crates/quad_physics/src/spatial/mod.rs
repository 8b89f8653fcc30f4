//! Spatial partitioning data structures
//!
//! Provides the rectangle primitive and the quad-tree used to narrow
//! broad-phase collision candidates in 2D space.

pub mod region;
pub mod quadtree;

pub use quadtree::{Quadtree, QuadtreeConfig, QuadtreeEntry, QuadtreeNode};
pub use region::{Quadrant, Region};

use thiserror::Error;

/// Errors raised when constructing a spatial index
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// Root bounds have a non-positive or non-finite size
    #[error("Degenerate index bounds: half extents {half_width} x {half_height}")]
    DegenerateBounds {
        /// Half width of the rejected bounds
        half_width: f32,
        /// Half height of the rejected bounds
        half_height: f32,
    },

    /// Node capacity of zero would subdivide forever
    #[error("Quadtree node capacity must be at least 1")]
    ZeroCapacity,
}
