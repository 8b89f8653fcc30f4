//! Math utilities and types
//!
//! Provides the 2D vector type used by geometry tests and collision response.
//! Addition, subtraction, scaling, dot product and length all come from
//! nalgebra; the length of the zero vector is 0.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Math utility functions
pub mod utils {
    use super::Vec2;

    /// Distance between two points
    pub fn distance(a: Vec2, b: Vec2) -> f32 {
        (a - b).magnitude()
    }

    /// Check that both components are finite
    pub fn is_finite(v: Vec2) -> bool {
        v.x.is_finite() && v.y.is_finite()
    }
}
