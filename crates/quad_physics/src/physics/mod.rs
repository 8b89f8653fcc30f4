//! Physics module for collision detection and response
//!
//! Provides the body registry, narrow-phase resolution between circles,
//! broad-phase orchestration (exhaustive or quad-tree assisted) and the
//! integration step that moves bodies and reflects them off the walls.

pub mod body;
pub mod collision;
pub mod collision_system;
pub mod integration;

#[cfg(test)]
mod tests;

pub use body::{Body, BodyHandle, BodyRegistry};
pub use collision::{resolve_collision, Contact, ELASTIC};
pub use collision_system::{BroadPhaseMode, CollisionPair, CollisionSystem, PassReport};
pub use integration::integrate;

use thiserror::Error;

/// Errors raised when constructing bodies
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Radius is zero, negative or not finite
    #[error("Body radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    /// Mass is zero, negative or not finite
    #[error("Body mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    /// Position or velocity has a NaN or infinite component
    #[error("Body position and velocity must be finite")]
    NonFiniteState,
}
