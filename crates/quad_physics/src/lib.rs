//! # Quad Physics
//!
//! Two-dimensional simulation of circular rigid bodies with elastic
//! collisions inside a rectangular world.
//!
//! ## Features
//!
//! - **Two Broad Phases**: exhaustive O(n²) pair enumeration and a quad-tree
//!   index rebuilt every pass, switchable at runtime
//! - **Shared Narrow Phase**: mass-weighted positional correction followed by
//!   an impulse along the contact normal
//! - **Configuration**: TOML or RON files with per-field defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quad_physics::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let mut simulation = Simulation::from_seed(SimulationConfig::default(), 7)?;
//!
//!     for _ in 0..60 {
//!         simulation.advance();
//!     }
//!     simulation.toggle_mode();
//!     let report = simulation.step(1.0 / 60.0);
//!     println!("{} contacts with {}", report.contacts.len(), report.mode);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod simulation;
pub mod spatial;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SimulationConfig},
        foundation::math::Vec2,
        physics::{Body, BodyHandle, BodyRegistry, BroadPhaseMode, CollisionSystem, PassReport, PhysicsError},
        simulation::{initialize, spawn_body, step, Simulation, SimulationError},
        spatial::{Quadtree, QuadtreeConfig, Region, SpatialError},
    };
}
