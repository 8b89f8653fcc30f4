//! Configuration system
//!
//! [`SimulationConfig`] holds everything needed to populate and step a
//! simulation. It can be loaded from (and saved to) `.toml` or `.ron` files
//! through the [`Config`] trait; missing fields fall back to the defaults.
//!
//! ```toml
//! restitution = 1.0
//! time_step = 0.016
//! initial_mode = "indexed"
//! palette = [[255, 0, 0], [255, 165, 0], [255, 105, 180]]
//!
//! [world]
//! width = 1000.0
//! height = 700.0
//! spawn_margin = 60.0
//!
//! [bodies]
//! count = 200
//! radius_range = [12.0, 28.0]
//! velocity_range = [-150.0, 150.0]
//! mass_per_radius = 0.9
//!
//! [quadtree]
//! capacity = 6
//! max_depth = 16
//! ```

pub use serde::{Serialize, Deserialize};

use crate::physics::BroadPhaseMode;
use crate::spatial::{QuadtreeConfig, Region};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot drive a simulation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Simulation world extents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width; x spans `[0, width]`
    pub width: f32,

    /// World height; y spans `[0, height]`
    pub height: f32,

    /// Distance from the walls kept free when placing the initial population
    pub spawn_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            spawn_margin: 60.0,
        }
    }
}

impl WorldConfig {
    /// Region covering the whole world
    pub fn bounds(&self) -> Region {
        Region::from_bounds(self.width, self.height)
    }
}

/// Population and per-body randomization ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Bodies created at start
    pub count: usize,

    /// Inclusive radius range
    pub radius_range: [f32; 2],

    /// Inclusive range for each velocity component
    pub velocity_range: [f32; 2],

    /// Mass = radius * mass_per_radius
    pub mass_per_radius: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            count: 200,
            radius_range: [12.0, 28.0],
            velocity_range: [-150.0, 150.0],
            mass_per_radius: 0.9,
        }
    }
}

/// RGB color used as a visual tag
pub type Rgb = [u8; 3];

/// Top-level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Restitution for collision impulses (1 = perfectly elastic)
    pub restitution: f32,

    /// Fixed time step in seconds
    pub time_step: f32,

    /// Broad phase used until the mode is toggled
    pub initial_mode: BroadPhaseMode,

    /// Colors bodies are tagged with
    pub palette: Vec<Rgb>,

    /// World extents
    pub world: WorldConfig,

    /// Population settings
    pub bodies: BodyConfig,

    /// Spatial index settings
    pub quadtree: QuadtreeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            restitution: 1.0,
            time_step: 0.016,
            initial_mode: BroadPhaseMode::Exhaustive,
            palette: vec![[255, 0, 0], [255, 165, 0], [255, 105, 180]],
            world: WorldConfig::default(),
            bodies: BodyConfig::default(),
            quadtree: QuadtreeConfig::default(),
        }
    }
}

impl Config for SimulationConfig {}

impl SimulationConfig {
    /// Reject values that would produce degenerate bodies or bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if !(world.width > 0.0 && world.height > 0.0 && world.width.is_finite() && world.height.is_finite()) {
            return Err(invalid(format!("world size must be positive, got {} x {}", world.width, world.height)));
        }
        if world.spawn_margin < 0.0 || world.spawn_margin * 2.0 > world.width.min(world.height) {
            return Err(invalid(format!(
                "spawn margin {} does not fit a {} x {} world",
                world.spawn_margin, world.width, world.height
            )));
        }

        let [min_radius, max_radius] = self.bodies.radius_range;
        if !(min_radius > 0.0 && min_radius <= max_radius && max_radius.is_finite()) {
            return Err(invalid(format!("radius range must be positive and ordered, got [{min_radius}, {max_radius}]")));
        }
        let [min_velocity, max_velocity] = self.bodies.velocity_range;
        if !(min_velocity <= max_velocity && min_velocity.is_finite() && max_velocity.is_finite()) {
            return Err(invalid(format!("velocity range must be ordered, got [{min_velocity}, {max_velocity}]")));
        }
        if !(self.bodies.mass_per_radius > 0.0 && self.bodies.mass_per_radius.is_finite()) {
            return Err(invalid(format!("mass per radius must be positive, got {}", self.bodies.mass_per_radius)));
        }

        if self.quadtree.capacity == 0 {
            return Err(invalid("quadtree capacity must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(invalid(format!("restitution must be within [0, 1], got {}", self.restitution)));
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(invalid(format!("time step must be positive, got {}", self.time_step)));
        }
        if self.palette.is_empty() {
            return Err(invalid("palette must contain at least one color".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
