//! Simulation driver
//!
//! Free functions cover the programmatic surface a host loop needs
//! ([`initialize`], [`spawn_body`], [`step`]); [`Simulation`] bundles them
//! with the registry, random source and the currently selected broad phase.

use crate::config::{ConfigError, Rgb, SimulationConfig};
use crate::foundation::math::Vec2;
use crate::physics::{
    integrate, Body, BodyHandle, BodyRegistry, BroadPhaseMode, CollisionSystem, PassReport, PhysicsError,
};
use crate::spatial::SpatialError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Simulation-level errors
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A body could not be created
    #[error("Body error: {0}")]
    Physics(#[from] PhysicsError),

    /// The spatial index rejected the world bounds
    #[error("Spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}

/// Create the initial population described by `config`
///
/// Positions are uniform inside the world shrunk by `spawn_margin`; radius,
/// velocity and palette tag are drawn from the configured ranges.
pub fn initialize<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<BodyRegistry, SimulationError> {
    config.validate()?;

    let world = &config.world;
    let margin = world.spawn_margin;
    let mut registry = BodyRegistry::with_capacity(config.bodies.count);

    for _ in 0..config.bodies.count {
        let position = Vec2::new(
            rng.gen_range(margin..=world.width - margin),
            rng.gen_range(margin..=world.height - margin),
        );
        registry.add(random_body(position, config, rng)?);
    }

    log::info!(
        "Initialized {} bodies in a {} x {} world",
        registry.len(),
        world.width,
        world.height
    );
    Ok(registry)
}

/// Append a body at `position` with randomized radius, velocity and tag
pub fn spawn_body<R: Rng + ?Sized>(
    registry: &mut BodyRegistry,
    position: Vec2,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<BodyHandle, SimulationError> {
    let body = random_body(position, config, rng)?;
    let radius = body.radius();
    let handle = registry.add(body);

    log::debug!(
        "Spawned body {} at ({:.1}, {:.1}) with radius {:.1}",
        handle.index(),
        position.x,
        position.y,
        radius
    );
    Ok(handle)
}

/// Advance one frame: integrate, then run the collision pass
pub fn step(
    registry: &mut BodyRegistry,
    collision_system: &CollisionSystem,
    mode: BroadPhaseMode,
    config: &SimulationConfig,
    dt: f32,
) -> PassReport {
    integrate(registry, config.world.width, config.world.height, dt);
    collision_system.run_pass(registry, mode)
}

fn random_body<R: Rng + ?Sized>(position: Vec2, config: &SimulationConfig, rng: &mut R) -> Result<Body, PhysicsError> {
    let [min_radius, max_radius] = config.bodies.radius_range;
    let [min_velocity, max_velocity] = config.bodies.velocity_range;

    let radius = if min_radius < max_radius {
        rng.gen_range(min_radius..=max_radius)
    } else {
        min_radius
    };
    let velocity = if min_velocity < max_velocity {
        Vec2::new(
            rng.gen_range(min_velocity..=max_velocity),
            rng.gen_range(min_velocity..=max_velocity),
        )
    } else {
        Vec2::new(min_velocity, min_velocity)
    };
    let tag = if config.palette.is_empty() {
        0
    } else {
        u32::try_from(rng.gen_range(0..config.palette.len())).unwrap_or(0)
    };

    Body::with_mass_factor(position, velocity, radius, config.bodies.mass_per_radius, tag)
}

/// A running simulation
///
/// Owns the body registry, the random source used for spawns, and the
/// broad-phase mode. Mode changes take effect on the next step.
pub struct Simulation<R: Rng = StdRng> {
    registry: BodyRegistry,
    config: SimulationConfig,
    collision_system: CollisionSystem,
    rng: R,
    mode: BroadPhaseMode,
    frame: u64,
}

impl Simulation<StdRng> {
    /// Create a simulation with a deterministic random source
    pub fn from_seed(config: SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Validate `config`, populate the world and prepare the collision system
    pub fn new(config: SimulationConfig, mut rng: R) -> Result<Self, SimulationError> {
        let registry = initialize(&config, &mut rng)?;
        let collision_system = CollisionSystem::new(config.world.bounds(), config.quadtree.clone(), config.restitution)?;
        let mode = config.initial_mode;

        log::info!("Simulation ready, broad phase: {}", mode);

        Ok(Self {
            registry,
            config,
            collision_system,
            rng,
            mode,
            frame: 0,
        })
    }

    /// Advance one frame by `dt` seconds
    pub fn step(&mut self, dt: f32) -> PassReport {
        self.frame += 1;
        step(&mut self.registry, &self.collision_system, self.mode, &self.config, dt)
    }

    /// Advance one frame using the configured time step
    pub fn advance(&mut self) -> PassReport {
        self.step(self.config.time_step)
    }

    /// Add a body at `position` (e.g. where the user clicked)
    pub fn spawn_body(&mut self, position: Vec2) -> Result<BodyHandle, SimulationError> {
        spawn_body(&mut self.registry, position, &self.config, &mut self.rng)
    }

    /// Add a body at a uniformly random position inside the world
    pub fn spawn_random(&mut self) -> Result<BodyHandle, SimulationError> {
        let position = Vec2::new(
            self.rng.gen_range(0.0..=self.config.world.width),
            self.rng.gen_range(0.0..=self.config.world.height),
        );
        self.spawn_body(position)
    }

    /// Current broad-phase mode
    pub const fn mode(&self) -> BroadPhaseMode {
        self.mode
    }

    /// Select the broad-phase mode for subsequent steps
    pub fn set_mode(&mut self, mode: BroadPhaseMode) {
        if mode != self.mode {
            log::info!("Broad phase: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Switch to the other broad-phase mode and return it
    pub fn toggle_mode(&mut self) -> BroadPhaseMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Bodies
    pub const fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Configuration in use
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Collision system in use
    pub const fn collision_system(&self) -> &CollisionSystem {
        &self.collision_system
    }

    /// Frames stepped so far
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Palette color for a body's tag
    pub fn color_of(&self, body: &Body) -> Option<Rgb> {
        usize::try_from(body.tag)
            .ok()
            .and_then(|index| self.config.palette.get(index).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::overlaps;

    fn small_config(count: usize) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.bodies.count = count;
        config
    }

    #[test]
    fn test_initialize_respects_ranges() {
        let config = small_config(300);
        let mut rng = StdRng::seed_from_u64(11);

        let registry = initialize(&config, &mut rng).unwrap();

        assert_eq!(registry.len(), 300);
        for body in registry.iter() {
            assert!((60.0..=940.0).contains(&body.position.x));
            assert!((60.0..=640.0).contains(&body.position.y));
            assert!((12.0..=28.0).contains(&body.radius()));
            assert!((-150.0..=150.0).contains(&body.velocity.x));
            assert!((-150.0..=150.0).contains(&body.velocity.y));
            assert!((body.mass() - body.radius() * 0.9).abs() < 1e-5);
            assert!(body.tag < 3);
        }
    }

    #[test]
    fn test_initialize_is_deterministic_per_seed() {
        let config = small_config(50);
        let first = initialize(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let second = initialize(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let other = initialize(&config, &mut StdRng::seed_from_u64(6)).unwrap();

        assert_eq!(first.as_slice(), second.as_slice());
        assert_ne!(first.as_slice(), other.as_slice());
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let mut config = small_config(10);
        config.bodies.radius_range = [-1.0, 5.0];

        let result = initialize(&config, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(SimulationError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_fixed_ranges() {
        let mut config = small_config(4);
        config.bodies.radius_range = [10.0, 10.0];
        config.bodies.velocity_range = [0.0, 0.0];

        let registry = initialize(&config, &mut StdRng::seed_from_u64(3)).unwrap();
        for body in registry.iter() {
            assert_eq!(body.radius(), 10.0);
            assert_eq!(body.velocity, Vec2::zeros());
        }
    }

    #[test]
    fn test_spawn_body_appends_at_position() {
        let config = small_config(3);
        let mut rng = StdRng::seed_from_u64(9);
        let mut registry = initialize(&config, &mut rng).unwrap();

        let handle = spawn_body(&mut registry, Vec2::new(123.0, 456.0), &config, &mut rng).unwrap();

        assert_eq!(handle.index(), 3);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(handle).unwrap().position, Vec2::new(123.0, 456.0));
    }

    #[test]
    fn test_step_integrates_then_resolves() {
        let config = small_config(0);
        let system = CollisionSystem::new(config.world.bounds(), config.quadtree.clone(), config.restitution).unwrap();
        let mut registry = BodyRegistry::new();
        registry.add(Body::with_mass_factor(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0), 10.0, 0.9, 0).unwrap());
        registry.add(Body::with_mass_factor(Vec2::new(121.0, 100.0), Vec2::new(-100.0, 0.0), 10.0, 0.9, 0).unwrap());

        // After 0.016s the centers are 17.8 apart: overlapping and approaching
        let report = step(&mut registry, &system, BroadPhaseMode::Exhaustive, &config, 0.016);

        assert_eq!(report.contacts.len(), 1);
        let bodies = registry.as_slice();
        assert!(!overlaps(&bodies[0], &bodies[1]));
        assert!(((bodies[0].position - bodies[1].position).magnitude() - 20.0).abs() < 1e-3);
        assert!(bodies[0].velocity.x < 0.0);
        assert!(bodies[1].velocity.x > 0.0);
    }

    #[test]
    fn test_simulation_mode_and_spawn() {
        let mut config = small_config(20);
        config.initial_mode = BroadPhaseMode::Indexed;
        let mut simulation = Simulation::from_seed(config, 1).unwrap();

        assert_eq!(simulation.mode(), BroadPhaseMode::Indexed);
        assert_eq!(simulation.collision_system().world_bounds(), &simulation.config().world.bounds());
        assert_eq!(simulation.toggle_mode(), BroadPhaseMode::Exhaustive);
        simulation.set_mode(BroadPhaseMode::Indexed);
        assert_eq!(simulation.mode(), BroadPhaseMode::Indexed);

        let handle = simulation.spawn_body(Vec2::new(500.0, 350.0)).unwrap();
        assert_eq!(simulation.registry().len(), 21);
        let body = simulation.registry().get(handle).unwrap();
        assert!(simulation.color_of(body).is_some());

        simulation.spawn_random().unwrap();
        assert_eq!(simulation.registry().len(), 22);

        let report = simulation.step(0.016);
        assert_eq!(report.mode, BroadPhaseMode::Indexed);
        assert_eq!(simulation.frame(), 1);
    }

    #[test]
    fn test_long_run_stays_finite_in_both_modes() {
        for mode in [BroadPhaseMode::Exhaustive, BroadPhaseMode::Indexed] {
            let mut config = small_config(150);
            config.initial_mode = mode;
            let mut simulation = Simulation::from_seed(config, 77).unwrap();

            for frame in 0..300 {
                if frame % 50 == 0 {
                    simulation.spawn_random().unwrap();
                }
                simulation.advance();
            }

            for body in simulation.registry().iter() {
                assert!(body.position.x.is_finite() && body.position.y.is_finite(), "{mode}");
                assert!(body.velocity.x.is_finite() && body.velocity.y.is_finite(), "{mode}");
            }
            assert_eq!(simulation.registry().len(), 156);
        }
    }
}
