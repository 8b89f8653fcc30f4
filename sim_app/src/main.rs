//! Collision Demo
//!
//! Runs the circle simulation headless and compares both broad phases:
//! - Starts with the configured population and broad phase
//! - Spawns a body at a random position every `SPAWN_INTERVAL` frames
//! - Switches broad phase half-way through the run
//! - Logs per-mode timing and contact statistics at the end
//!
//! Usage: `collision_demo [config.toml|config.ron] [frames]`

use quad_physics::config::{Config, ConfigError, SimulationConfig};
use quad_physics::foundation::logging;
use quad_physics::foundation::time::{DurationStats, Stopwatch};
use quad_physics::physics::{BroadPhaseMode, PassReport};
use quad_physics::simulation::{Simulation, SimulationError};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_FRAMES: u64 = 600;
const SPAWN_INTERVAL: u64 = 30;
const SEED: u64 = 0x5eed;

/// Demo errors
#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Invalid frame count: {0}")]
    FrameCount(String),
}

/// Aggregated statistics for one broad phase
#[derive(Default)]
struct ModeSummary {
    timings: DurationStats,
    candidate_pairs: usize,
    contacts: usize,
    dropped: usize,
}

impl ModeSummary {
    fn record(&mut self, report: &PassReport) {
        self.timings.record(report.elapsed);
        self.candidate_pairs += report.candidate_pairs;
        self.contacts += report.contacts.len();
        self.dropped += report.dropped.len();
    }

    fn log(&self, mode: BroadPhaseMode) {
        let frames = self.timings.samples();
        if frames == 0 {
            log::info!("{mode}: not run");
            return;
        }
        log::info!(
            "{mode}: {frames} frames, avg {:.3} ms, max {:?}, {:.1} candidates/frame, {:.1} contacts/frame, {} dropped",
            self.timings.average_millis(),
            self.timings.max(),
            self.candidate_pairs as f64 / frames as f64,
            self.contacts as f64 / frames as f64,
            self.dropped
        );
    }
}

struct CollisionDemo {
    simulation: Simulation<StdRng>,
    frames: u64,
    exhaustive: ModeSummary,
    indexed: ModeSummary,
}

impl CollisionDemo {
    fn new(config: SimulationConfig, frames: u64) -> Result<Self, DemoError> {
        let simulation = Simulation::new(config, StdRng::seed_from_u64(SEED))?;
        Ok(Self {
            simulation,
            frames,
            exhaustive: ModeSummary::default(),
            indexed: ModeSummary::default(),
        })
    }

    fn run(mut self) -> Result<(), DemoError> {
        let stopwatch = Stopwatch::start_new();

        for frame in 0..self.frames {
            if frame > 0 && frame % SPAWN_INTERVAL == 0 {
                self.simulation.spawn_random()?;
            }
            if frame == self.frames / 2 {
                self.simulation.toggle_mode();
            }

            let report = self.simulation.advance();
            match report.mode {
                BroadPhaseMode::Exhaustive => self.exhaustive.record(&report),
                BroadPhaseMode::Indexed => self.indexed.record(&report),
            }
        }

        log::info!(
            "Ran {} frames with {} bodies in {:?}",
            self.simulation.frame(),
            self.simulation.registry().len(),
            stopwatch.elapsed()
        );
        self.exhaustive.log(BroadPhaseMode::Exhaustive);
        self.indexed.log(BroadPhaseMode::Indexed);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            SimulationConfig::load_from_file(&path).map_err(DemoError::from)?
        }
        None => SimulationConfig::default(),
    };
    let frames = match args.next() {
        Some(value) => value.parse().map_err(|_| DemoError::FrameCount(value))?,
        None => DEFAULT_FRAMES,
    };

    let demo = CollisionDemo::new(config, frames)?;
    demo.run()?;
    Ok(())
}
