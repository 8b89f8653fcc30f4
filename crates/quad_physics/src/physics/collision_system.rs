//! Broad-phase orchestration
//!
//! Collision detection is split into two phases: the broad phase produces
//! candidate pairs cheaply, the narrow phase ([`resolve_collision`]) tests
//! and resolves each candidate. Two broad phases are available:
//!
//! - [`BroadPhaseMode::Exhaustive`] visits every unordered pair once. O(n²),
//!   used as the correctness baseline.
//! - [`BroadPhaseMode::Indexed`] rebuilds a [`Quadtree`] from the registry and
//!   queries a square of half-extent `2 * radius` around every body. The tree
//!   shape is fixed for the pass, but hits are tested against current
//!   positions, so bodies moved by earlier corrections are still found.
//!
//! The indexed phase can visit a pair from both sides. The first visit fully
//! separates the pair and leaves it non-approaching, so the second visit is a
//! no-op up to rounding.

use crate::foundation::time::Stopwatch;
use crate::physics::collision::resolve_collision;
use crate::physics::{BodyHandle, BodyRegistry};
use crate::spatial::{Quadtree, QuadtreeConfig, Region, SpatialError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Broad-phase strategy used for a collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhaseMode {
    /// All unordered pairs
    #[default]
    Exhaustive,
    /// Quad-tree filtered neighbourhoods
    Indexed,
}

impl BroadPhaseMode {
    /// The other strategy
    pub const fn toggled(self) -> Self {
        match self {
            Self::Exhaustive => Self::Indexed,
            Self::Indexed => Self::Exhaustive,
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exhaustive => "Brute Force",
            Self::Indexed => "Quadtree",
        }
    }
}

impl fmt::Display for BroadPhaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unordered pair of bodies that produced a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Body with the smaller handle
    pub body_a: BodyHandle,
    /// Body with the larger handle
    pub body_b: BodyHandle,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller handle first)
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        if body_a < body_b {
            Self { body_a, body_b }
        } else {
            Self { body_a: body_b, body_b: body_a }
        }
    }
}

/// Outcome of one collision pass
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// Strategy that produced this report
    pub mode: BroadPhaseMode,
    /// Number of narrow-phase invocations
    pub candidate_pairs: usize,
    /// Number of narrow-phase invocations that found an overlap
    pub contact_events: usize,
    /// Distinct pairs that overlapped
    pub contacts: HashSet<CollisionPair>,
    /// Bodies the spatial index rejected this pass
    pub dropped: Vec<BodyHandle>,
    /// Nodes in the spatial index (0 for the exhaustive strategy)
    pub index_nodes: usize,
    /// Wall time spent in the pass
    pub elapsed: Duration,
}

/// Collision system driving broad phase and narrow phase over a registry
///
/// Holds configuration only. The spatial index is rebuilt for every indexed
/// pass and dropped when the pass ends.
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    empty_index: Quadtree,
    restitution: f32,

    /// Enable debug logging of every contact
    pub debug_enabled: bool,
}

impl CollisionSystem {
    /// Create a collision system for a world covered by `world_bounds`
    pub fn new(world_bounds: Region, quadtree_config: QuadtreeConfig, restitution: f32) -> Result<Self, SpatialError> {
        Ok(Self {
            empty_index: Quadtree::new(world_bounds, quadtree_config)?,
            restitution,
            debug_enabled: false,
        })
    }

    /// Bounds covered by the spatial index
    pub const fn world_bounds(&self) -> &Region {
        self.empty_index.bounds()
    }

    /// Restitution used for impulse response
    pub const fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Run one collision pass with the given strategy
    pub fn run_pass(&self, registry: &mut BodyRegistry, mode: BroadPhaseMode) -> PassReport {
        let stopwatch = Stopwatch::start_new();
        let mut report = match mode {
            BroadPhaseMode::Exhaustive => self.exhaustive_pass(registry),
            BroadPhaseMode::Indexed => self.indexed_pass(registry),
        };
        report.elapsed = stopwatch.elapsed();

        log::trace!(
            "{} pass: {} bodies, {} candidates, {} contacts, {} dropped, {:?}",
            mode,
            registry.len(),
            report.candidate_pairs,
            report.contacts.len(),
            report.dropped.len(),
            report.elapsed
        );
        report
    }

    /// Build a spatial index from the current body positions
    ///
    /// Returns the index and the bodies that fell outside its bounds.
    pub fn build_index(&self, registry: &BodyRegistry) -> (Quadtree, Vec<BodyHandle>) {
        let mut index = self.empty_index.clone();
        let mut dropped = Vec::new();

        for (handle, body) in registry.iter_with_handles() {
            if !index.insert(handle, body.position) {
                log::debug!("Body {} at {:?} is outside the index bounds, skipped this pass", handle.index(), body.position);
                dropped.push(handle);
            }
        }

        (index, dropped)
    }

    /// Resolve every unordered pair exactly once
    fn exhaustive_pass(&self, registry: &mut BodyRegistry) -> PassReport {
        let mut report = PassReport {
            mode: BroadPhaseMode::Exhaustive,
            ..PassReport::default()
        };

        let count = registry.len();
        for i in 0..count {
            for j in (i + 1)..count {
                self.resolve_pair(registry, BodyHandle::new(i), BodyHandle::new(j), &mut report);
            }
        }

        report
    }

    /// Resolve each body against the neighbours the quad-tree reports
    fn indexed_pass(&self, registry: &mut BodyRegistry) -> PassReport {
        let (index, dropped) = self.build_index(registry);
        let skipped: HashSet<BodyHandle> = dropped.iter().copied().collect();

        let mut report = PassReport {
            mode: BroadPhaseMode::Indexed,
            index_nodes: index.node_count(),
            dropped,
            ..PassReport::default()
        };

        let mut neighbours = Vec::new();
        for slot in 0..registry.len() {
            let handle = BodyHandle::new(slot);
            if skipped.contains(&handle) {
                continue;
            }
            let Some(body) = registry.get(handle) else {
                continue;
            };

            let range = Region::square(body.position, body.radius() * 2.0);
            neighbours.clear();
            index.query_with(
                &range,
                |entry| registry.get(entry.handle).map_or(entry.position, |live| live.position),
                &mut neighbours,
            );

            for &other in &neighbours {
                if other != handle {
                    self.resolve_pair(registry, handle, other, &mut report);
                }
            }
        }

        report
    }

    fn resolve_pair(&self, registry: &mut BodyRegistry, a: BodyHandle, b: BodyHandle, report: &mut PassReport) {
        let Some((body_a, body_b)) = registry.pair_mut(a, b) else {
            return;
        };

        report.candidate_pairs += 1;
        if let Some(contact) = resolve_collision(body_a, body_b, self.restitution) {
            report.contact_events += 1;
            report.contacts.insert(CollisionPair::new(a, b));

            if self.debug_enabled {
                log::debug!(
                    "Contact {} <-> {}: penetration {:.3}, impulse {:.3}",
                    a.index(),
                    b.index(),
                    contact.penetration,
                    contact.impulse
                );
            }
        }
    }
}
