//! Quad-tree spatial partitioning structure
//!
//! Divides the 2D world into hierarchical regions for fast neighbour queries.
//! A node buckets up to `capacity` bodies; the next insertion subdivides it
//! into four quadrants and all later insertions descend into the first child
//! (in NE, NW, SE, SW order) whose region contains the body.
//!
//! Bodies already resident when a node subdivides stay where they are, so a
//! node can hold `capacity` early bodies on top of an arbitrarily deep
//! subtree. Queries always search both.
//!
//! The tree is meant to be rebuilt every frame from the body registry and
//! dropped afterwards. Entries are [`BodyHandle`]s plus the position the body
//! had when it was inserted.

use crate::foundation::math::Vec2;
use crate::physics::BodyHandle;
use crate::spatial::region::{Quadrant, Region};
use crate::spatial::SpatialError;
use serde::{Deserialize, Serialize};

/// Configuration for quad-tree behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// Bodies a node holds directly before it subdivides
    pub capacity: usize,

    /// Maximum subdivision depth; nodes at this depth keep accepting bodies
    pub max_depth: u32,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            capacity: 6,
            max_depth: 16,
        }
    }
}

/// Body stored in the quad-tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadtreeEntry {
    /// Registry handle of the body
    pub handle: BodyHandle,
    /// Position at insertion time
    pub position: Vec2,
}

/// Single node in the quad-tree hierarchy
#[derive(Debug, Clone)]
pub struct QuadtreeNode {
    bounds: Region,
    entries: Vec<QuadtreeEntry>,
    children: Option<Box<[QuadtreeNode; 4]>>,
    depth: u32,
}

impl QuadtreeNode {
    /// Create a new empty node
    pub fn new(bounds: Region, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Region covered by this node
    pub const fn bounds(&self) -> &Region {
        &self.bounds
    }

    /// Bodies stored directly in this node
    pub fn entries(&self) -> &[QuadtreeEntry] {
        &self.entries
    }

    /// Children in NE, NW, SE, SW order, if subdivided
    pub fn children(&self) -> Option<&[QuadtreeNode; 4]> {
        self.children.as_deref()
    }

    /// Child for one quadrant, if subdivided
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadtreeNode> {
        let children = self.children.as_deref()?;
        let index = Quadrant::ALL.iter().position(|&q| q == quadrant)?;
        children.get(index)
    }

    /// Check if this node has been subdivided
    pub const fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Depth in the tree (0 = root)
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Subdivide this node into 4 children
    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        let depth = self.depth + 1;
        let bounds = self.bounds;
        self.children = Some(Box::new(
            Quadrant::ALL.map(|quadrant| Self::new(bounds.quadrant(quadrant), depth)),
        ));
    }

    /// Insert a body into this node or one of its descendants
    pub fn insert(&mut self, entry: QuadtreeEntry, config: &QuadtreeConfig) -> bool {
        if !self.bounds.contains_point(entry.position) {
            return false;
        }

        if !self.is_subdivided() {
            if self.entries.len() < config.capacity || self.depth >= config.max_depth {
                self.entries.push(entry);
                return true;
            }
            self.subdivide();
        }

        match self.children {
            Some(ref mut children) => children.iter_mut().any(|child| child.insert(entry, config)),
            None => false,
        }
    }

    /// Collect every body whose stored position lies inside `range`
    pub fn query(&self, range: &Region, results: &mut Vec<BodyHandle>) {
        self.query_with(range, &|entry: &QuadtreeEntry| entry.position, results);
    }

    /// Collect every body whose position, as reported by `position_of`, lies
    /// inside `range`
    ///
    /// Pruning still uses the node regions fixed at insert time; only the
    /// per-entry containment test sees the reported position.
    pub fn query_with<F>(&self, range: &Region, position_of: &F, results: &mut Vec<BodyHandle>)
    where
        F: Fn(&QuadtreeEntry) -> Vec2,
    {
        if !range.intersects(&self.bounds) {
            return;
        }

        results.extend(
            self.entries
                .iter()
                .filter(|entry| range.contains_point(position_of(entry)))
                .map(|entry| entry.handle),
        );

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_with(range, position_of, results);
            }
        }
    }

    /// Find the node that directly stores a body
    pub fn find_node(&self, handle: BodyHandle) -> Option<&QuadtreeNode> {
        if self.entries.iter().any(|entry| entry.handle == handle) {
            return Some(self);
        }

        self.children
            .as_deref()?
            .iter()
            .find_map(|child| child.find_node(handle))
    }

    /// Count total entries in this node and all children
    pub fn count_entries(&self) -> usize {
        self.entries.len()
            + self
                .children
                .as_deref()
                .map_or(0, |children| children.iter().map(Self::count_entries).sum())
    }

    /// Count this node and all descendants
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_deref()
            .map_or(0, |children| children.iter().map(Self::count_nodes).sum())
    }

    /// Deepest depth reached below (and including) this node
    pub fn max_depth_reached(&self) -> u32 {
        self.children.as_deref().map_or(self.depth, |children| {
            children
                .iter()
                .map(Self::max_depth_reached)
                .max()
                .unwrap_or(self.depth)
        })
    }
}

/// Quad-tree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Quadtree {
    root: QuadtreeNode,
    config: QuadtreeConfig,
}

impl Quadtree {
    /// Create an empty quad-tree covering `bounds`
    pub fn new(bounds: Region, config: QuadtreeConfig) -> Result<Self, SpatialError> {
        if !bounds.is_valid() {
            return Err(SpatialError::DegenerateBounds {
                half_width: bounds.half_extents.x,
                half_height: bounds.half_extents.y,
            });
        }
        if config.capacity == 0 {
            return Err(SpatialError::ZeroCapacity);
        }

        Ok(Self {
            root: QuadtreeNode::new(bounds, 0),
            config,
        })
    }

    /// Insert a body; returns false if the position is outside the root bounds
    pub fn insert(&mut self, handle: BodyHandle, position: Vec2) -> bool {
        self.root.insert(QuadtreeEntry { handle, position }, &self.config)
    }

    /// Append every body whose stored position lies inside `range` to `results`
    pub fn query(&self, range: &Region, results: &mut Vec<BodyHandle>) {
        self.root.query(range, results);
    }

    /// Like [`Quadtree::query`], testing entries against `position_of`
    /// instead of their insert-time positions
    pub fn query_with<F>(&self, range: &Region, position_of: F, results: &mut Vec<BodyHandle>)
    where
        F: Fn(&QuadtreeEntry) -> Vec2,
    {
        self.root.query_with(range, &position_of, results);
    }

    /// Collect every body whose stored position lies inside `range`
    pub fn query_range(&self, range: &Region) -> Vec<BodyHandle> {
        let mut results = Vec::new();
        self.query(range, &mut results);
        results
    }

    /// Root node
    pub const fn root(&self) -> &QuadtreeNode {
        &self.root
    }

    /// Configuration
    pub const fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Root bounds
    pub const fn bounds(&self) -> &Region {
        &self.root.bounds
    }

    /// Node that directly stores a body
    pub fn find_node(&self, handle: BodyHandle) -> Option<&QuadtreeNode> {
        self.root.find_node(handle)
    }

    /// Total number of stored bodies
    pub fn len(&self) -> usize {
        self.root.count_entries()
    }

    /// True when no body is stored
    pub fn is_empty(&self) -> bool {
        self.root.entries.is_empty() && !self.root.is_subdivided()
    }

    /// Total number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Deepest node depth
    pub fn depth(&self) -> u32 {
        self.root.max_depth_reached()
    }

    /// Remove all bodies, keeping bounds and configuration
    pub fn clear(&mut self) {
        self.root = QuadtreeNode::new(self.root.bounds, 0);
    }
}
