//! Rigid circular bodies and the registry that owns them

use crate::foundation::math::{utils, Vec2};
use crate::physics::PhysicsError;

/// Non-owning reference to a body in a [`BodyRegistry`]
///
/// Bodies are never removed, so a handle stays valid for the lifetime of the
/// registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(usize);

impl BodyHandle {
    /// Create a handle from a registry index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Registry index of this handle
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A circular rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Center position
    pub position: Vec2,
    /// Linear velocity in units per second
    pub velocity: Vec2,
    /// Opaque visual tag (palette index), owned by the renderer
    pub tag: u32,
    radius: f32,
    mass: f32,
}

impl Body {
    /// Create a body, rejecting non-positive or non-finite radius and mass
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, mass: f32, tag: u32) -> Result<Self, PhysicsError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        if !utils::is_finite(position) || !utils::is_finite(velocity) {
            return Err(PhysicsError::NonFiniteState);
        }

        Ok(Self {
            position,
            velocity,
            tag,
            radius,
            mass,
        })
    }

    /// Create a body whose mass is `radius * mass_per_radius`
    pub fn with_mass_factor(
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        mass_per_radius: f32,
        tag: u32,
    ) -> Result<Self, PhysicsError> {
        Self::new(position, velocity, radius, radius * mass_per_radius, tag)
    }

    /// Radius (always positive)
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass (always positive)
    pub const fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass
    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    /// Linear momentum
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }
}

/// Authoritative, append-only collection of bodies
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
}

impl BodyRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    /// Create an empty registry with room for `capacity` bodies
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bodies: Vec::with_capacity(capacity),
        }
    }

    /// Append a body and return its handle
    pub fn add(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle::new(self.bodies.len());
        self.bodies.push(body);
        handle
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when the registry holds no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Look up a body
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.index())
    }

    /// Look up a body mutably
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.index())
    }

    /// Borrow two distinct bodies mutably at once
    ///
    /// Returns `None` if the handles are equal or either is out of range.
    pub fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body, &mut Body)> {
        let (i, j) = (a.index(), b.index());
        if i == j || i >= self.bodies.len() || j >= self.bodies.len() {
            return None;
        }

        if i < j {
            let (head, tail) = self.bodies.split_at_mut(j);
            Some((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.bodies.split_at_mut(i);
            Some((&mut tail[0], &mut head[j]))
        }
    }

    /// Iterate over bodies
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Iterate over bodies mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// Iterate over handles and bodies
    pub fn iter_with_handles(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, body)| (BodyHandle::new(index), body))
    }

    /// All handles in insertion order
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> {
        (0..self.bodies.len()).map(BodyHandle::new)
    }

    /// Bodies as a slice
    pub fn as_slice(&self) -> &[Body] {
        &self.bodies
    }

    /// Sum of all momenta
    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }
}
