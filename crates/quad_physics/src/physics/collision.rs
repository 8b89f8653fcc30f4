//! Narrow-phase collision test and response between two circles
//!
//! Resolution happens in two parts:
//! 1. Positional correction fully separates the pair along the contact
//!    normal, split by mass so the heavier body moves less.
//! 2. If the bodies are approaching along the normal, an impulse scaled by
//!    the reduced mass reflects their relative normal velocity.
//!
//! Correction is direct, not iterative. When several bodies overlap at once,
//! resolving one pair can push a body into a third one.

use crate::foundation::math::{utils, Vec2};
use crate::physics::Body;

/// Perfectly elastic restitution
pub const ELASTIC: f32 = 1.0;

/// Result of resolving one overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the second body toward the first
    pub normal: Vec2,
    /// Overlap depth before correction
    pub penetration: f32,
    /// Impulse magnitude applied along the normal (0 if the pair was separating)
    pub impulse: f32,
}

/// Overlap depth between two circles (negative when apart)
pub fn penetration_depth(a: &Body, b: &Body) -> f32 {
    (a.radius() + b.radius()) - utils::distance(a.position, b.position)
}

/// Check whether two circles overlap
pub fn overlaps(a: &Body, b: &Body) -> bool {
    penetration_depth(a, b) > 0.0
}

/// Separate two overlapping bodies and apply an impulse if they approach
///
/// Returns `None` and leaves both bodies untouched when they do not overlap
/// or when their centers coincide.
pub fn resolve_collision(a: &mut Body, b: &mut Body, restitution: f32) -> Option<Contact> {
    let offset = a.position - b.position;
    let distance = offset.magnitude();
    let penetration = (a.radius() + b.radius()) - distance;

    if penetration <= 0.0 || distance == 0.0 {
        return None;
    }

    let normal = offset / distance;
    let total_mass = a.mass() + b.mass();
    a.position += normal * (penetration * (b.mass() / total_mass));
    b.position -= normal * (penetration * (a.mass() / total_mass));

    let normal_velocity = (a.velocity - b.velocity).dot(&normal);
    if normal_velocity >= 0.0 {
        return Some(Contact {
            normal,
            penetration,
            impulse: 0.0,
        });
    }

    let impulse = -(1.0 + restitution) * normal_velocity / (a.inverse_mass() + b.inverse_mass());
    a.velocity += normal * (impulse * a.inverse_mass());
    b.velocity -= normal * (impulse * b.inverse_mass());

    Some(Contact {
        normal,
        penetration,
        impulse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const EPSILON: f32 = 1e-4;

    fn body(position: Vec2, velocity: Vec2, radius: f32, mass: f32) -> Body {
        Body::new(position, velocity, radius, mass, 0).unwrap()
    }

    #[test]
    fn test_penetration_elimination_equal_mass() {
        let mut a = body(Vec2::new(15.0, 0.0), Vec2::zeros(), 10.0, 1.0);
        let mut b = body(Vec2::new(0.0, 0.0), Vec2::zeros(), 10.0, 1.0);

        let contact = resolve_collision(&mut a, &mut b, ELASTIC).unwrap();

        assert_relative_eq!(contact.penetration, 5.0, epsilon = EPSILON);
        assert_relative_eq!(contact.normal, Vec2::new(1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!((a.position - b.position).magnitude(), 20.0, epsilon = EPSILON);
        assert_relative_eq!(a.position, Vec2::new(17.5, 0.0), epsilon = EPSILON);
        assert_relative_eq!(b.position, Vec2::new(-2.5, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_heavier_body_moves_less() {
        let mut light = body(Vec2::new(15.0, 0.0), Vec2::zeros(), 10.0, 1.0);
        let mut heavy = body(Vec2::new(0.0, 0.0), Vec2::zeros(), 10.0, 3.0);

        resolve_collision(&mut light, &mut heavy, ELASTIC).unwrap();

        assert_relative_eq!(light.position.x - 15.0, 3.75, epsilon = EPSILON);
        assert_relative_eq!(-heavy.position.x, 1.25, epsilon = EPSILON);
    }

    #[test]
    fn test_no_op_when_apart_or_touching() {
        let a0 = body(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 5.0, 2.0);
        let b0 = body(Vec2::new(10.0, 0.0), Vec2::new(-1.0, 0.0), 5.0, 2.0);
        let (mut a, mut b) = (a0.clone(), b0.clone());

        assert!(resolve_collision(&mut a, &mut b, ELASTIC).is_none());
        assert_eq!(a, a0);
        assert_eq!(b, b0);

        b.position = Vec2::new(30.0, 4.0);
        let b1 = b.clone();
        assert!(resolve_collision(&mut a, &mut b, ELASTIC).is_none());
        assert_eq!(b, b1);
    }

    #[test]
    fn test_coincident_centers_are_skipped() {
        let a0 = body(Vec2::new(3.0, 3.0), Vec2::new(1.0, 0.0), 5.0, 1.0);
        let b0 = body(Vec2::new(3.0, 3.0), Vec2::new(-1.0, 0.0), 5.0, 1.0);
        let (mut a, mut b) = (a0.clone(), b0.clone());

        assert!(resolve_collision(&mut a, &mut b, ELASTIC).is_none());
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_separating_pair_keeps_velocity() {
        let mut a = body(Vec2::new(8.0, 0.0), Vec2::new(2.0, 1.0), 5.0, 1.0);
        let mut b = body(Vec2::new(0.0, 0.0), Vec2::new(-3.0, 0.5), 5.0, 2.0);

        let contact = resolve_collision(&mut a, &mut b, ELASTIC).unwrap();

        assert_eq!(contact.impulse, 0.0);
        assert_eq!(a.velocity, Vec2::new(2.0, 1.0));
        assert_eq!(b.velocity, Vec2::new(-3.0, 0.5));
        assert_relative_eq!((a.position - b.position).magnitude(), 10.0, epsilon = EPSILON);
    }

    #[test]
    fn test_stationary_pair_keeps_velocity() {
        let mut a = body(Vec2::new(0.0, 6.0), Vec2::new(1.0, 0.0), 4.0, 1.0);
        let mut b = body(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 4.0, 1.0);

        let contact = resolve_collision(&mut a, &mut b, ELASTIC).unwrap();

        assert_eq!(contact.impulse, 0.0);
        assert_eq!(a.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(b.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_elastic_head_on_equal_mass_swaps_velocity() {
        let mut a = body(Vec2::new(9.0, 0.0), Vec2::new(-4.0, 0.0), 5.0, 1.0);
        let mut b = body(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), 5.0, 1.0);

        let contact = resolve_collision(&mut a, &mut b, ELASTIC).unwrap();

        assert!(contact.impulse > 0.0);
        assert_relative_eq!(a.velocity, Vec2::new(4.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(b.velocity, Vec2::new(-4.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_momentum_conserved_along_normal() {
        let cases = [
            (Vec2::new(6.0, 3.0), Vec2::new(-5.0, 2.0), Vec2::new(1.0, -1.0), 3.0, 1.5),
            (Vec2::new(-2.0, 7.0), Vec2::new(0.0, -9.0), Vec2::new(4.0, 2.0), 0.7, 12.0),
            (Vec2::new(1.0, 1.0), Vec2::new(-1.0, -1.0), Vec2::new(0.5, 0.5), 5.0, 5.0),
        ];

        for (offset, va, vb, ma, mb) in cases {
            let mut a = body(offset, va, 5.0, ma);
            let mut b = body(Vec2::zeros(), vb, 5.0, mb);
            let before = a.momentum() + b.momentum();
            let energy_before = 0.5 * ma * va.magnitude_squared() + 0.5 * mb * vb.magnitude_squared();

            let contact = resolve_collision(&mut a, &mut b, ELASTIC).unwrap();
            let after = a.momentum() + b.momentum();
            let energy_after =
                0.5 * ma * a.velocity.magnitude_squared() + 0.5 * mb * b.velocity.magnitude_squared();

            assert_abs_diff_eq!(before.dot(&contact.normal), after.dot(&contact.normal), epsilon = 1e-3);
            assert_abs_diff_eq!(before, after, epsilon = 1e-3);
            assert_relative_eq!(energy_before, energy_after, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_second_resolution_is_a_no_op() {
        let mut a = body(Vec2::new(7.0, 2.0), Vec2::new(-3.0, 0.0), 5.0, 2.0);
        let mut b = body(Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0), 4.0, 1.0);

        resolve_collision(&mut a, &mut b, ELASTIC).unwrap();
        let (a1, b1) = (a.clone(), b.clone());

        // Visiting the pair again from the other side must not correct twice
        let _ = resolve_collision(&mut b, &mut a, ELASTIC);

        assert_abs_diff_eq!(a.position, a1.position, epsilon = EPSILON);
        assert_abs_diff_eq!(b.position, b1.position, epsilon = EPSILON);
        assert_abs_diff_eq!(a.velocity, a1.velocity, epsilon = EPSILON);
        assert_abs_diff_eq!(b.velocity, b1.velocity, epsilon = EPSILON);
    }

    #[test]
    fn test_overlap_helpers() {
        let a = body(Vec2::new(0.0, 0.0), Vec2::zeros(), 3.0, 1.0);
        let b = body(Vec2::new(5.0, 0.0), Vec2::zeros(), 3.0, 1.0);
        let c = body(Vec2::new(6.0, 0.0), Vec2::zeros(), 3.0, 1.0);

        assert_relative_eq!(penetration_depth(&a, &b), 1.0);
        assert!(overlaps(&a, &b));
        assert!(!overlaps(&a, &c));
    }
}
