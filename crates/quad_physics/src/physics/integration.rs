//! Explicit Euler integration with wall reflection

use crate::physics::BodyRegistry;

/// Advance every body by `velocity * dt` and reflect off the world walls
///
/// The world spans `[0, width] x [0, height]`. A body whose center is closer
/// than its radius to a wall has the matching velocity component negated.
/// Positions are not clamped, so a fast body may sit outside the world for a
/// frame before the reflected velocity brings it back.
pub fn integrate(registry: &mut BodyRegistry, width: f32, height: f32, dt: f32) {
    for body in registry.iter_mut() {
        body.position += body.velocity * dt;

        let radius = body.radius();
        if body.position.x < radius || body.position.x > width - radius {
            body.velocity.x = -body.velocity.x;
        }
        if body.position.y < radius || body.position.y > height - radius {
            body.velocity.y = -body.velocity.y;
        }
    }
}
