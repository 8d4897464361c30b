//! Collision detection and response for the pinball table
//!
//! Two shapes matter: a circular ball against a line segment (walls and
//! flippers share one resolver) and a ball against a circle (bumpers). Both
//! push the ball out of penetration and reflect its velocity about the
//! contact normal, scaled by a restitution factor.

use glam::Vec2;

use super::segment::{Circle, Segment};

/// Anything the resolvers can move: position, velocity and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Surface normal at the contact, pointing toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

/// Check a ball against a segment
///
/// The perpendicular foot must land strictly inside the segment
/// (`0 < projection < length`) and the center must be within `radius` of the
/// line.
pub fn segment_contact(pos: Vec2, radius: f32, segment: &Segment) -> Option<Contact> {
    let normal = segment.normal()?;
    let length = segment.length();
    let offset = pos - segment.p1;

    let dist = offset.dot(normal);
    let proj = offset.dot(segment.delta()) / length;

    if proj > 0.0 && proj < length && dist.abs() < radius {
        // Ball on the line exactly is pushed to the negative side
        let facing = if dist > 0.0 { normal } else { -normal };
        Some(Contact {
            normal: facing,
            penetration: radius - dist.abs(),
        })
    } else {
        None
    }
}

/// Check a ball against a circle
pub fn circle_contact(pos: Vec2, radius: f32, circle: &Circle) -> Option<Contact> {
    let delta = pos - circle.center;
    let dist = delta.length();
    let reach = radius + circle.radius;
    if dist >= reach {
        return None;
    }
    // Concentric: no meaningful normal, push straight up the table
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::NEG_Y };
    Some(Contact {
        normal,
        penetration: reach - dist,
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Push the body out along the contact normal and bounce it
#[inline]
pub fn apply_contact(body: &mut Body, contact: &Contact, restitution: f32) {
    body.pos += contact.normal * contact.penetration;
    body.vel = reflect_velocity(body.vel, contact.normal) * restitution;
}

/// Resolve a ball against a wall or flipper segment; true on contact
pub fn resolve_segment(body: &mut Body, segment: &Segment, restitution: f32) -> bool {
    match segment_contact(body.pos, body.radius, segment) {
        Some(contact) => {
            apply_contact(body, &contact, restitution);
            true
        }
        None => false,
    }
}

/// Resolve a ball against a bumper; true on contact
///
/// The ball ends exactly `radius + circle.radius` from the bumper center.
pub fn resolve_circle(body: &mut Body, circle: &Circle, restitution: f32) -> bool {
    match circle_contact(body.pos, body.radius, circle) {
        Some(contact) => {
            body.pos = circle.center + contact.normal * (body.radius + circle.radius);
            body.vel = reflect_velocity(body.vel, contact.normal) * restitution;
            true
        }
        None => false,
    }
}
