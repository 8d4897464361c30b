//! Shared simulation geometry
//!
//! Pure math with no rendering or platform dependencies:
//! - Segments and circles
//! - Ball-vs-segment and ball-vs-circle resolution with restitution

pub mod collision;
pub mod segment;

pub use collision::{
    Body, Contact, apply_contact, circle_contact, reflect_velocity, resolve_circle,
    resolve_segment, segment_contact,
};
pub use segment::{Circle, Segment};
