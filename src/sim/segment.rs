//! Line segment geometry shared by table walls and flippers
//!
//! A segment is just its two endpoints. The resolver treats it as an infinite
//! line for distance and normal, and as a finite span for gating.

use glam::Vec2;

/// A collidable line segment from `p1` to `p2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Segment {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    /// Segment from raw coordinates (table layouts read better this way)
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    /// Direction vector `p2 - p1`
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.p2 - self.p1
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Unit normal, rotated clockwise from the direction (`(dy, -dx) / len`)
    ///
    /// Returns `None` for a degenerate segment.
    pub fn normal(&self) -> Option<Vec2> {
        let d = self.delta();
        let len = d.length();
        if len < 1e-4 {
            return None;
        }
        Some(Vec2::new(d.y, -d.x) / len)
    }

    /// Signed perpendicular distance from the infinite line to `point`
    pub fn signed_distance(&self, point: Vec2) -> Option<f32> {
        self.normal().map(|n| (point - self.p1).dot(n))
    }

    /// Distance along the segment of the foot of the perpendicular from `point`
    pub fn projection(&self, point: Vec2) -> Option<f32> {
        let d = self.delta();
        let len = d.length();
        if len < 1e-4 {
            return None;
        }
        Some((point - self.p1).dot(d) / len)
    }

    /// Midpoint (for rendering labels and debugging)
    pub fn midpoint(&self) -> Vec2 {
        (self.p1 + self.p2) * 0.5
    }
}

/// A static circle (pinball bumpers)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_is_unit_and_perpendicular() {
        let seg = Segment::from_coords(0.0, 0.0, 10.0, 0.0);
        let n = seg.normal().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(n.dot(seg.delta()).abs() < 1e-6);
        // Horizontal segment pointing right has its normal pointing "up" in screen space
        assert_eq!(n, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_signed_distance_and_projection() {
        let seg = Segment::from_coords(0.0, 0.0, 10.0, 0.0);
        let p = Vec2::new(4.0, -3.0);
        assert!((seg.signed_distance(p).unwrap() - 3.0).abs() < 1e-6);
        assert!((seg.projection(p).unwrap() - 4.0).abs() < 1e-6);

        let below = Vec2::new(4.0, 3.0);
        assert!((seg.signed_distance(below).unwrap() + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_segment() {
        let seg = Segment::from_coords(5.0, 5.0, 5.0, 5.0);
        assert!(seg.normal().is_none());
        assert!(seg.projection(Vec2::ZERO).is_none());
    }

    #[test]
    fn test_circle_contains() {
        let c = Circle::new(Vec2::new(10.0, 10.0), 5.0);
        assert!(c.contains(Vec2::new(13.0, 14.0)));
        assert!(!c.contains(Vec2::new(16.0, 10.0)));
    }
}
