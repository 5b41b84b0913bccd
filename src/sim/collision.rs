//! Overlap tests used by combat resolution
//!
//! Bullets use a radius check, area skills use axis-aligned boxes on the
//! ground plane, and shockwave rings use disc containment.

use glam::Vec2;

/// True if `a` and `b` are strictly closer than `radius`
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// True if `point` lies inside or on a ring of `radius` around `origin`
#[inline]
pub fn ring_contains(origin: Vec2, radius: f32, point: Vec2) -> bool {
    origin.distance(point) <= radius
}

/// Axis-aligned box on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square box of half-side `half_extent` around `center`
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::splat(half_extent);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap; boxes that only touch do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}
