use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Axis-aligned box of a level object, before scaling.
///
/// The effective box is `size * scale`, anchored at the object's
/// [`MapPosition`](super::mapposition::MapPosition).
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec2,
}

impl BoxCollider {
    /// Create a BoxCollider with given base size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    /// Size after applying the instance scale.
    pub fn scaled_size(&self, scale: f32) -> Vec2 {
        self.size * scale
    }

    /// Returns (min, max) of the scaled AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vec2, scale: f32) -> (Vec2, Vec2) {
        let p1 = position + self.scaled_size(scale);
        (position.min(p1), position.max(p1))
    }

    /// Centre of the scaled box.
    pub fn center(&self, position: Vec2, scale: f32) -> Vec2 {
        let (min, max) = self.aabb(position, scale);
        (min + max) * 0.5
    }

    /// AABB vs AABB overlap test against another collider.
    pub fn overlaps(
        &self,
        position: Vec2,
        scale: f32,
        other: &Self,
        other_position: Vec2,
        other_scale: f32,
    ) -> bool {
        self.overlaps_with_margin(position, scale, other, other_position, other_scale, 0.0)
    }

    /// Overlap test with this box grown by `margin` on every side.
    ///
    /// The other box keeps its size, so the pair still counts as overlapping
    /// while the gap between the boxes is under `margin`. A positive margin
    /// stops enter/exit flicker on the boundary.
    pub fn overlaps_with_margin(
        &self,
        position: Vec2,
        scale: f32,
        other: &Self,
        other_position: Vec2,
        other_scale: f32,
        margin: f32,
    ) -> bool {
        let (min_a, max_a) = self.aabb(position, scale);
        let (min_b, max_b) = other.aabb(other_position, other_scale);
        let m = Vec2::splat(margin);
        let (min_a, max_a) = (min_a - m, max_a + m);
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }

    /// Point containment in world space.
    pub fn contains_point(&self, position: Vec2, scale: f32, point: Vec2) -> bool {
        let (min, max) = self.aabb(position, scale);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_grows_the_box() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::new(10.0, 10.0);
        // 15px apart: no overlap at scale 1, overlap at scale 2.
        assert!(!a.overlaps(Vec2::ZERO, 1.0, &b, Vec2::new(15.0, 0.0), 1.0));
        assert!(a.overlaps(Vec2::ZERO, 2.0, &b, Vec2::new(15.0, 0.0), 1.0));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = BoxCollider::new(10.0, 10.0);
        assert!(!a.overlaps(Vec2::ZERO, 1.0, &a, Vec2::new(10.0, 0.0), 1.0));
    }

    #[test]
    fn margin_extends_contact() {
        let a = BoxCollider::new(10.0, 10.0);
        let far = Vec2::new(12.0, 0.0);
        assert!(!a.overlaps(Vec2::ZERO, 1.0, &a, far, 1.0));
        assert!(a.overlaps_with_margin(Vec2::ZERO, 1.0, &a, far, 1.0, 4.0));
    }

    #[test]
    fn margin_is_a_single_gap_buffer() {
        let a = BoxCollider::new(10.0, 10.0);
        let near = Vec2::new(13.5, 0.0);
        let apart = Vec2::new(16.0, 0.0);
        assert!(a.overlaps_with_margin(Vec2::ZERO, 1.0, &a, near, 1.0, 4.0));
        // A 6px gap would still overlap if both boxes grew.
        assert!(!a.overlaps_with_margin(Vec2::ZERO, 1.0, &a, apart, 1.0, 4.0));
    }

    #[test]
    fn contains_point_uses_scale() {
        let a = BoxCollider::new(10.0, 10.0);
        assert!(!a.contains_point(Vec2::ZERO, 1.0, Vec2::new(15.0, 5.0)));
        assert!(a.contains_point(Vec2::ZERO, 2.0, Vec2::new(15.0, 5.0)));
    }

    #[test]
    fn center_of_scaled_box() {
        let a = BoxCollider::new(10.0, 20.0);
        assert_eq!(a.center(Vec2::new(5.0, 5.0), 2.0), Vec2::new(15.0, 25.0));
    }
}
