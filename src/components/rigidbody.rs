//! Kinematic body of a level object.
//!
//! Velocities are expressed in pixels per frame at a 60fps baseline; the
//! movement system scales them by `60 * delta`. `vz` is the vertical
//! (height) velocity used by jumps and is pulled down by gravity.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    /// Planar velocity in px/frame.
    pub velocity: Vec2,
    /// Height velocity in px/frame, positive is up.
    pub vz: f32,
}

impl RigidBody {
    pub fn new(vx: f32, vy: f32) -> Self {
        Self {
            velocity: Vec2::new(vx, vy),
            vz: 0.0,
        }
    }

    pub fn with_vz(mut self, vz: f32) -> Self {
        self.vz = vz;
        self
    }

    /// Whether any velocity component is non-zero.
    pub fn is_moving(&self) -> bool {
        self.velocity != Vec2::ZERO || self.vz != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_at_rest() {
        let rb = RigidBody::default();
        assert!(!rb.is_moving());
    }

    #[test]
    fn vertical_only_counts_as_moving() {
        let rb = RigidBody::default().with_vz(3.0);
        assert!(rb.is_moving());
    }
}
