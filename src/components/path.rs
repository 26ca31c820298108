//! Waypoint path attached by the MOVE effect.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Default path speed in px/frame.
pub const DEFAULT_PATH_SPEED: f32 = 2.0;

/// Multi-waypoint path owned by the physics loop once attached.
///
/// The object walks toward `waypoints[index]`; on arrival the index advances.
/// When it wraps past the last waypoint a looping path starts over and a
/// non-looping path is detached.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct ActivePath {
    pub waypoints: Vec<Vec2>,
    pub index: usize,
    /// Speed in px/frame at a 60fps baseline.
    pub speed: f32,
    pub looped: bool,
}

impl ActivePath {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self {
            waypoints,
            index: 0,
            speed: DEFAULT_PATH_SPEED,
            looped: true,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.index).copied()
    }

    /// Move to the next waypoint. Returns false when a non-looping path ends.
    pub fn advance(&mut self) -> bool {
        self.index += 1;
        if self.index >= self.waypoints.len() {
            if !self.looped {
                return false;
            }
            self.index = 0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looping_path_wraps() {
        let mut path = ActivePath::new(vec![Vec2::ZERO, Vec2::ONE]);
        assert!(path.advance());
        assert_eq!(path.index, 1);
        assert!(path.advance());
        assert_eq!(path.index, 0);
    }

    #[test]
    fn one_shot_path_ends() {
        let mut path = ActivePath::new(vec![Vec2::ZERO, Vec2::ONE]).with_loop(false);
        assert!(path.advance());
        assert!(!path.advance());
    }

    #[test]
    fn defaults_match_move_effect() {
        let path = ActivePath::new(vec![Vec2::ZERO]);
        assert_eq!(path.speed, 2.0);
        assert!(path.looped);
    }
}
