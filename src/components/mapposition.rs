//! World-space position of a level object.
//!
//! `pos` is the top-left corner of the object's box in stage pixels (y grows
//! downwards). `z` is the height above the ground used by jumps; it never
//! goes below zero.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
    pub z: f32,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            z: 0.0,
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    /// Centre of a box of `size` placed at this position.
    pub fn center(&self, size: Vec2) -> Vec2 {
        self.pos + size * 0.5
    }
}
