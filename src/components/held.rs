//! Held relation between a carried object and its carrier.
//!
//! The carrier is stored as a plain [`Entity`], which acts as a weak
//! reference: it is re-resolved every physics tick by
//! [`held_system`](crate::systems::held::held_system), and the relation is
//! dropped as soon as the carrier no longer exists.
//!
//! Created by the HOLD effect (or authored `heldBy` data) and removed by DROP.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct HeldBy {
    /// The carrying entity.
    pub holder: Entity,
    /// Offset from the carrier's position.
    pub offset: Vec2,
}

impl HeldBy {
    pub fn new(holder: Entity) -> Self {
        Self {
            holder,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}
