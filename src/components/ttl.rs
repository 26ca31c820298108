//! Time-to-live component for automatic entity despawning.
//!
//! The [`Ttl`] component counts down time each frame. When the remaining time
//! reaches zero, the entity is despawned. SHOOT gives every projectile a
//! fixed lifetime of [`PROJECTILE_LIFETIME`] seconds so that stray shots do
//! not accumulate even when they never leave the stage.
//!
//! # Related
//!
//! - [`crate::systems::ttl::ttl_system`] – system that updates and despawns entities
//! - [`crate::components::particle::Particle`] – particles track their own life instead

use bevy_ecs::prelude::Component;

/// Lifetime of a SHOOT projectile in seconds.
pub const PROJECTILE_LIFETIME: f32 = 3.0;

/// Time-to-live component that automatically despawns entities after a duration.
///
/// The countdown follows [`WorldTime::delta`](crate::resources::worldtime::WorldTime).
#[derive(Component, Debug, Clone, Copy)]
pub struct Ttl {
    /// Remaining time in seconds before despawn.
    pub remaining: f32,
}

impl Ttl {
    /// Create a new Ttl with the given duration in seconds.
    pub fn new(seconds: f32) -> Self {
        Ttl { remaining: seconds }
    }
}
