//! Identity of a placed actor instance.
//!
//! Every entity the rule engine can bind as a subject or object carries a
//! [`LevelObject`]. Particles, observers and registered systems do not.

use bevy_ecs::prelude::Component;

/// Authored identity of an instance: its own id and the actor it shows.
///
/// `actor_id` is rewritten by SWAP; the rule engine always matches against
/// the current value.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct LevelObject {
    pub id: String,
    pub actor_id: String,
}

impl LevelObject {
    pub fn new(id: impl Into<String>, actor_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            actor_id: actor_id.into(),
        }
    }

    pub fn is_actor(&self, actor_id: &str) -> bool {
        self.actor_id == actor_id
    }
}

/// The object cannot be dragged by the player.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Locked;

/// The object is short-lived: authored as such, or a SHOOT projectile.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Ephemeral;

/// Fired by SHOOT. Projectiles never serve as aim targets for other shots.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Projectile;
