//! Contact edge events and the observer feeding them to the rule engine.
//!
//! The collision detector triggers a [`CollisionEvent`] on each touching
//! transition of an object pair. [`observe_collision_edges`] turns it into a
//! [`TriggerEvent`] that the rule dispatcher matches against COLLISION and
//! HIT rules.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::triggers::{PendingTriggers, TriggerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The boxes started overlapping.
    Enter,
    /// The boxes separated beyond the hysteresis margin.
    Exit,
}

/// Event fired when two level objects start or stop touching.
///
/// No ordering guarantees are provided between `a` and `b`.
#[derive(Event, Debug, Clone, Copy)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
    pub phase: ContactPhase,
}

pub fn observe_collision_edges(trigger: On<CollisionEvent>, mut pending: ResMut<PendingTriggers>) {
    let CollisionEvent { a, b, phase } = *trigger.event();
    debug!("Contact {:?} between {:?} and {:?}", phase, a, b);
    pending.push(match phase {
        ContactPhase::Enter => TriggerEvent::Contact { a, b },
        ContactPhase::Exit => TriggerEvent::Separation { a, b },
    });
}
