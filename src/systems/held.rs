//! Held objects follow their carrier.
//!
//! # Related
//!
//! - [`HeldBy`](crate::components::held::HeldBy) – the relation component
//! - HOLD / DROP in [`crate::systems::effects`] – create and clear it

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::held::HeldBy;
use crate::components::mapposition::MapPosition;

/// Snap every held object to its carrier's position plus offset.
///
/// A relation whose carrier no longer exists is removed, and the object stays
/// where it was last carried.
pub fn held_system(
    mut commands: Commands,
    held: Query<(Entity, &HeldBy)>,
    mut positions: Query<&mut MapPosition>,
) {
    for (entity, held_by) in held.iter() {
        let Ok(carrier) = positions.get(held_by.holder).copied() else {
            debug!("Carrier of {:?} is gone, dropping", entity);
            commands.entity(entity).remove::<HeldBy>();
            continue;
        };
        if let Ok(mut position) = positions.get_mut(entity) {
            position.pos = carrier.pos + held_by.offset;
            position.z = carrier.z;
        }
    }
}
