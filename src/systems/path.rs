use bevy_ecs::prelude::*;

use crate::components::held::HeldBy;
use crate::components::mapposition::MapPosition;
use crate::components::path::ActivePath;
use crate::resources::worldtime::WorldTime;

/// Walk objects along their [`ActivePath`].
///
/// Held objects are skipped; holding wins over path following. A
/// non-looping path is detached once its last waypoint has been reached.
pub fn path_system(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut query: Query<(Entity, &mut MapPosition, &mut ActivePath), Without<HeldBy>>,
) {
    let frames = time.frames();
    if frames <= 0.0 {
        return;
    }
    for (entity, mut position, mut path) in query.iter_mut() {
        let Some(waypoint) = path.current() else {
            commands.entity(entity).remove::<ActivePath>();
            continue;
        };
        let step = path.speed * frames;
        let to_target = waypoint - position.pos;
        let distance = to_target.length();
        if distance <= step {
            position.pos = waypoint;
            if !path.advance() {
                commands.entity(entity).remove::<ActivePath>();
            }
        } else {
            position.pos += to_target / distance * step;
        }
    }
}
