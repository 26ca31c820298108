use bevy_ecs::prelude::*;

use crate::components::animation::ActiveAnimation;
use crate::resources::worldtime::WorldTime;

/// Remove one-shot animations that have shown their last frame.
pub fn finish_animations(
    mut commands: Commands,
    time: Res<WorldTime>,
    query: Query<(Entity, &ActiveAnimation)>,
) {
    for (entity, animation) in query.iter() {
        if animation.is_finished(time.elapsed) {
            commands.entity(entity).remove::<ActiveAnimation>();
        }
    }
}
