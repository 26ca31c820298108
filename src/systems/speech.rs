use bevy_ecs::prelude::*;

use crate::components::speech::SpeechBubble;
use crate::resources::shake::ScreenShake;
use crate::resources::worldtime::WorldTime;

pub fn expire_speech_bubbles(
    mut commands: Commands,
    time: Res<WorldTime>,
    query: Query<(Entity, &SpeechBubble)>,
) {
    for (entity, bubble) in query.iter() {
        if bubble.is_expired(time.elapsed) {
            commands.entity(entity).remove::<SpeechBubble>();
        }
    }
}

pub fn decay_screen_shake(time: Res<WorldTime>, mut shake: ResMut<ScreenShake>) {
    if shake.intensity > 0.0 {
        shake.update(time.elapsed);
    }
}
