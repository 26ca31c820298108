//! Pointer and keyboard events delivered by the host.
//!
//! Both count as user interaction, so besides queueing the rule trigger the
//! observers ask the audio thread to retry a locked backend.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::events::audio::AudioCmd;
use crate::resources::triggers::{PendingTriggers, TriggerEvent};

/// A key went down. `key` is the host's key name (`"ArrowUp"`, `"w"`, ...).
#[derive(Event, Debug, Clone)]
pub struct KeyPressedEvent {
    pub key: String,
}

/// A level object was clicked.
#[derive(Event, Debug, Clone, Copy)]
pub struct ObjectClickedEvent {
    pub entity: Entity,
}

pub fn observe_key_pressed(
    trigger: On<KeyPressedEvent>,
    mut pending: ResMut<PendingTriggers>,
    audio: Option<ResMut<Messages<AudioCmd>>>,
) {
    pending.push(TriggerEvent::Key(trigger.event().key.clone()));
    if let Some(mut audio) = audio {
        audio.write(AudioCmd::Unlock);
    }
}

pub fn observe_object_clicked(
    trigger: On<ObjectClickedEvent>,
    mut pending: ResMut<PendingTriggers>,
    audio: Option<ResMut<Messages<AudioCmd>>>,
) {
    pending.push(TriggerEvent::Click(trigger.event().entity));
    if let Some(mut audio) = audio {
        audio.write(AudioCmd::Unlock);
    }
}
