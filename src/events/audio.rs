//! Messages exchanged with the audio thread.

use bevy_ecs::message::Message;

use crate::gamedata::MusicTrack;

/// Commands sent *to* the audio thread
#[derive(Message, Debug, Clone)]
pub enum AudioCmd {
    /// Decode a sound payload into the sound bank.
    LoadSound { id: String, payload: String },
    /// One-shot playback of a loaded sound.
    PlaySound { id: String },
    /// Stop the current track and start this one.
    PlayMusic { track: MusicTrack },
    StopMusic,
    /// The user interacted; retry a backend resume that was refused.
    Unlock,
    Shutdown,
}

/// Messages sent *back* from the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    SoundLoaded { id: String },
    SoundDecodeFailed { id: String, error: String },
    MusicStarted { id: String },
    MusicStopped { id: String },
    BackendUnavailable { error: String },
}
