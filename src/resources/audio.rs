//! ECS resources that bridge the simulation with the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread
//! and insert the [`AudioBridge`] together with the `Messages<AudioCmd>` and
//! `Messages<AudioMessage>` mailboxes. Call [`shutdown_audio`] during
//! teardown to stop the current track, release the backend and join the
//! thread.

use crate::audio::AudioBackend;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::gameconfig::GameConfig;
use crate::systems::audio::audio_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::error;
use std::time::Duration;

/// Shared bridge between the ECS world and the audio thread.
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the audio thread around `backend` and register bridge resources.
///
/// Does nothing when audio is disabled in `config`; effects then skip
/// playback because no `Messages<AudioCmd>` exists.
pub fn setup_audio(world: &mut World, backend: Box<dyn AudioBackend>, config: &GameConfig) {
    if !config.audio_enabled {
        return;
    }
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
    let interval = Duration::from_millis(config.schedule_interval_ms);
    let lookahead_ms = config.lookahead_ms;

    let handle = match std::thread::Builder::new()
        .name("playkit-audio".into())
        .spawn(move || audio_thread(backend, lookahead_ms, interval, rx_cmd, tx_msg))
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to spawn audio thread, continuing silently: {}", e);
            return;
        }
    };

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.insert_resource(Messages::<AudioMessage>::default());
    world.insert_resource(Messages::<AudioCmd>::default());
}

/// Gracefully request shutdown of the audio thread and join it.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}

/// Queue a command for the audio thread. A no-op when audio is disabled.
pub fn send_audio_cmd(world: &mut World, cmd: AudioCmd) {
    if let Some(mut msgs) = world.get_resource_mut::<Messages<AudioCmd>>() {
        msgs.write(cmd);
    }
}
