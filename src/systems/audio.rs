//! Audio thread and the systems bridging it with the ECS world.
//!
//! - [`audio_thread`] runs on its own OS thread and owns the
//!   [`AudioDirector`] (and through it the host backend). It wakes on every
//!   command and at least every `schedule_interval_ms` to keep the step
//!   sequencer ahead of the backend clock, independent of the frame loop.
//! - [`forward_audio_cmds`] sends `AudioCmd` messages written by effects to
//!   the thread.
//! - [`poll_audio_messages`] drains the thread's replies into
//!   `Messages<AudioMessage>`, and [`log_audio_messages`] reports them.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use std::time::Duration;

use crate::audio::{AudioBackend, AudioDirector};
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};

/// Drain pending replies from the audio thread into the ECS mailbox.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

/// Forward ECS AudioCmd messages to the audio thread via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // Ignore send errors: the thread is gone during shutdown.
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd so same-frame readers can observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

pub fn log_audio_messages(mut reader: MessageReader<AudioMessage>) {
    for msg in reader.read() {
        match msg {
            AudioMessage::SoundLoaded { id } => debug!("[audio] sound '{}' ready", id),
            AudioMessage::SoundDecodeFailed { id, error } => {
                warn!("[audio] sound '{}' unavailable: {}", id, error)
            }
            AudioMessage::MusicStarted { id } => info!("[audio] music '{}' started", id),
            AudioMessage::MusicStopped { id } => debug!("[audio] music '{}' stopped", id),
            AudioMessage::BackendUnavailable { error } => {
                warn!("[audio] backend unavailable: {}", error)
            }
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Blocks until it receives [`AudioCmd::Shutdown`] or the command channel is
/// closed; in both cases the current track is stopped and its bus released.
pub fn audio_thread(
    backend: Box<dyn AudioBackend>,
    lookahead_ms: u64,
    interval: Duration,
    rx_cmd: Receiver<AudioCmd>,
    tx_msg: Sender<AudioMessage>,
) {
    debug!(
        "[audio] thread starting (id={:?})",
        std::thread::current().id()
    );
    let mut director = AudioDirector::new(backend, lookahead_ms);

    'run: loop {
        match rx_cmd.recv_timeout(interval) {
            Ok(cmd) => {
                if !director.handle(cmd) {
                    break 'run;
                }
                // Drain whatever else queued up in the meantime.
                for cmd in rx_cmd.try_iter() {
                    if !director.handle(cmd) {
                        break 'run;
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                director.handle(AudioCmd::Shutdown);
                break 'run;
            }
        }
        director.pump();
        for msg in director.drain_messages() {
            let _ = tx_msg.send(msg);
        }
    }

    for msg in director.drain_messages() {
        let _ = tx_msg.send(msg);
    }
    debug!("[audio] thread exiting");
}
