//! Lookahead step sequencer for generated music tracks.
//!
//! The sequencer walks a 16-step loop of sixteenth notes at 120 BPM. Each
//! [`StepSequencer::schedule`] call (every `schedule_interval_ms` on the audio
//! thread) queues every step that starts within the lookahead window onto
//! the backend clock, so playback stays sample accurate even when the caller
//! wakes up late.
//!
//! A sequencer is created per track and owns one backend bus for its
//! lifetime: [`StepSequencer::start`] opens it, [`StepSequencer::stop`]
//! closes it and forgets any pending unlock.

use log::{debug, error, warn};
use rustc_hash::FxHashMap;

use crate::gamedata::{NoteEvent, RowDef, RowSource};

use super::backend::{AudioBackend, BusId, SampleInfo, SamplePlayback};
use super::voices::Voice;

pub const BPM: f64 = 120.0;
pub const STEPS_PER_LOOP: u32 = 16;
/// One sixteenth note at [`BPM`].
pub const STEP_SECONDS: f64 = 60.0 / BPM / 4.0;

/// Playback rate that stretches `trimmed` seconds of a sample over a note
/// lasting `duration_steps` steps.
pub fn playback_rate(trimmed: f32, duration_steps: u32) -> f32 {
    let slot = duration_steps.max(1) as f64 * STEP_SECONDS;
    (trimmed as f64 / slot) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Stopped,
    /// The backend refused to resume; retried on the next user unlock.
    AwaitingUnlock,
    Running,
}

#[derive(Debug)]
pub struct StepSequencer {
    track_id: String,
    notes: Vec<NoteEvent>,
    rows: Vec<RowDef>,
    lookahead: f64,
    step: u32,
    next_step_time: f64,
    bus: Option<BusId>,
    state: SequencerState,
}

impl StepSequencer {
    pub fn new(
        track_id: impl Into<String>,
        notes: Vec<NoteEvent>,
        rows: Vec<RowDef>,
        lookahead: f64,
    ) -> Self {
        Self {
            track_id: track_id.into(),
            notes,
            rows,
            lookahead,
            step: 0,
            next_step_time: 0.0,
            bus: None,
            state: SequencerState::Stopped,
        }
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Step the cursor will schedule next.
    pub fn current_step(&self) -> u32 {
        self.step
    }

    pub fn start(&mut self, backend: &mut dyn AudioBackend) {
        if let Err(e) = backend.resume() {
            warn!("Track '{}' waits for audio unlock: {}", self.track_id, e);
            self.state = SequencerState::AwaitingUnlock;
            return;
        }
        let bus = match backend.open_bus() {
            Ok(bus) => bus,
            Err(e) => {
                error!("Track '{}' could not open an audio bus: {}", self.track_id, e);
                self.state = SequencerState::Stopped;
                return;
            }
        };
        self.bus = Some(bus);
        self.step = 0;
        self.next_step_time = backend.now();
        self.state = SequencerState::Running;
        debug!("Track '{}' started on bus {}", self.track_id, bus);
    }

    /// Retry a start that failed for lack of user interaction.
    pub fn unlock(&mut self, backend: &mut dyn AudioBackend) {
        if self.state == SequencerState::AwaitingUnlock {
            self.start(backend);
        }
    }

    pub fn stop(&mut self, backend: &mut dyn AudioBackend) {
        if let Some(bus) = self.bus.take() {
            backend.close_bus(bus);
        }
        self.state = SequencerState::Stopped;
    }

    /// Queue every step starting before `now + lookahead`.
    pub fn schedule(
        &mut self,
        backend: &mut dyn AudioBackend,
        sounds: &FxHashMap<String, SampleInfo>,
    ) {
        let Some(bus) = self.bus else {
            return;
        };
        if self.state != SequencerState::Running {
            return;
        }
        let horizon = backend.now() + self.lookahead;
        while self.next_step_time < horizon {
            self.schedule_step(backend, sounds, bus, self.step, self.next_step_time);
            self.next_step_time += STEP_SECONDS;
            self.step = (self.step + 1) % STEPS_PER_LOOP;
        }
    }

    fn schedule_step(
        &self,
        backend: &mut dyn AudioBackend,
        sounds: &FxHashMap<String, SampleInfo>,
        bus: BusId,
        step: u32,
        at: f64,
    ) {
        for note in self.notes.iter().filter(|n| n.step == step) {
            if self.rows.is_empty() {
                backend.play_voice(&Voice::fallback_blip(note.row as i32), at, bus);
                continue;
            }
            let Some(row) = self.rows.get(note.row) else {
                continue;
            };
            if row.muted || row.volume <= 0.0 {
                continue;
            }
            let slot = (note.duration.max(1) as f64 * STEP_SECONDS) as f32;
            match &row.source {
                RowSource::Sample {
                    sound_id,
                    trim_start,
                    trim_end,
                } => {
                    let Some(sample) = sounds.get(sound_id) else {
                        continue;
                    };
                    let start = trim_start.clamp(0.0, sample.duration);
                    let end = trim_end.unwrap_or(sample.duration).min(sample.duration);
                    let trimmed = end - start;
                    if trimmed <= 0.0 {
                        continue;
                    }
                    backend.play_sample(SamplePlayback {
                        sample: sample.handle,
                        at,
                        offset: start,
                        duration: Some(trimmed),
                        rate: playback_rate(trimmed, note.duration),
                        gain: row.volume,
                        bus: Some(bus),
                    });
                }
                RowSource::Synth { preset, pitch } => {
                    let voice = Voice::preset(*preset, *pitch, slot).with_gain(row.volume);
                    backend.play_voice(&voice, at, bus);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_a_sixteenth_at_120_bpm() {
        assert!((STEP_SECONDS - 0.125).abs() < 1e-12);
    }

    #[test]
    fn narrow_trim_is_stretched_to_fill_the_slot() {
        // 0.1s of material over a 2-step note (0.25s).
        let rate = playback_rate(0.1, 2);
        assert!((rate - 0.4).abs() < 1e-6);
        // The stretched sample lasts exactly the slot.
        assert!((0.1 / rate - 0.25).abs() < 1e-6);
    }
}
