//! Host audio services.
//!
//! The engine never produces samples itself. It asks an [`AudioBackend`] to
//! decode payloads and to play samples and synth voices at exact times on
//! the backend's own clock. Hosts implement the trait on top of whatever
//! audio stack they run; [`NullBackend`] keeps the timing behaviour without
//! producing sound.

use std::time::Instant;

use crate::error::PlaykitError;

use super::voices::Voice;

/// Backend-assigned id of a decoded sample.
pub type SampleHandle = u32;
/// Backend-assigned id of an output bus owned by a sequencer.
pub type BusId = u32;
/// Backend-assigned id of a looping stream.
pub type LoopId = u32;

/// A decoded sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleInfo {
    pub handle: SampleHandle,
    /// Length in seconds.
    pub duration: f32,
}

/// One scheduled sample playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePlayback {
    pub sample: SampleHandle,
    /// Start time on the backend clock.
    pub at: f64,
    /// Start offset into the sample in seconds.
    pub offset: f32,
    /// Length of source material to play; the rest of the sample when absent.
    pub duration: Option<f32>,
    pub rate: f32,
    pub gain: f32,
    pub bus: Option<BusId>,
}

impl SamplePlayback {
    /// A plain one-shot starting at `at`.
    pub fn one_shot(sample: SampleHandle, at: f64) -> Self {
        Self {
            sample,
            at,
            offset: 0.0,
            duration: None,
            rate: 1.0,
            gain: 1.0,
            bus: None,
        }
    }
}

pub trait AudioBackend: Send {
    /// Monotonic backend clock in seconds.
    fn now(&self) -> f64;

    /// Make sure the output is running. Fails while the host still waits for
    /// a user gesture.
    fn resume(&mut self) -> Result<(), PlaykitError>;

    fn decode(&mut self, id: &str, payload: &str) -> Result<SampleInfo, PlaykitError>;

    fn open_bus(&mut self) -> Result<BusId, PlaykitError>;

    /// Release a bus and silence everything still scheduled on it.
    fn close_bus(&mut self, bus: BusId);

    fn play_sample(&mut self, playback: SamplePlayback);

    fn play_voice(&mut self, voice: &Voice, at: f64, bus: BusId);

    fn play_loop(&mut self, sample: SampleHandle) -> Result<LoopId, PlaykitError>;

    fn stop_loop(&mut self, id: LoopId);
}

/// Silent backend driven by the wall clock.
///
/// Decoding accepts any non-empty payload and reports a one second sample.
#[derive(Debug)]
pub struct NullBackend {
    started: Instant,
    next_id: u32,
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NullBackend {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            next_id: 1,
        }
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl AudioBackend for NullBackend {
    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn resume(&mut self) -> Result<(), PlaykitError> {
        Ok(())
    }

    fn decode(&mut self, id: &str, payload: &str) -> Result<SampleInfo, PlaykitError> {
        if payload.trim().is_empty() {
            return Err(PlaykitError::Decode {
                id: id.to_string(),
                reason: "empty payload".to_string(),
            });
        }
        Ok(SampleInfo {
            handle: self.next(),
            duration: 1.0,
        })
    }

    fn open_bus(&mut self) -> Result<BusId, PlaykitError> {
        Ok(self.next())
    }

    fn close_bus(&mut self, _bus: BusId) {}

    fn play_sample(&mut self, _playback: SamplePlayback) {}

    fn play_voice(&mut self, _voice: &Voice, _at: f64, _bus: BusId) {}

    fn play_loop(&mut self, _sample: SampleHandle) -> Result<LoopId, PlaykitError> {
        Ok(self.next())
    }

    fn stop_loop(&mut self, _id: LoopId) {}
}
