//! Audio scheduling tests against a recording backend with a hand-driven
//! clock.

use std::sync::{Arc, Mutex};

use playkit::PlaykitError;
use playkit::audio::sequencer::{STEP_SECONDS, SequencerState};
use playkit::audio::{
    AudioBackend, AudioDirector, BusId, LoopId, SampleHandle, SampleInfo, SamplePlayback,
    StepSequencer, Voice,
};
use playkit::events::audio::{AudioCmd, AudioMessage};
use playkit::gamedata::{MusicTrack, NoteEvent, RowDef, RowSource, SynthPreset, TrackSource};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
struct Log {
    clock: f64,
    locked: bool,
    next_id: u32,
    samples: Vec<SamplePlayback>,
    voices: Vec<(f64, BusId)>,
    open_buses: Vec<BusId>,
    closed_buses: Vec<BusId>,
    loops: Vec<SampleHandle>,
    stopped_loops: Vec<LoopId>,
}

#[derive(Clone, Default)]
struct RecordingBackend(Arc<Mutex<Log>>);

impl RecordingBackend {
    fn log(&self) -> std::sync::MutexGuard<'_, Log> {
        self.0.lock().unwrap()
    }

    fn set_clock(&self, t: f64) {
        self.log().clock = t;
    }
}

impl AudioBackend for RecordingBackend {
    fn now(&self) -> f64 {
        self.log().clock
    }

    fn resume(&mut self) -> Result<(), PlaykitError> {
        if self.log().locked {
            Err(PlaykitError::AudioBackend("waiting for a user gesture".into()))
        } else {
            Ok(())
        }
    }

    /// Payloads are the sample length in seconds.
    fn decode(&mut self, id: &str, payload: &str) -> Result<SampleInfo, PlaykitError> {
        let duration: f32 = payload.parse().map_err(|_| PlaykitError::Decode {
            id: id.to_string(),
            reason: "not a duration".to_string(),
        })?;
        let mut log = self.log();
        log.next_id += 1;
        Ok(SampleInfo {
            handle: log.next_id,
            duration,
        })
    }

    fn open_bus(&mut self) -> Result<BusId, PlaykitError> {
        let mut log = self.log();
        log.next_id += 1;
        let bus = log.next_id;
        log.open_buses.push(bus);
        Ok(bus)
    }

    fn close_bus(&mut self, bus: BusId) {
        self.log().closed_buses.push(bus);
    }

    fn play_sample(&mut self, playback: SamplePlayback) {
        self.log().samples.push(playback);
    }

    fn play_voice(&mut self, _voice: &Voice, at: f64, bus: BusId) {
        self.log().voices.push((at, bus));
    }

    fn play_loop(&mut self, sample: SampleHandle) -> Result<LoopId, PlaykitError> {
        let mut log = self.log();
        log.loops.push(sample);
        log.next_id += 1;
        Ok(log.next_id)
    }

    fn stop_loop(&mut self, id: LoopId) {
        self.log().stopped_loops.push(id);
    }
}

fn note(step: u32, row: usize, duration: u32) -> NoteEvent {
    NoteEvent {
        step,
        row,
        duration,
    }
}

fn synth_row(preset: SynthPreset) -> RowDef {
    RowDef {
        source: RowSource::Synth {
            preset,
            pitch: None,
        },
        volume: 1.0,
        muted: false,
    }
}

fn generated(id: &str, notes: Vec<NoteEvent>, rows: Vec<RowDef>) -> MusicTrack {
    MusicTrack {
        id: id.to_string(),
        name: String::new(),
        source: TrackSource::Generated { notes, rows },
    }
}

#[test]
fn schedules_only_steps_inside_the_lookahead_window() {
    let backend = RecordingBackend::default();
    let mut driver = backend.clone();
    let mut seq = StepSequencer::new(
        "beat",
        vec![note(0, 0, 1), note(4, 1, 1)],
        vec![synth_row(SynthPreset::Kick), synth_row(SynthPreset::Square)],
        0.1,
    );
    seq.start(&mut driver);
    assert_eq!(seq.state(), SequencerState::Running);

    let sounds = FxHashMap::default();
    seq.schedule(&mut driver, &sounds);
    assert_eq!(backend.log().voices.len(), 1);
    assert_eq!(seq.current_step(), 1);

    backend.set_clock(0.5);
    seq.schedule(&mut driver, &sounds);
    let voices = backend.log().voices.clone();
    assert_eq!(voices.len(), 2);
    assert!((voices[1].0 - 4.0 * STEP_SECONDS).abs() < 1e-9);
    assert_eq!(seq.current_step(), 5);
}

#[test]
fn steps_wrap_after_sixteen() {
    let backend = RecordingBackend::default();
    let mut driver = backend.clone();
    let mut seq = StepSequencer::new(
        "loop",
        vec![note(0, 0, 1)],
        vec![synth_row(SynthPreset::HiHat)],
        0.05,
    );
    seq.start(&mut driver);
    let sounds = FxHashMap::default();
    // Up to the last step of the second loop.
    backend.set_clock(2.0 * 16.0 * STEP_SECONDS - 0.1);
    seq.schedule(&mut driver, &sounds);
    let voices = backend.log().voices.clone();
    assert_eq!(voices.len(), 2);
    assert!((voices[1].0 - 16.0 * STEP_SECONDS).abs() < 1e-9);
}

#[test]
fn muted_and_silent_rows_are_skipped() {
    let backend = RecordingBackend::default();
    let mut driver = backend.clone();
    let mut muted = synth_row(SynthPreset::Snare);
    muted.muted = true;
    let mut silent = synth_row(SynthPreset::Kick);
    silent.volume = 0.0;
    let mut seq = StepSequencer::new(
        "quiet",
        vec![note(0, 0, 1), note(0, 1, 1), note(0, 2, 1)],
        vec![muted, silent, synth_row(SynthPreset::Square)],
        0.1,
    );
    seq.start(&mut driver);
    seq.schedule(&mut driver, &FxHashMap::default());
    assert_eq!(backend.log().voices.len(), 1);
}

#[test]
fn track_without_rows_plays_fallback_blips() {
    let backend = RecordingBackend::default();
    let mut driver = backend.clone();
    let mut seq = StepSequencer::new("bare", vec![note(0, 3, 1), note(0, 5, 1)], vec![], 0.1);
    seq.start(&mut driver);
    seq.schedule(&mut driver, &FxHashMap::default());
    assert_eq!(backend.log().voices.len(), 2);
}

#[test]
fn trimmed_sample_row_is_stretched_over_the_note() {
    let backend = RecordingBackend::default();
    let mut director = AudioDirector::new(Box::new(backend.clone()), 100);
    director.handle(AudioCmd::LoadSound {
        id: "clap".into(),
        payload: "0.5".into(),
    });
    assert!(director.is_loaded("clap"));

    let track = generated(
        "clapper",
        vec![note(0, 0, 2)],
        vec![RowDef {
            source: RowSource::Sample {
                sound_id: "clap".into(),
                trim_start: 0.1,
                trim_end: Some(0.2),
            },
            volume: 0.5,
            muted: false,
        }],
    );
    director.handle(AudioCmd::PlayMusic { track });

    let samples = backend.log().samples.clone();
    assert_eq!(samples.len(), 1);
    let played = samples[0];
    assert!((played.offset - 0.1).abs() < 1e-6);
    assert!((played.duration.unwrap() - 0.1).abs() < 1e-6);
    // 0.1s of material over two steps (0.25s).
    assert!((played.rate - 0.4).abs() < 1e-5);
    assert_eq!(played.gain, 0.5);
    assert!(played.bus.is_some());
}

#[test]
fn undecodable_sound_is_reported_and_silent() {
    let backend = RecordingBackend::default();
    let mut director = AudioDirector::new(Box::new(backend.clone()), 100);
    director.handle(AudioCmd::LoadSound {
        id: "broken".into(),
        payload: "garbage".into(),
    });
    director.handle(AudioCmd::PlaySound {
        id: "broken".into(),
    });
    assert!(!director.is_loaded("broken"));
    assert!(backend.log().samples.is_empty());
    let messages: Vec<_> = director.drain_messages().collect();
    assert!(matches!(
        messages.as_slice(),
        [AudioMessage::SoundDecodeFailed { id, .. }] if id == "broken"
    ));
}

#[test]
fn locked_backend_starts_after_unlock() {
    let backend = RecordingBackend::default();
    backend.log().locked = true;
    let mut director = AudioDirector::new(Box::new(backend.clone()), 100);
    director.handle(AudioCmd::PlayMusic {
        track: generated("beat", vec![note(0, 0, 1)], vec![]),
    });
    assert_eq!(
        director.sequencer().map(StepSequencer::state),
        Some(SequencerState::AwaitingUnlock)
    );
    director.pump();
    assert!(backend.log().voices.is_empty());

    backend.log().locked = false;
    director.handle(AudioCmd::Unlock);
    director.pump();
    assert_eq!(
        director.sequencer().map(StepSequencer::state),
        Some(SequencerState::Running)
    );
    assert_eq!(backend.log().voices.len(), 1);
}

#[test]
fn changing_track_closes_the_previous_bus() {
    let backend = RecordingBackend::default();
    let mut director = AudioDirector::new(Box::new(backend.clone()), 100);
    director.handle(AudioCmd::PlayMusic {
        track: generated("first", vec![note(0, 0, 1)], vec![]),
    });
    let first_bus = backend.log().open_buses[0];

    director.handle(AudioCmd::PlayMusic {
        track: generated("second", vec![note(0, 0, 1)], vec![]),
    });
    assert_eq!(director.current_track(), Some("second"));
    assert_eq!(backend.log().closed_buses, vec![first_bus]);

    assert!(!director.handle(AudioCmd::Shutdown));
    assert_eq!(director.current_track(), None);
    assert_eq!(backend.log().closed_buses.len(), 2);

    let messages: Vec<_> = director.drain_messages().collect();
    assert!(messages.contains(&AudioMessage::MusicStopped { id: "first".into() }));
    assert!(messages.contains(&AudioMessage::MusicStopped {
        id: "second".into()
    }));
}

#[test]
fn sample_track_loops_and_stops() {
    let backend = RecordingBackend::default();
    let mut director = AudioDirector::new(Box::new(backend.clone()), 100);
    director.handle(AudioCmd::LoadSound {
        id: "theme".into(),
        payload: "4.0".into(),
    });
    director.handle(AudioCmd::PlayMusic {
        track: MusicTrack {
            id: "theme-track".into(),
            name: String::new(),
            source: TrackSource::Sample {
                sound_id: "theme".into(),
            },
        },
    });
    assert_eq!(director.current_track(), Some("theme-track"));
    assert_eq!(backend.log().loops.len(), 1);

    director.handle(AudioCmd::StopMusic);
    assert_eq!(director.current_track(), None);
    assert_eq!(backend.log().stopped_loops.len(), 1);
}
