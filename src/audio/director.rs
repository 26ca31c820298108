//! Owner of the backend on the audio thread.
//!
//! The director turns [`AudioCmd`]s into backend calls, keeps the decoded
//! sound bank and the one active music track, and collects
//! [`AudioMessage`]s for the simulation.

use log::{debug, error, info, warn};
use rustc_hash::FxHashMap;

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::gamedata::{MusicTrack, TrackSource};

use super::backend::{AudioBackend, LoopId, SampleInfo, SamplePlayback};
use super::sequencer::StepSequencer;

#[derive(Debug)]
enum ActiveMusic {
    Sequenced(StepSequencer),
    Looping { track_id: String, id: LoopId },
}

impl ActiveMusic {
    fn track_id(&self) -> &str {
        match self {
            ActiveMusic::Sequenced(seq) => seq.track_id(),
            ActiveMusic::Looping { track_id, .. } => track_id,
        }
    }
}

pub struct AudioDirector {
    backend: Box<dyn AudioBackend>,
    sounds: FxHashMap<String, SampleInfo>,
    music: Option<ActiveMusic>,
    lookahead: f64,
    outbox: Vec<AudioMessage>,
}

impl AudioDirector {
    pub fn new(backend: Box<dyn AudioBackend>, lookahead_ms: u64) -> Self {
        Self {
            backend,
            sounds: FxHashMap::default(),
            music: None,
            lookahead: lookahead_ms as f64 / 1000.0,
            outbox: Vec::new(),
        }
    }

    pub fn is_loaded(&self, sound_id: &str) -> bool {
        self.sounds.contains_key(sound_id)
    }

    pub fn current_track(&self) -> Option<&str> {
        self.music.as_ref().map(ActiveMusic::track_id)
    }

    /// The active sequencer, if a generated track is playing.
    pub fn sequencer(&self) -> Option<&StepSequencer> {
        match &self.music {
            Some(ActiveMusic::Sequenced(seq)) => Some(seq),
            _ => None,
        }
    }

    /// Apply one command. Returns false on [`AudioCmd::Shutdown`].
    pub fn handle(&mut self, cmd: AudioCmd) -> bool {
        match cmd {
            AudioCmd::LoadSound { id, payload } => self.load_sound(id, &payload),
            AudioCmd::PlaySound { id } => match self.sounds.get(&id) {
                Some(sample) => {
                    let at = self.backend.now();
                    self.backend
                        .play_sample(SamplePlayback::one_shot(sample.handle, at));
                }
                None => debug!("Sound '{}' not loaded, skipping", id),
            },
            AudioCmd::PlayMusic { track } => self.play_music(track),
            AudioCmd::StopMusic => self.stop_music(),
            AudioCmd::Unlock => {
                if let Err(e) = self.backend.resume() {
                    debug!("Audio still locked: {}", e);
                }
                if let Some(ActiveMusic::Sequenced(seq)) = &mut self.music {
                    seq.unlock(self.backend.as_mut());
                }
            }
            AudioCmd::Shutdown => {
                self.stop_music();
                return false;
            }
        }
        true
    }

    /// Periodic work: keep the sequencer ahead of the backend clock.
    pub fn pump(&mut self) {
        if let Some(ActiveMusic::Sequenced(seq)) = &mut self.music {
            seq.schedule(self.backend.as_mut(), &self.sounds);
        }
    }

    pub fn drain_messages(&mut self) -> std::vec::Drain<'_, AudioMessage> {
        self.outbox.drain(..)
    }

    fn load_sound(&mut self, id: String, payload: &str) {
        match self.backend.decode(&id, payload) {
            Ok(sample) => {
                debug!("Decoded sound '{}' ({:.2}s)", id, sample.duration);
                self.sounds.insert(id.clone(), sample);
                self.outbox.push(AudioMessage::SoundLoaded { id });
            }
            Err(e) => {
                warn!("Sound '{}' omitted: {}", id, e);
                self.outbox.push(AudioMessage::SoundDecodeFailed {
                    id,
                    error: e.to_string(),
                });
            }
        }
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.stop_music();
        match track.source {
            TrackSource::Sample { sound_id } => {
                let Some(sample) = self.sounds.get(&sound_id).copied() else {
                    warn!("Track '{}' needs missing sound '{}'", track.id, sound_id);
                    return;
                };
                match self.backend.play_loop(sample.handle) {
                    Ok(id) => {
                        info!("Music '{}' looping", track.id);
                        self.outbox
                            .push(AudioMessage::MusicStarted { id: track.id.clone() });
                        self.music = Some(ActiveMusic::Looping {
                            track_id: track.id,
                            id,
                        });
                    }
                    Err(e) => {
                        error!("Track '{}' failed to start: {}", track.id, e);
                        self.outbox.push(AudioMessage::BackendUnavailable {
                            error: e.to_string(),
                        });
                    }
                }
            }
            TrackSource::Generated { notes, rows } => {
                let mut seq = StepSequencer::new(track.id.clone(), notes, rows, self.lookahead);
                seq.start(self.backend.as_mut());
                info!("Music '{}' sequencer {:?}", track.id, seq.state());
                self.outbox.push(AudioMessage::MusicStarted { id: track.id });
                self.music = Some(ActiveMusic::Sequenced(seq));
                self.pump();
            }
        }
    }

    fn stop_music(&mut self) {
        let Some(music) = self.music.take() else {
            return;
        };
        let track_id = music.track_id().to_string();
        match music {
            ActiveMusic::Sequenced(mut seq) => seq.stop(self.backend.as_mut()),
            ActiveMusic::Looping { id, .. } => self.backend.stop_loop(id),
        }
        debug!("Music '{}' stopped", track_id);
        self.outbox.push(AudioMessage::MusicStopped { id: track_id });
    }
}
