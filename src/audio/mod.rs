//! Audio subsystem: host backend abstraction, synth voices, the generated
//! music step sequencer and the director that owns them on the audio thread.
//!
//! Nothing in here touches the ECS world. The simulation sends
//! [`AudioCmd`](crate::events::audio::AudioCmd)s over the
//! [`AudioBridge`](crate::resources::audio::AudioBridge) and the audio thread
//! ([`crate::systems::audio::audio_thread`]) feeds them to an
//! [`director::AudioDirector`].

pub mod backend;
pub mod director;
pub mod sequencer;
pub mod voices;

pub use backend::{AudioBackend, BusId, LoopId, NullBackend, SampleHandle, SampleInfo, SamplePlayback};
pub use director::AudioDirector;
pub use sequencer::StepSequencer;
pub use voices::Voice;
