//! Fixed synth voice presets for generated music.
//!
//! A [`Voice`] is a description the backend renders: one or two layers, each
//! an oscillator or filtered noise source shaped by an attack/decay gain
//! envelope.

use smallvec::{SmallVec, smallvec};

use crate::gamedata::SynthPreset;

/// Middle C in Hz.
pub const MIDDLE_C: f32 = 261.63;
/// Pitch of the square preset when a row sets none.
pub const DEFAULT_SQUARE_PITCH: f32 = 440.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseFilter {
    Highpass { cutoff: f32 },
    Bandpass { center: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    /// Oscillator gliding exponentially from `start_hz` to `end_hz`.
    Oscillator {
        wave: Waveform,
        start_hz: f32,
        end_hz: f32,
    },
    Noise { filters: [Option<NoiseFilter>; 2] },
}

/// Linear attack to `peak`, then exponential decay to silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub peak: f32,
    pub attack: f32,
    pub decay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub source: Source,
    pub envelope: Envelope,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub layers: SmallVec<[Layer; 2]>,
    /// Time until every layer is silent, in seconds.
    pub length: f32,
}

impl Voice {
    /// Build the voice for `preset`.
    ///
    /// `pitch` only applies to the square preset. `slot` is the note length
    /// in seconds; only the square preset sustains for it.
    pub fn preset(preset: SynthPreset, pitch: Option<f32>, slot: f32) -> Self {
        match preset {
            SynthPreset::Kick => Self::single(
                Source::Oscillator {
                    wave: Waveform::Sine,
                    start_hz: 150.0,
                    end_hz: 40.0,
                },
                Envelope {
                    peak: 1.0,
                    attack: 0.001,
                    decay: 0.3,
                },
            ),
            SynthPreset::Snare => {
                let noise = Layer {
                    source: Source::Noise {
                        filters: [Some(NoiseFilter::Highpass { cutoff: 1000.0 }), None],
                    },
                    envelope: Envelope {
                        peak: 0.7,
                        attack: 0.001,
                        decay: 0.2,
                    },
                };
                let blip = Layer {
                    source: Source::Oscillator {
                        wave: Waveform::Triangle,
                        start_hz: 180.0,
                        end_hz: 180.0,
                    },
                    envelope: Envelope {
                        peak: 0.5,
                        attack: 0.001,
                        decay: 0.1,
                    },
                };
                Self {
                    layers: smallvec![noise, blip],
                    length: 0.2,
                }
            }
            SynthPreset::HiHat => Self::single(
                Source::Noise {
                    filters: [
                        Some(NoiseFilter::Bandpass { center: 10000.0 }),
                        Some(NoiseFilter::Highpass { cutoff: 7000.0 }),
                    ],
                },
                Envelope {
                    peak: 0.4,
                    attack: 0.001,
                    decay: 0.05,
                },
            ),
            SynthPreset::Square => {
                let hz = pitch.unwrap_or(DEFAULT_SQUARE_PITCH);
                Self::single(
                    Source::Oscillator {
                        wave: Waveform::Square,
                        start_hz: hz,
                        end_hz: hz,
                    },
                    Envelope {
                        peak: 0.3,
                        attack: 0.01,
                        decay: slot.max(0.05),
                    },
                )
            }
        }
    }

    /// Short square blip used by tracks without row definitions.
    pub fn fallback_blip(semitone: i32) -> Self {
        let hz = semitone_to_hz(semitone);
        Self::single(
            Source::Oscillator {
                wave: Waveform::Square,
                start_hz: hz,
                end_hz: hz,
            },
            Envelope {
                peak: 0.2,
                attack: 0.005,
                decay: 0.1,
            },
        )
    }

    fn single(source: Source, envelope: Envelope) -> Self {
        Self {
            length: envelope.attack + envelope.decay,
            layers: smallvec![Layer { source, envelope }],
        }
    }

    /// Scale every layer's peak gain.
    pub fn with_gain(mut self, gain: f32) -> Self {
        for layer in &mut self.layers {
            layer.envelope.peak *= gain;
        }
        self
    }
}

/// Frequency `semitone` half-steps above middle C.
pub fn semitone_to_hz(semitone: i32) -> f32 {
    MIDDLE_C * 2f32.powf(semitone as f32 / 12.0)
}
