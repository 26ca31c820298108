//! Music tracks: either a looping sample or a generated step sequence.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicTrack {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub source: TrackSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum TrackSource {
    /// A looping recorded sound.
    Sample { sound_id: String },
    /// Notes on a 16-step grid, each played through its row's voice.
    Generated {
        #[serde(default)]
        notes: Vec<NoteEvent>,
        #[serde(default)]
        rows: Vec<RowDef>,
    },
}

/// One note on the step grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    /// Step index, 0..16.
    pub step: u32,
    pub row: usize,
    /// Length in sixteenth-note steps.
    #[serde(default = "default_duration")]
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SynthPreset {
    Kick,
    Snare,
    HiHat,
    #[default]
    Square,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum RowSource {
    Sample {
        sound_id: String,
        /// Trim window start in seconds.
        #[serde(default)]
        trim_start: f32,
        /// Trim window end in seconds; the sample end when absent.
        #[serde(default)]
        trim_end: Option<f32>,
    },
    Synth {
        #[serde(default)]
        preset: SynthPreset,
        /// Oscillator pitch in Hz for the square preset.
        #[serde(default)]
        pitch: Option<f32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDef {
    #[serde(flatten)]
    pub source: RowSource,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub muted: bool,
}

fn default_duration() -> u32 {
    1
}

fn default_volume() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_track_from_json() {
        let json = r#"{
            "id": "beat",
            "type": "GENERATED",
            "notes": [ { "step": 0, "row": 0 }, { "step": 4, "row": 1, "duration": 2 } ],
            "rows": [
                { "kind": "SYNTH", "preset": "KICK" },
                { "kind": "SAMPLE", "soundId": "clap", "trimStart": 0.1, "trimEnd": 0.2, "volume": 0.5 }
            ]
        }"#;
        let track: MusicTrack = serde_json::from_str(json).unwrap();
        let TrackSource::Generated { notes, rows } = track.source else {
            panic!("expected generated track");
        };
        assert_eq!(notes[0].duration, 1);
        assert_eq!(notes[1].duration, 2);
        assert_eq!(rows[0].volume, 1.0);
        assert!(matches!(
            rows[0].source,
            RowSource::Synth {
                preset: SynthPreset::Kick,
                ..
            }
        ));
        assert!(matches!(rows[1].source, RowSource::Sample { .. }));
    }

    #[test]
    fn sample_track_from_json() {
        let json = r#"{ "id": "theme", "type": "SAMPLE", "soundId": "loop1" }"#;
        let track: MusicTrack = serde_json::from_str(json).unwrap();
        assert_eq!(
            track.source,
            TrackSource::Sample {
                sound_id: "loop1".into()
            }
        );
    }
}
