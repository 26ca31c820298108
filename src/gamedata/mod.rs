//! Authored game data handed to the engine by the authoring layer.
//!
//! Everything in this module is plain serde data: the engine never mutates
//! it during a session. Scenes are templates that get instantiated into ECS
//! entities on reset (see [`crate::game::reset_scene`]), rules are matched by
//! [`crate::systems::rules`], and music tracks drive the
//! [`crate::audio::sequencer::StepSequencer`].
//!
//! The JSON shape uses camelCase keys, with `"type"` tags for triggers,
//! effects and music tracks.

pub mod music;
pub mod rule;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PlaykitError;
pub use music::{MusicTrack, NoteEvent, RowDef, RowSource, SynthPreset, TrackSource};
pub use rule::{
    Comparison, Direction, Effect, ParticleKind, Point, Rule, Target, Trigger, VarOp,
};

/// Scope of a rule or variable: the whole game, or a single scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    #[default]
    Global,
    Scene(String),
}

impl Scope {
    /// Whether this scope is live while `scene_id` is the active scene.
    pub fn applies_to(&self, scene_id: &str) -> bool {
        match self {
            Scope::Global => true,
            Scope::Scene(id) => id == scene_id,
        }
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("GLOBAL") || value.is_empty() {
            Scope::Global
        } else {
            Scope::Scene(value)
        }
    }
}

impl From<Scope> for String {
    fn from(value: Scope) -> Self {
        match value {
            Scope::Global => "GLOBAL".to_string(),
            Scope::Scene(id) => id,
        }
    }
}

/// Reusable visual template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Base image reference (opaque to the engine, usually a data URL).
    #[serde(default)]
    pub image: String,
    /// Optional animation frames, played at 100ms per frame.
    #[serde(default)]
    pub frames: Vec<String>,
}

impl Actor {
    /// Number of frames, never less than one.
    pub fn frame_count(&self) -> usize {
        self.frames.len().max(1)
    }

    /// Image shown after `elapsed` seconds of looping playback.
    pub fn frame_at(&self, elapsed: f32) -> &str {
        if self.frames.is_empty() {
            return &self.image;
        }
        let index = (elapsed.max(0.0) / FRAME_SECONDS) as usize % self.frames.len();
        &self.frames[index]
    }
}

/// Duration of one animation frame in seconds.
pub const FRAME_SECONDS: f32 = 0.1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(default)]
    pub image: Option<String>,
    /// When non-empty the background is animated.
    #[serde(default)]
    pub frames: Vec<String>,
}

impl Background {
    pub fn frame_at(&self, elapsed: f32) -> Option<&str> {
        if self.frames.is_empty() {
            return self.image.as_deref();
        }
        let index = (elapsed.max(0.0) / FRAME_SECONDS) as usize % self.frames.len();
        Some(&self.frames[index])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeldByData {
    /// Authored id of the carrying object in the same scene.
    pub holder_id: String,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathData {
    pub waypoints: Vec<Point>,
    #[serde(default)]
    pub index: usize,
    #[serde(default = "default_path_speed")]
    pub speed: f32,
    #[serde(default = "default_true", rename = "loop")]
    pub looped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationData {
    pub actor_id: String,
    #[serde(default, rename = "loop")]
    pub looped: bool,
    #[serde(default)]
    pub started_at: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayMode {
    #[default]
    None,
    Text,
    Bar,
    Icons,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudData {
    pub variable_id: String,
    #[serde(default)]
    pub mode: DisplayMode,
    #[serde(default)]
    pub label: Option<String>,
    /// Upper bound used by bar/icon displays.
    #[serde(default)]
    pub max: Option<f64>,
}

/// A placed instance of an actor inside a scene template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelObjectData {
    pub id: String,
    pub actor_id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    #[serde(default)]
    pub vz: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default)]
    pub held_by: Option<HeldByData>,
    /// Transient; ignored when a scene is reset.
    #[serde(default)]
    pub active_path: Option<PathData>,
    /// Transient; ignored when a scene is reset.
    #[serde(default)]
    pub active_animation: Option<AnimationData>,
    #[serde(default)]
    pub hud: Option<HudData>,
}

impl LevelObjectData {
    /// A plain instance at rest, as created at runtime by SPAWN and SHOOT.
    pub fn new(id: impl Into<String>, actor_id: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            actor_id: actor_id.into(),
            x,
            y,
            z: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            scale: 1.0,
            locked: false,
            ephemeral: false,
            held_by: None,
            active_path: None,
            active_animation: None,
            hud: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<LevelObjectData>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub music_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub initial: f64,
    #[serde(default)]
    pub display: DisplayMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Encoded payload, decoded by the host audio backend.
    #[serde(default)]
    pub payload: String,
}

/// The aggregate handed over by the authoring/storage layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub sounds: Vec<Sound>,
    #[serde(default)]
    pub music: Vec<MusicTrack>,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Actor playing the player role. Falls back to the first declared actor.
    #[serde(default)]
    pub player_actor_id: Option<String>,
}

impl GameData {
    pub fn from_json(json: &str) -> Result<Self, PlaykitError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlaykitError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn scene_index(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == id)
    }

    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }

    pub fn sound(&self, id: &str) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.id == id)
    }

    pub fn music_track(&self, id: &str) -> Option<&MusicTrack> {
        self.music.iter().find(|m| m.id == id)
    }

    /// Actor id of the player role.
    pub fn player_actor_id(&self) -> Option<&str> {
        self.player_actor_id
            .as_deref()
            .or_else(|| self.actors.first().map(|a| a.id.as_str()))
    }

    /// Rules live in the given scene, in declaration order.
    pub fn rules_in_scope<'a>(&'a self, scene_id: &'a str) -> impl Iterator<Item = &'a Rule> {
        self.rules.iter().filter(move |r| r.scope.applies_to(scene_id))
    }
}

fn default_background_color() -> String {
    "#000000".to_string()
}

fn default_scale() -> f32 {
    1.0
}

fn default_path_speed() -> f32 {
    2.0
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_global_and_scene() {
        assert_eq!(Scope::from("GLOBAL".to_string()), Scope::Global);
        assert_eq!(
            Scope::from("level-2".to_string()),
            Scope::Scene("level-2".to_string())
        );
        assert!(Scope::Global.applies_to("anything"));
        assert!(!Scope::Scene("a".into()).applies_to("b"));
    }

    #[test]
    fn player_role_falls_back_to_first_actor() {
        let json = r#"{ "actors": [ { "id": "hero" }, { "id": "rock" } ] }"#;
        let data = GameData::from_json(json).unwrap();
        assert_eq!(data.player_actor_id(), Some("hero"));

        let json = r#"{ "actors": [ { "id": "hero" }, { "id": "rock" } ], "playerActorId": "rock" }"#;
        let data = GameData::from_json(json).unwrap();
        assert_eq!(data.player_actor_id(), Some("rock"));
    }

    #[test]
    fn level_object_defaults() {
        let json = r#"{ "id": "o1", "actorId": "hero", "x": 10, "y": 20 }"#;
        let obj: LevelObjectData = serde_json::from_str(json).unwrap();
        assert_eq!(obj.scale, 1.0);
        assert_eq!(obj.z, 0.0);
        assert!(!obj.locked);
        assert!(obj.held_by.is_none());
    }

    #[test]
    fn actor_frames_loop_at_ten_fps() {
        let actor = Actor {
            id: "a".into(),
            name: String::new(),
            image: "base".into(),
            frames: vec!["f0".into(), "f1".into(), "f2".into()],
        };
        assert_eq!(actor.frame_at(0.0), "f0");
        assert_eq!(actor.frame_at(0.15), "f1");
        assert_eq!(actor.frame_at(0.31), "f0");
        assert_eq!(actor.frame_count(), 3);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            GameData::from_json("{ not json"),
            Err(PlaykitError::Json(_))
        ));
    }
}
