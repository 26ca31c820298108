//! Game configuration resource.
//!
//! Session settings loaded from an INI configuration file. Defaults are safe
//! to run with when no file is present.
//!
//! # Configuration File Format
//!
//! ```ini
//! [stage]
//! width = 800
//! height = 600
//! actor_size = 64
//!
//! [session]
//! fps = 60
//! seed = 42
//!
//! [audio]
//! enabled = true
//! lookahead_ms = 100
//! schedule_interval_ms = 25
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::{Path, PathBuf};

use crate::error::PlaykitError;

/// Default safe values for startup
const DEFAULT_STAGE_WIDTH: u32 = 800;
const DEFAULT_STAGE_HEIGHT: u32 = 600;
const DEFAULT_ACTOR_SIZE: u32 = 64;
const DEFAULT_FPS: u32 = 60;
const DEFAULT_AUDIO_ENABLED: bool = true;
const DEFAULT_LOOKAHEAD_MS: u64 = 100;
const DEFAULT_SCHEDULE_INTERVAL_MS: u64 = 25;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Stage width in pixels; objects further than the cull margin outside are removed.
    pub stage_width: u32,
    pub stage_height: u32,
    /// Base edge length of every actor box before scaling. Also the STEP distance.
    pub actor_size: u32,
    /// Fixed frame rate used by the headless runner.
    pub fps: u32,
    /// Seed for [`SessionRng`](crate::resources::rng::SessionRng); random when absent.
    pub seed: Option<u64>,
    pub audio_enabled: bool,
    /// How far ahead of the backend clock the sequencer schedules notes.
    pub lookahead_ms: u64,
    /// Wake-up period of the sequencer scheduler.
    pub schedule_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            stage_width: DEFAULT_STAGE_WIDTH,
            stage_height: DEFAULT_STAGE_HEIGHT,
            actor_size: DEFAULT_ACTOR_SIZE,
            fps: DEFAULT_FPS,
            seed: None,
            audio_enabled: DEFAULT_AUDIO_ENABLED,
            lookahead_ms: DEFAULT_LOOKAHEAD_MS,
            schedule_interval_ms: DEFAULT_SCHEDULE_INTERVAL_MS,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from an INI file on top of the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PlaykitError> {
        let mut config = Self::new();
        config.load_from_file(path)?;
        Ok(config)
    }

    /// Load values from an INI file. Missing values retain their current values.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), PlaykitError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| PlaykitError::Config {
            path: PathBuf::from(path),
            reason,
        })?;
        self.apply_ini(&ini);
        info!(
            "Loaded config: stage {}x{}, actor {}px, fps={}, audio={} ({}ms ahead every {}ms)",
            self.stage_width,
            self.stage_height,
            self.actor_size,
            self.fps,
            self.audio_enabled,
            self.lookahead_ms,
            self.schedule_interval_ms
        );
        Ok(())
    }

    /// Parse values from INI text. Used by tests and hosts that embed config.
    pub fn load_from_str(&mut self, content: &str) -> Result<(), PlaykitError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| PlaykitError::Config {
                path: PathBuf::from("<inline>"),
                reason,
            })?;
        self.apply_ini(&ini);
        Ok(())
    }

    fn apply_ini(&mut self, ini: &Ini) {
        // [stage] section
        if let Some(width) = ini.getuint("stage", "width").ok().flatten() {
            self.stage_width = width as u32;
        }
        if let Some(height) = ini.getuint("stage", "height").ok().flatten() {
            self.stage_height = height as u32;
        }
        if let Some(size) = ini.getuint("stage", "actor_size").ok().flatten() {
            self.actor_size = size as u32;
        }

        // [session] section
        if let Some(fps) = ini.getuint("session", "fps").ok().flatten() {
            self.fps = (fps as u32).max(1);
        }
        if let Some(seed) = ini.getuint("session", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        // [audio] section
        if let Some(enabled) = ini.getbool("audio", "enabled").ok().flatten() {
            self.audio_enabled = enabled;
        }
        if let Some(ms) = ini.getuint("audio", "lookahead_ms").ok().flatten() {
            self.lookahead_ms = ms;
        }
        if let Some(ms) = ini.getuint("audio", "schedule_interval_ms").ok().flatten() {
            self.schedule_interval_ms = ms.max(1);
        }
    }

    pub fn stage_size(&self) -> Vec2 {
        Vec2::new(self.stage_width as f32, self.stage_height as f32)
    }

    pub fn actor_size(&self) -> f32 {
        self.actor_size as f32
    }

    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GameConfig::new();
        assert_eq!(config.stage_size(), Vec2::new(800.0, 600.0));
        assert_eq!(config.actor_size, 64);
        assert_eq!(config.fps, 60);
        assert_eq!(config.lookahead_ms, 100);
        assert_eq!(config.schedule_interval_ms, 25);
        assert!(config.seed.is_none());
    }

    #[test]
    fn partial_ini_keeps_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[stage]\nwidth = 320\n\n[session]\nseed = 9\n\n[audio]\nenabled = false\n")
            .unwrap();
        assert_eq!(config.stage_width, 320);
        assert_eq!(config.stage_height, 600);
        assert_eq!(config.seed, Some(9));
        assert!(!config.audio_enabled);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = GameConfig::from_file("/definitely/not/here.ini");
        assert!(matches!(result, Err(PlaykitError::Config { .. })));
    }
}
