//! Session clock.
//!
//! `elapsed` is the authoritative clock for everything time-based in the
//! simulation: rule timers, WAIT/THEN resume deadlines, speech bubbles,
//! screen shake and animation playback. It keeps advancing in every status,
//! so suspended effect chains resume even while a scene transition or an
//! end screen is showing.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Scaled seconds since the session was created.
    pub elapsed: f32,
    /// Scaled seconds covered by the current frame.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Frame delta relative to the 60fps baseline speeds are authored in.
    pub fn frames(&self) -> f32 {
        self.delta * 60.0
    }
}
