//! Animation override started by PLAY_ANIM.
//!
//! While present, the object shows the frames of `actor_id` instead of its
//! own actor. Non-looping animations are removed once their last frame has
//! been shown.

use bevy_ecs::prelude::Component;

use crate::gamedata::FRAME_SECONDS;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct ActiveAnimation {
    /// Actor whose frames are played.
    pub actor_id: String,
    pub looped: bool,
    /// `WorldTime::elapsed` when playback started.
    pub started_at: f32,
    /// Frame count of the played actor, at least one.
    pub frame_count: usize,
}

impl ActiveAnimation {
    pub fn new(actor_id: impl Into<String>, frame_count: usize, started_at: f32) -> Self {
        Self {
            actor_id: actor_id.into(),
            looped: false,
            started_at,
            frame_count: frame_count.max(1),
        }
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Total playback length in seconds.
    pub fn duration(&self) -> f32 {
        self.frame_count as f32 * FRAME_SECONDS
    }

    /// Frame shown at time `now`.
    pub fn frame_index(&self, now: f32) -> usize {
        let frame = ((now - self.started_at).max(0.0) / FRAME_SECONDS) as usize;
        if self.looped {
            frame % self.frame_count
        } else {
            frame.min(self.frame_count - 1)
        }
    }

    pub fn is_finished(&self, now: f32) -> bool {
        !self.looped && now - self.started_at >= self.duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_holds_last_frame_then_finishes() {
        let anim = ActiveAnimation::new("boom", 3, 1.0);
        assert_eq!(anim.frame_index(1.0), 0);
        assert_eq!(anim.frame_index(1.25), 2);
        assert_eq!(anim.frame_index(5.0), 2);
        assert!(!anim.is_finished(1.2));
        assert!(anim.is_finished(1.31));
    }

    #[test]
    fn looping_wraps_and_never_finishes() {
        let anim = ActiveAnimation::new("walk", 2, 0.0).with_loop(true);
        assert_eq!(anim.frame_index(0.25), 0);
        assert!(!anim.is_finished(100.0));
    }
}
