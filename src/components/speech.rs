//! Speech bubble shown by the SAY effect.

use bevy_ecs::prelude::Component;

/// Minimum time a bubble stays on screen, in seconds.
pub const MIN_BUBBLE_SECONDS: f32 = 2.0;
/// Extra on-screen time per character, in seconds.
pub const BUBBLE_SECONDS_PER_CHAR: f32 = 0.1;

/// Text shown above an object until `expires_at` (world time).
///
/// A new SAY replaces any bubble already on the object.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct SpeechBubble {
    pub text: String,
    pub expires_at: f32,
}

impl SpeechBubble {
    pub fn new(text: impl Into<String>, now: f32) -> Self {
        let text = text.into();
        let expires_at = now + Self::duration_for(&text);
        Self { text, expires_at }
    }

    /// max(2s, 100ms per character).
    pub fn duration_for(text: &str) -> f32 {
        (text.chars().count() as f32 * BUBBLE_SECONDS_PER_CHAR).max(MIN_BUBBLE_SECONDS)
    }

    pub fn is_expired(&self, now: f32) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_stays_two_seconds() {
        let bubble = SpeechBubble::new("hi", 1.0);
        assert!((bubble.expires_at - 3.0).abs() < 1e-6);
    }

    #[test]
    fn long_text_scales_with_length() {
        let text = "x".repeat(40);
        assert!((SpeechBubble::duration_for(&text) - 4.0).abs() < 1e-5);
        assert!(!SpeechBubble::new(text, 0.0).is_expired(3.9));
    }
}
