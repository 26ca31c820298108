use bevy_ecs::prelude::Resource;

/// Time for a shake to die down, in seconds.
pub const SHAKE_DECAY_SECONDS: f32 = 0.5;
pub const DEFAULT_SHAKE_INTENSITY: f32 = 10.0;

/// Screen shake set by SHAKE, decaying linearly to zero.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    pub peak: f32,
    pub started_at: f32,
    /// Current intensity, refreshed every frame.
    pub intensity: f32,
}

impl ScreenShake {
    pub fn start(&mut self, intensity: f32, now: f32) {
        self.peak = intensity;
        self.started_at = now;
        self.intensity = intensity;
    }

    pub fn update(&mut self, now: f32) {
        let t = ((now - self.started_at) / SHAKE_DECAY_SECONDS).clamp(0.0, 1.0);
        self.intensity = self.peak * (1.0 - t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_linearly_over_half_a_second() {
        let mut shake = ScreenShake::default();
        shake.start(10.0, 1.0);
        shake.update(1.25);
        assert!((shake.intensity - 5.0).abs() < 1e-5);
        shake.update(1.6);
        assert_eq!(shake.intensity, 0.0);
    }
}
