//! Short-lived visual particles emitted by the PARTICLES effect.
//!
//! Particles are plain entities carrying a [`Particle`]; they never carry a
//! [`LevelObject`](super::levelobject::LevelObject), so rules and the
//! collision detector ignore them.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::gamedata::ParticleKind;

/// Motion parameters shared by every particle of a kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleProfile {
    /// Downward acceleration in px/frame² (negative rises).
    pub gravity: f32,
    /// Fraction of velocity kept per frame.
    pub drag: f32,
    /// Initial speed range in px/frame.
    pub speed: (f32, f32),
    /// Lifetime range in seconds.
    pub life: (f32, f32),
    /// Size range in pixels.
    pub size: (f32, f32),
    /// Horizontal wobble amplitude in px/frame.
    pub wiggle: f32,
    pub palette: &'static [&'static str],
}

const CONFETTI: ParticleProfile = ParticleProfile {
    gravity: 0.15,
    drag: 0.98,
    speed: (3.0, 8.0),
    life: (1.0, 2.0),
    size: (4.0, 8.0),
    wiggle: 0.0,
    palette: &["#ff595e", "#ffca3a", "#8ac926", "#1982c4", "#6a4c93"],
};

const EXPLOSION: ParticleProfile = ParticleProfile {
    gravity: 0.05,
    drag: 0.92,
    speed: (4.0, 10.0),
    life: (0.4, 0.9),
    size: (3.0, 7.0),
    wiggle: 0.0,
    palette: &["#ff4500", "#ff8c00", "#ffd700"],
};

const SMOKE: ParticleProfile = ParticleProfile {
    gravity: -0.03,
    drag: 0.99,
    speed: (0.3, 1.2),
    life: (2.0, 3.5),
    size: (8.0, 16.0),
    wiggle: 0.4,
    palette: &["#777777", "#999999", "#bbbbbb"],
};

const RAIN: ParticleProfile = ParticleProfile {
    gravity: 0.0,
    drag: 1.0,
    speed: (10.0, 14.0),
    life: (0.3, 0.6),
    size: (1.0, 3.0),
    wiggle: 0.0,
    palette: &["#9fc5e8", "#6fa8dc"],
};

impl ParticleKind {
    pub fn profile(self) -> &'static ParticleProfile {
        match self {
            ParticleKind::Confetti => &CONFETTI,
            ParticleKind::Explosion => &EXPLOSION,
            ParticleKind::Smoke => &SMOKE,
            ParticleKind::Rain => &RAIN,
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Velocity in px/frame at a 60fps baseline.
    pub velocity: Vec2,
    /// Remaining life in seconds.
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: &'static str,
    /// Seed for the smoke wobble so neighbours drift apart.
    pub phase: f32,
}

impl Particle {
    /// Remaining life as a fraction of the initial life, for fading.
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Roll a new particle of `kind` at `origin`.
    pub fn emit(kind: ParticleKind, origin: Vec2, rng: &mut fastrand::Rng) -> Self {
        let profile = kind.profile();
        let speed = range(rng, profile.speed);
        let velocity = match kind {
            // Rain falls straight down with a slight slant.
            ParticleKind::Rain => Vec2::new(range(rng, (-0.5, 0.5)), speed),
            // Smoke starts drifting upwards.
            ParticleKind::Smoke => Vec2::new(range(rng, (-0.5, 0.5)), -speed),
            _ => {
                let angle = rng.f32() * std::f32::consts::TAU;
                Vec2::new(angle.cos(), angle.sin()) * speed
            }
        };
        let life = range(rng, profile.life);
        Self {
            kind,
            pos: origin,
            velocity,
            life,
            max_life: life,
            size: range(rng, profile.size),
            color: profile.palette[rng.usize(0..profile.palette.len())],
            phase: rng.f32() * std::f32::consts::TAU,
        }
    }
}

#[inline]
fn range(rng: &mut fastrand::Rng, (min, max): (f32, f32)) -> f32 {
    if max - min < f32::EPSILON {
        return min;
    }
    min + rng.f32() * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitted_particle_is_within_profile() {
        let mut rng = fastrand::Rng::with_seed(7);
        for kind in [
            ParticleKind::Confetti,
            ParticleKind::Explosion,
            ParticleKind::Smoke,
            ParticleKind::Rain,
        ] {
            let p = Particle::emit(kind, Vec2::new(10.0, 10.0), &mut rng);
            let profile = kind.profile();
            assert!(p.life >= profile.life.0 && p.life <= profile.life.1);
            assert!(p.size >= profile.size.0 && p.size <= profile.size.1);
            assert_eq!(p.pos, Vec2::new(10.0, 10.0));
        }
    }

    #[test]
    fn rain_falls_and_smoke_rises() {
        let mut rng = fastrand::Rng::with_seed(1);
        let rain = Particle::emit(ParticleKind::Rain, Vec2::ZERO, &mut rng);
        let smoke = Particle::emit(ParticleKind::Smoke, Vec2::ZERO, &mut rng);
        assert!(rain.velocity.y > 0.0);
        assert!(smoke.velocity.y < 0.0);
        assert!(SMOKE.life.0 > RAIN.life.1);
    }

    #[test]
    fn alpha_fades_with_life() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut p = Particle::emit(ParticleKind::Confetti, Vec2::ZERO, &mut rng);
        assert_eq!(p.alpha(), 1.0);
        p.life = p.max_life / 2.0;
        assert!((p.alpha() - 0.5).abs() < 1e-6);
    }
}
