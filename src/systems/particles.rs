//! Particle integration.
//!
//! Each kind applies its own profile (see
//! [`ParticleKind::profile`](crate::gamedata::ParticleKind::profile)):
//! gravity, per-frame drag and, for smoke, a sideways wobble.

use bevy_ecs::prelude::*;

use crate::components::particle::Particle;
use crate::resources::worldtime::WorldTime;

pub fn particle_system(
    mut commands: Commands,
    time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Particle)>,
) {
    let dt = time.delta;
    if dt <= 0.0 {
        return;
    }
    let frames = time.frames();
    for (entity, mut particle) in query.iter_mut() {
        particle.life -= dt;
        if particle.life <= 0.0 {
            commands.entity(entity).try_despawn();
            continue;
        }
        let profile = particle.kind.profile();
        particle.velocity.y += profile.gravity * frames;
        particle.velocity *= profile.drag.powf(frames);
        let mut step = particle.velocity * frames;
        if profile.wiggle > 0.0 {
            step.x += (time.elapsed * 4.0 + particle.phase).sin() * profile.wiggle * frames;
        }
        particle.pos += step;
    }
}
