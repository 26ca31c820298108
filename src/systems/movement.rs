//! Velocity integration with gravity on the jump axis.
//!
//! Speeds are authored in px/frame at 60fps, so every update scales by
//! `delta × 60`. `z` is the height above the ground: JUMP sets a positive
//! `vz` and gravity pulls it back until the object lands.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::boxcollider::BoxCollider;
use crate::components::held::HeldBy;
use crate::components::mapposition::MapPosition;
use crate::components::path::ActivePath;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::resources::gameconfig::GameConfig;
use crate::resources::worldtime::WorldTime;

/// Gravity in px/frame² at 60fps.
pub const GRAVITY: f32 = 1.5;
/// How far outside the stage an object may travel before it is removed.
pub const CULL_MARGIN: f32 = 50.0;

pub fn movement(
    mut commands: Commands,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    mut query: Query<
        (
            Entity,
            &mut MapPosition,
            &mut RigidBody,
            Option<&BoxCollider>,
            Option<&Scale>,
        ),
        (Without<HeldBy>, Without<ActivePath>),
    >,
) {
    let frames = time.frames();
    if frames <= 0.0 {
        return;
    }
    let stage = config.stage_size();

    for (entity, mut position, mut body, collider, scale) in query.iter_mut() {
        if !body.is_moving() && position.z <= 0.0 {
            continue;
        }
        position.pos += body.velocity * frames;
        position.z += body.vz * frames;
        if position.z > 0.0 || body.vz > 0.0 {
            body.vz -= GRAVITY * frames;
        }
        if position.z <= 0.0 {
            position.z = 0.0;
            if body.vz < 0.0 {
                body.vz = 0.0;
            }
        }

        let size = collider
            .map(|c| c.scaled_size(scale.map_or(1.0, |s| s.scale)))
            .unwrap_or_default();
        let p = position.pos;
        if p.x + size.x < -CULL_MARGIN
            || p.y + size.y < -CULL_MARGIN
            || p.x > stage.x + CULL_MARGIN
            || p.y > stage.y + CULL_MARGIN
        {
            debug!("Culling {:?} at {:?}", entity, p);
            commands.entity(entity).try_despawn();
        }
    }
}
