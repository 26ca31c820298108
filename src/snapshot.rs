//! Read-only view of the world for renderers and the headless runner.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::components::animation::ActiveAnimation;
use crate::components::boxcollider::BoxCollider;
use crate::components::held::HeldBy;
use crate::components::hud::HudOverlay;
use crate::components::levelobject::{Ephemeral, LevelObject, Locked};
use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::scale::Scale;
use crate::components::speech::SpeechBubble;
use crate::gamedata::{DisplayMode, GameData};
use crate::resources::gamedata::GameDataRes;
use crate::resources::gamestate::{ActiveScene, GameState, SessionStatus};
use crate::resources::shake::ScreenShake;
use crate::resources::variables::RuntimeVariables;
use crate::resources::worldtime::WorldTime;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub status: SessionStatus,
    pub scene_id: String,
    pub elapsed: f32,
    pub background: Option<String>,
    pub background_color: String,
    /// Current screen-shake amplitude in pixels.
    pub shake: f32,
    /// Sorted by id.
    pub variables: BTreeMap<String, f64>,
    /// In spawn order.
    pub objects: Vec<ObjectSnapshot>,
    pub particles: Vec<ParticleSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSnapshot {
    pub id: String,
    pub actor_id: String,
    /// Frame currently displayed, taking PLAY_ANIM overrides into account.
    pub image: Option<String>,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub locked: bool,
    pub ephemeral: bool,
    /// Authored id of the carrier.
    pub held_by: Option<String>,
    pub speech: Option<String>,
    pub hud: Option<HudSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    pub variable_id: String,
    pub label: String,
    pub mode: DisplayMode,
    pub value: f64,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSnapshot {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: &'static str,
    pub alpha: f32,
}

/// Collect a snapshot of the current world.
pub fn capture(world: &mut World) -> WorldSnapshot {
    let data = world.resource::<GameDataRes>().shared();
    let now = world.resource::<WorldTime>().elapsed;
    let scene_id = world.resource::<ActiveScene>().id.clone();
    let variables: BTreeMap<String, f64> = world
        .resource::<RuntimeVariables>()
        .values()
        .iter()
        .map(|(id, value)| (id.clone(), *value))
        .collect();

    let mut query = world.query::<(
        Entity,
        &LevelObject,
        &MapPosition,
        &BoxCollider,
        &Scale,
        Option<&ActiveAnimation>,
        Option<&HeldBy>,
        Option<&SpeechBubble>,
        Option<&HudOverlay>,
        Has<Locked>,
        Has<Ephemeral>,
    )>();
    let mut rows: Vec<_> = query.iter(world).collect();
    rows.sort_by_key(|row| row.0);

    let objects: Vec<ObjectSnapshot> = rows
        .iter()
        .map(
            |&(_, object, position, collider, scale, animation, held, speech, hud, locked, ephemeral)| {
                let size = collider.scaled_size(scale.scale);
                ObjectSnapshot {
                    id: object.id.clone(),
                    actor_id: object.actor_id.clone(),
                    image: displayed_image(&data, object, animation, now),
                    x: position.pos.x,
                    y: position.pos.y,
                    z: position.z,
                    width: size.x,
                    height: size.y,
                    scale: scale.scale,
                    locked,
                    ephemeral,
                    held_by: held
                        .and_then(|h| world.get::<LevelObject>(h.holder))
                        .map(|carrier| carrier.id.clone()),
                    speech: speech.map(|bubble| bubble.text.clone()),
                    hud: hud.map(|hud| hud_snapshot(&data, hud, &variables)),
                }
            },
        )
        .collect();

    let mut particle_query = world.query::<&Particle>();
    let particles = particle_query
        .iter(world)
        .map(|p| ParticleSnapshot {
            x: p.pos.x,
            y: p.pos.y,
            size: p.size,
            color: p.color,
            alpha: p.alpha(),
        })
        .collect();

    WorldSnapshot {
        status: world.resource::<GameState>().get(),
        background: data
            .scene(&scene_id)
            .and_then(|scene| scene.background.frame_at(now))
            .map(str::to_string),
        scene_id,
        elapsed: now,
        background_color: data.background_color.clone(),
        shake: world.resource::<ScreenShake>().intensity,
        variables,
        objects,
        particles,
    }
}

fn displayed_image(
    data: &GameData,
    object: &LevelObject,
    animation: Option<&ActiveAnimation>,
    now: f32,
) -> Option<String> {
    if let Some(animation) = animation {
        let actor = data.actor(&animation.actor_id)?;
        let frame = animation.frame_index(now);
        return Some(
            actor
                .frames
                .get(frame)
                .unwrap_or(&actor.image)
                .clone(),
        );
    }
    data.actor(&object.actor_id)
        .map(|actor| actor.frame_at(now).to_string())
}

fn hud_snapshot(
    data: &GameData,
    hud: &HudOverlay,
    variables: &BTreeMap<String, f64>,
) -> HudSnapshot {
    let label = hud
        .label
        .clone()
        .or_else(|| data.variable(&hud.variable_id).map(|v| v.name.clone()))
        .unwrap_or_else(|| hud.variable_id.clone());
    HudSnapshot {
        variable_id: hud.variable_id.clone(),
        label,
        mode: hud.mode,
        value: variables.get(&hud.variable_id).copied().unwrap_or(0.0),
        max: hud.max,
    }
}
