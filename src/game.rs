//! Play session setup and scene management.
//!
//! [`Session`] owns the ECS [`World`] and the per-frame [`Schedule`] and is
//! the only surface a host needs: feed it [`GameData`], call
//! [`Session::start`], then [`Session::tick`] once per frame while forwarding
//! key presses, clicks and drags. [`Session::snapshot`] exposes what a
//! renderer would draw.
//!
//! [`reset_scene`] instantiates a scene template into entities. It is the one
//! place the live object set is rebuilt, used on start and by CHANGE_SCENE.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::common_conditions::resource_exists;
use glam::Vec2;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::audio::AudioBackend;
use crate::components::boxcollider::BoxCollider;
use crate::components::held::HeldBy;
use crate::components::hud::HudOverlay;
use crate::components::levelobject::{Ephemeral, LevelObject, Locked};
use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::events::audio::AudioCmd;
use crate::events::collision::observe_collision_edges;
use crate::events::gamestate::observe_gamestate_change_event;
use crate::events::input::{
    KeyPressedEvent, ObjectClickedEvent, observe_key_pressed, observe_object_clicked,
};
use crate::gamedata::{GameData, LevelObjectData};
use crate::resources::audio::{AudioBridge, send_audio_cmd, setup_audio, shutdown_audio};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamedata::GameDataRes;
use crate::resources::gamestate::{ActiveScene, GameState, NextGameState, SessionStatus};
use crate::resources::rng::SessionRng;
use crate::resources::rulestate::{RuleGuards, RuleTimers};
use crate::resources::shake::ScreenShake;
use crate::resources::tasks::RuleTasks;
use crate::resources::touching::TouchingPairs;
use crate::resources::triggers::{PendingTriggers, TriggerEvent};
use crate::resources::variables::RuntimeVariables;
use crate::resources::worldtime::WorldTime;
use crate::snapshot::{WorldSnapshot, capture};
use crate::systems::animation::finish_animations;
use crate::systems::audio::{
    forward_audio_cmds, log_audio_messages, poll_audio_messages, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use crate::systems::collision::{collision_detector, drag_object};
use crate::systems::effects::drive_rule_tasks;
use crate::systems::gamestate::{check_pending_state, request_status, state_is_playing};
use crate::systems::held::held_system;
use crate::systems::movement::movement;
use crate::systems::particles::particle_system;
use crate::systems::path::path_system;
use crate::systems::rules::dispatch_rules;
use crate::systems::speech::{decay_screen_shake, expire_speech_bubbles};
use crate::systems::time::update_world_time;
use crate::systems::ttl::ttl_system;

/// Instantiate one level object. Transient path and animation state in the
/// template is not carried over.
pub fn spawn_object(world: &mut World, object: &LevelObjectData, actor_size: f32) -> Entity {
    let mut entity = world.spawn((
        LevelObject::new(&object.id, &object.actor_id),
        MapPosition::new(object.x, object.y).with_z(object.z.max(0.0)),
        RigidBody::new(object.vx, object.vy).with_vz(object.vz),
        Scale::new(object.scale),
        BoxCollider::new(actor_size, actor_size),
    ));
    if object.locked {
        entity.insert(Locked);
    }
    if object.ephemeral {
        entity.insert(Ephemeral);
    }
    if let Some(hud) = &object.hud {
        entity.insert(HudOverlay::from(hud));
    }
    entity.id()
}

/// Replace the live world with a fresh copy of scene `index`.
///
/// Every level object and particle is despawned, scene-scoped variables go
/// back to their initial values, guards, timers and contacts are cleared, and
/// the scene's music starts. The session is PLAYING afterwards and START
/// rules are queued for the next dispatch.
pub fn reset_scene(world: &mut World, index: usize) {
    let data = world.resource::<GameDataRes>().shared();
    let Some(scene) = data.scenes.get(index) else {
        warn!("Cannot reset into unknown scene #{}", index);
        return;
    };
    info!("Resetting scene '{}' (#{})", scene.id, index);

    let doomed: Vec<Entity> = world
        .query_filtered::<Entity, Or<(With<LevelObject>, With<Particle>)>>()
        .iter(world)
        .collect();
    for entity in doomed {
        world.despawn(entity);
    }

    world.resource_mut::<TouchingPairs>().clear();
    world.resource_mut::<RuleGuards>().reset();
    world.resource_mut::<RuleTimers>().clear();
    world.resource_mut::<PendingTriggers>().clear();
    *world.resource_mut::<ScreenShake>() = ScreenShake::default();
    *world.resource_mut::<ActiveScene>() = ActiveScene {
        index,
        id: scene.id.clone(),
    };
    world
        .resource_mut::<RuntimeVariables>()
        .enter_scene(&data, &scene.id);

    let actor_size = world.resource::<GameConfig>().actor_size();
    let mut by_id: FxHashMap<&str, Entity> = FxHashMap::default();
    for object in &scene.objects {
        if data.actor(&object.actor_id).is_none() {
            warn!(
                "Object '{}' uses unknown actor '{}', skipped",
                object.id, object.actor_id
            );
            continue;
        }
        let entity = spawn_object(world, object, actor_size);
        by_id.insert(object.id.as_str(), entity);
    }
    for object in &scene.objects {
        let Some(held) = &object.held_by else {
            continue;
        };
        match (
            by_id.get(object.id.as_str()),
            by_id.get(held.holder_id.as_str()),
        ) {
            (Some(&entity), Some(&holder)) if entity != holder => {
                world.entity_mut(entity).insert(
                    HeldBy::new(holder).with_offset(Vec2::new(held.offset_x, held.offset_y)),
                );
            }
            _ => warn!(
                "Object '{}' is held by missing object '{}'",
                object.id, held.holder_id
            ),
        }
    }

    match scene.music_id.as_deref() {
        Some(music_id) => match data.music_track(music_id) {
            Some(track) => send_audio_cmd(
                world,
                AudioCmd::PlayMusic {
                    track: track.clone(),
                },
            ),
            None => {
                warn!("Scene '{}' uses unknown track '{}'", scene.id, music_id);
                send_audio_cmd(world, AudioCmd::StopMusic);
            }
        },
        None => send_audio_cmd(world, AudioCmd::StopMusic),
    }

    request_status(world, SessionStatus::Playing);
    world
        .resource_mut::<PendingTriggers>()
        .push(TriggerEvent::Start);
}

/// Build the per-frame schedule.
///
/// Order matters: held objects snap to carriers before paths and velocity
/// move them, contacts are detected on final positions, and rules see this
/// frame's contacts. Parked effect chains resume last, in every status.
fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            check_pending_state,
            (held_system, path_system, movement)
                .chain()
                .run_if(state_is_playing),
            (
                particle_system,
                ttl_system,
                finish_animations,
                expire_speech_bubbles,
                decay_screen_shake,
            )
                .chain(),
            collision_detector.run_if(state_is_playing),
            dispatch_rules,
            drive_rule_tasks,
        )
            .chain(),
    );
    update.add_systems(
        // audio systems must be together
        (
            update_bevy_audio_cmds,
            forward_audio_cmds,
            poll_audio_messages,
            update_bevy_audio_messages,
            log_audio_messages,
        )
            .chain()
            .run_if(resource_exists::<AudioBridge>)
            .after(drive_rule_tasks),
    );
    update
}

/// A running play session.
pub struct Session {
    world: World,
    update: Schedule,
}

impl Session {
    pub fn new(data: GameData, config: GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(SessionRng::new(config.seed));
        world.insert_resource(config);
        world.insert_resource(GameState::new());
        world.insert_resource(NextGameState::new());
        world.insert_resource(ActiveScene::default());
        world.insert_resource(GameDataRes::new(data));
        world.insert_resource(RuntimeVariables::default());
        world.insert_resource(RuleGuards::default());
        world.insert_resource(RuleTimers::default());
        world.insert_resource(RuleTasks::default());
        world.insert_resource(PendingTriggers::default());
        world.insert_resource(TouchingPairs::default());
        world.insert_resource(ScreenShake::default());

        world.spawn(Observer::new(observe_gamestate_change_event));
        world.spawn(Observer::new(observe_collision_edges));
        world.spawn(Observer::new(observe_key_pressed));
        world.spawn(Observer::new(observe_object_clicked));
        // Observers must be registered before anything triggers events.
        world.flush();

        Session {
            world,
            update: build_schedule(),
        }
    }

    /// Start the audio thread around `backend`. Without it the session runs
    /// silently.
    pub fn attach_audio(&mut self, backend: Box<dyn AudioBackend>) {
        let config = self.world.resource::<GameConfig>().clone();
        setup_audio(&mut self.world, backend, &config);
    }

    /// Hand every sound payload to the audio thread for decoding and move to
    /// READY. Decode failures are reported asynchronously and only silence
    /// the affected sound.
    pub fn load(&mut self) {
        let data = self.world.resource::<GameDataRes>().shared();
        for sound in &data.sounds {
            send_audio_cmd(
                &mut self.world,
                AudioCmd::LoadSound {
                    id: sound.id.clone(),
                    payload: sound.payload.clone(),
                },
            );
        }
        self.world
            .resource_mut::<RuntimeVariables>()
            .enter_scene(&data, "");
        info!(
            "Loaded {} actors, {} scenes, {} rules, {} sounds",
            data.actors.len(),
            data.scenes.len(),
            data.rules.len(),
            data.sounds.len()
        );
        request_status(&mut self.world, SessionStatus::Ready);
    }

    /// Enter the first scene and begin play.
    pub fn start(&mut self) {
        if self.status() == SessionStatus::Loading {
            self.load();
        }
        if self.world.resource::<GameDataRes>().scenes.is_empty() {
            warn!("Game has no scenes, nothing to play");
            return;
        }
        reset_scene(&mut self.world, 0);
    }

    /// Advance the session by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn key_down(&mut self, key: impl Into<String>) {
        self.world.trigger(KeyPressedEvent { key: key.into() });
    }

    /// Click at stage coordinates. Returns the clicked object, the topmost
    /// one when several overlap.
    pub fn click_at(&mut self, x: f32, y: f32) -> Option<Entity> {
        let entity = self.object_at(Vec2::new(x, y))?;
        debug!("Click at ({}, {}) hit {:?}", x, y, entity);
        self.world.trigger(ObjectClickedEvent { entity });
        Some(entity)
    }

    /// Drag `entity` so its top-left corner lands on (x, y). Returns whether
    /// the object moved.
    pub fn drag(&mut self, entity: Entity, x: f32, y: f32) -> bool {
        if !self.world.resource::<GameState>().is_playing() {
            return false;
        }
        drag_object(&mut self.world, entity, Vec2::new(x, y))
    }

    pub fn snapshot(&mut self) -> WorldSnapshot {
        capture(&mut self.world)
    }

    /// Stop music and join the audio thread. Safe to call more than once.
    pub fn shutdown(&mut self) {
        shutdown_audio(&mut self.world);
    }

    pub fn status(&self) -> SessionStatus {
        self.world.resource::<GameState>().get()
    }

    /// First live instance with the authored id `id`.
    pub fn find_object(&mut self, id: &str) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &LevelObject)>();
        let mut found: Vec<Entity> = query
            .iter(&self.world)
            .filter(|(_, object)| object.id == id)
            .map(|(entity, _)| entity)
            .collect();
        found.sort();
        found.first().copied()
    }

    pub fn variable(&self, id: &str) -> Option<f64> {
        self.world.resource::<RuntimeVariables>().get(id)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn object_at(&mut self, point: Vec2) -> Option<Entity> {
        let mut query = self
            .world
            .query::<(Entity, &MapPosition, &BoxCollider, &Scale)>();
        query
            .iter(&self.world)
            .filter(|(_, position, collider, scale)| {
                collider.contains_point(position.pos, scale.scale, point)
            })
            .max_by(|(ea, pa, _, _), (eb, pb, _, _)| pa.z.total_cmp(&pb.z).then(ea.cmp(eb)))
            .map(|(entity, _, _, _)| entity)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
