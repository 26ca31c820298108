//! Effect interpreter.
//!
//! A fired rule becomes a [`RuleTask`] that walks the rule's effect list in
//! order. Most effects apply immediately; some also add to the task's pacing
//! delay (SAY, STEP, CHASE, PLAY_ANIM). THEN parks the task for the pending
//! delay, WAIT for the pending delay plus its own duration, and CHANGE_SCENE
//! for the transition pause. A parked task is resumed by
//! [`drive_rule_tasks`] once the session clock reaches its deadline; every
//! effect re-reads the world when it runs, so state changed by other rules
//! during the pause is seen.
//!
//! Missing actors, instances or scenes skip the affected target only. No
//! failure aborts the rest of the list.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info, warn};
use smallvec::{SmallVec, smallvec};

use crate::components::animation::ActiveAnimation;
use crate::components::boxcollider::BoxCollider;
use crate::components::held::HeldBy;
use crate::components::levelobject::{LevelObject, Projectile};
use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::path::{ActivePath, DEFAULT_PATH_SPEED};
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::components::speech::SpeechBubble;
use crate::components::ttl::{PROJECTILE_LIFETIME, Ttl};
use crate::events::audio::AudioCmd;
use crate::game::{reset_scene, spawn_object};
use crate::gamedata::{Effect, GameData, LevelObjectData, Rule, Target};
use crate::resources::audio::send_audio_cmd;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamedata::GameDataRes;
use crate::resources::gamestate::{ActiveScene, SessionStatus};
use crate::resources::rng::SessionRng;
use crate::resources::rulestate::RuleGuards;
use crate::resources::shake::{DEFAULT_SHAKE_INTENSITY, ScreenShake};
use crate::resources::tasks::{RuleTask, RuleTasks};
use crate::resources::triggers::{PendingTriggers, TriggerEvent};
use crate::resources::variables::RuntimeVariables;
use crate::resources::worldtime::WorldTime;
use crate::systems::gamestate::request_status;

pub const SAY_DELAY: f32 = 0.5;
pub const STEP_DELAY: f32 = 0.2;
pub const CHASE_DELAY: f32 = 0.2;
pub const DEFAULT_WAIT_MS: u32 = 1000;
/// Pause between CHANGE_SCENE and the reset into the next scene.
pub const SCENE_TRANSITION_DELAY: f32 = 1.0;
pub const DEFAULT_JUMP_STRENGTH: f32 = 12.0;
pub const PUSH_DISTANCE: f32 = 50.0;
pub const CHASE_STEP: f32 = 10.0;
/// CHASE does nothing once the chaser is this close.
pub const CHASE_MIN_DISTANCE: f32 = 5.0;
pub const DEFAULT_SHOT_SPEED: f32 = 8.0;
pub const DEFAULT_PARTICLE_COUNT: u32 = 20;

/// What the task does after an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    /// Park for this many seconds.
    Suspend(f32),
    /// Park for the transition pause, then reset into this scene.
    ChangeScene(usize),
}

type Targets = SmallVec<[Entity; 8]>;

/// Resume every parked task whose deadline has passed.
pub fn drive_rule_tasks(world: &mut World) {
    let now = world.resource::<WorldTime>().elapsed;
    let tasks = std::mem::take(&mut world.resource_mut::<RuleTasks>().tasks);
    if tasks.is_empty() {
        return;
    }
    let data = world.resource::<GameDataRes>().shared();

    let mut parked = Vec::with_capacity(tasks.len());
    for task in tasks {
        if !task.is_due(now) {
            parked.push(task);
            continue;
        }
        if let Some(task) = run_task(world, &data, task) {
            parked.push(task);
        }
    }
    world.resource_mut::<RuleTasks>().tasks.extend(parked);
}

/// Run `task` until it parks or completes.
///
/// Returns the parked task, or `None` once the list is done and the guard
/// has been released.
pub fn run_task(world: &mut World, data: &GameData, mut task: RuleTask) -> Option<RuleTask> {
    let Some(rule) = data.rules.get(task.rule_index) else {
        warn!("Task refers to unknown rule #{}", task.rule_index);
        return None;
    };
    let now = world.resource::<WorldTime>().elapsed;

    if let Some(index) = task.scene_change.take() {
        reset_scene(world, index);
    }

    while let Some(effect) = rule.effects.get(task.cursor) {
        task.cursor += 1;
        match apply_effect(world, data, rule, &mut task, effect, now) {
            Flow::Continue => {}
            Flow::Suspend(seconds) if seconds > 0.0 => {
                task.resume_at = now + seconds;
                return Some(task);
            }
            Flow::Suspend(_) => {}
            Flow::ChangeScene(index) => {
                task.scene_change = Some(index);
                task.resume_at = now + SCENE_TRANSITION_DELAY;
                return Some(task);
            }
        }
    }

    // The guard covers the trailing pacing delay too.
    if task.pending_delay > 0.0 {
        task.resume_at = now + task.pending_delay;
        task.pending_delay = 0.0;
        return Some(task);
    }

    let cooldown = task.cooldown.map(|c| now + c);
    world
        .resource_mut::<RuleGuards>()
        .release(&task.guard, task.epoch, cooldown);
    debug!("Rule '{}' finished for {:?}", rule.id, task.subject);
    None
}

fn apply_effect(
    world: &mut World,
    data: &GameData,
    rule: &Rule,
    task: &mut RuleTask,
    effect: &Effect,
    now: f32,
) -> Flow {
    match effect {
        Effect::Say { text, target } => {
            for entity in resolve(world, rule, task, target) {
                world
                    .entity_mut(entity)
                    .insert(SpeechBubble::new(text.clone(), now));
            }
            task.pending_delay += SAY_DELAY;
        }
        Effect::Wait { duration_ms } => {
            let wait = duration_ms.unwrap_or(DEFAULT_WAIT_MS) as f32 / 1000.0;
            let total = task.pending_delay + wait;
            task.pending_delay = 0.0;
            return Flow::Suspend(total);
        }
        Effect::Then => {
            let total = task.pending_delay;
            task.pending_delay = 0.0;
            return Flow::Suspend(total);
        }
        Effect::ModifyVar {
            variable_id,
            op,
            value,
        } => {
            let changed = world
                .resource_mut::<RuntimeVariables>()
                .modify(variable_id, *op, *value);
            if changed {
                world
                    .resource_mut::<PendingTriggers>()
                    .push(TriggerEvent::VariableChanged);
            }
        }
        Effect::Spawn { actor_id, x, y } => {
            if data.actor(actor_id).is_none() {
                warn!("SPAWN: unknown actor '{}'", actor_id);
                return Flow::Continue;
            }
            let object =
                LevelObjectData::new(format!("{}-spawned", actor_id), actor_id.clone(), *x, *y);
            let actor_size = world.resource::<GameConfig>().actor_size();
            spawn_object(world, &object, actor_size);
        }
        Effect::Win => request_status(world, SessionStatus::Won),
        Effect::DestroySubject => destroy(world, data, task.subject),
        Effect::DestroyObject => destroy(world, data, task.object),
        Effect::ChangeScene { scene_id } => {
            let index = match scene_id {
                Some(id) => match data.scene_index(id) {
                    Some(index) => index,
                    None => {
                        warn!("CHANGE_SCENE: unknown scene '{}'", id);
                        return Flow::Continue;
                    }
                },
                None => {
                    let current = world.resource::<ActiveScene>().index;
                    (current + 1) % data.scenes.len().max(1)
                }
            };
            request_status(world, SessionStatus::Transition);
            return Flow::ChangeScene(index);
        }
        Effect::Jump { strength, target } => {
            let vz = strength.unwrap_or(DEFAULT_JUMP_STRENGTH);
            for entity in resolve(world, rule, task, target) {
                if let Some(mut body) = world.get_mut::<RigidBody>(entity) {
                    body.vz = vz;
                }
            }
        }
        Effect::Swap { actor_id, target } => {
            if data.actor(actor_id).is_none() {
                warn!("SWAP: unknown actor '{}'", actor_id);
                return Flow::Continue;
            }
            for entity in resolve(world, rule, task, target) {
                let mut entity_mut = world.entity_mut(entity);
                if let Some(mut object) = entity_mut.get_mut::<LevelObject>() {
                    object.actor_id = actor_id.clone();
                }
                entity_mut.remove::<ActiveAnimation>();
            }
        }
        Effect::PlayAnim {
            actor_id,
            looped,
            target,
        } => {
            let Some(actor) = data.actor(actor_id) else {
                warn!("PLAY_ANIM: unknown actor '{}'", actor_id);
                return Flow::Continue;
            };
            let frames = actor.frame_count();
            for entity in resolve(world, rule, task, target) {
                world.entity_mut(entity).insert(
                    ActiveAnimation::new(actor_id.clone(), frames, now).with_loop(*looped),
                );
            }
            if !(*looped && frames == 1) {
                task.pending_delay += frames as f32 * 0.1 + 0.1;
            }
        }
        Effect::Push { target } => {
            for entity in resolve(world, rule, task, target) {
                let angle = world.resource_mut::<SessionRng>().0.f32() * std::f32::consts::TAU;
                let offset = Vec2::new(angle.cos(), angle.sin()) * PUSH_DISTANCE;
                displace(world, entity, offset);
            }
        }
        Effect::Step { direction, target } => {
            let (dx, dy) = direction.unit();
            let offset = Vec2::new(dx, dy) * world.resource::<GameConfig>().actor_size();
            for entity in resolve(world, rule, task, target) {
                displace(world, entity, offset);
            }
            task.pending_delay += STEP_DELAY;
        }
        Effect::Shake { intensity } => {
            world
                .resource_mut::<ScreenShake>()
                .start(intensity.unwrap_or(DEFAULT_SHAKE_INTENSITY), now);
        }
        Effect::Chase {
            target_actor_id,
            target,
        } => {
            let goal_actor = target_actor_id
                .as_deref()
                .or_else(|| data.player_actor_id());
            if let Some(goal_actor) = goal_actor {
                let goals = instances_of(world, goal_actor);
                for entity in resolve(world, rule, task, target) {
                    chase_step(world, entity, &goals);
                }
            }
            task.pending_delay += CHASE_DELAY;
        }
        Effect::Move {
            waypoints,
            speed,
            looped,
            target,
        } => {
            if waypoints.is_empty() {
                return Flow::Continue;
            }
            let points: Vec<Vec2> = waypoints.iter().map(|p| Vec2::new(p.x, p.y)).collect();
            for entity in resolve(world, rule, task, target) {
                world.entity_mut(entity).insert(
                    ActivePath::new(points.clone())
                        .with_speed(speed.unwrap_or(DEFAULT_PATH_SPEED))
                        .with_loop(looped.unwrap_or(true)),
                );
            }
        }
        Effect::Shoot {
            actor_id,
            offset_x,
            offset_y,
            speed,
            target,
        } => {
            if data.actor(actor_id).is_none() {
                warn!("SHOOT: unknown actor '{}'", actor_id);
                return Flow::Continue;
            }
            let speed = speed.unwrap_or(DEFAULT_SHOT_SPEED);
            for shooter in resolve(world, rule, task, target) {
                shoot(world, shooter, actor_id, Vec2::new(*offset_x, *offset_y), speed);
            }
        }
        Effect::Hold {
            holder,
            target,
            offset_x,
            offset_y,
        } => {
            let holders = resolve(world, rule, task, holder.as_ref().unwrap_or(&Target::Subject));
            let Some(&carrier) = holders.first() else {
                return Flow::Continue;
            };
            let offset = Vec2::new(*offset_x, *offset_y);
            for entity in resolve(world, rule, task, target.as_ref().unwrap_or(&Target::Object)) {
                if entity == carrier || world.get::<HeldBy>(entity).is_some() {
                    continue;
                }
                world
                    .entity_mut(entity)
                    .insert(HeldBy::new(carrier).with_offset(offset));
            }
        }
        Effect::Drop { target } => {
            let mut dropped = match target {
                Some(target) => resolve(world, rule, task, target),
                None => resolve(world, rule, task, &Target::Object),
            };
            if target.is_none() && dropped.is_empty() {
                if let Some(subject) = task.subject {
                    dropped = carried_by(world, subject);
                }
            }
            for entity in dropped {
                world.entity_mut(entity).remove::<HeldBy>();
            }
        }
        Effect::Particles {
            kind,
            count,
            target,
        } => {
            let count = count.unwrap_or(DEFAULT_PARTICLE_COUNT);
            for entity in resolve(world, rule, task, target) {
                let Some(center) = center_of(world, entity) else {
                    continue;
                };
                let particles: Vec<Particle> = {
                    let mut rng = world.resource_mut::<SessionRng>();
                    (0..count)
                        .map(|_| Particle::emit(*kind, center, &mut rng.0))
                        .collect()
                };
                world.spawn_batch(particles);
            }
        }
        Effect::PlayMusic { music_id } => match data.music_track(music_id) {
            Some(track) => send_audio_cmd(
                world,
                AudioCmd::PlayMusic {
                    track: track.clone(),
                },
            ),
            None => warn!("PLAY_MUSIC: unknown track '{}'", music_id),
        },
        Effect::Block => {}
    }
    Flow::Continue
}

/// Live instances of `actor_id`, in spawn order.
pub fn instances_of(world: &mut World, actor_id: &str) -> Targets {
    let mut query = world.query::<(Entity, &LevelObject)>();
    let mut found: Targets = query
        .iter(world)
        .filter(|(_, object)| object.actor_id == actor_id)
        .map(|(entity, _)| entity)
        .collect();
    found.sort();
    found
}

fn resolve(world: &mut World, rule: &Rule, task: &RuleTask, target: &Target) -> Targets {
    match target {
        Target::Subject => bound_or_broadcast(world, task.subject, rule.subject_id.as_deref()),
        Target::Object => bound_or_broadcast(world, task.object, rule.object_id.as_deref()),
        Target::Actor(actor_id) => instances_of(world, actor_id),
    }
}

/// The bound instance if it still lives; with no binding, every instance of
/// the rule's actor type.
fn bound_or_broadcast(world: &mut World, bound: Option<Entity>, actor_id: Option<&str>) -> Targets {
    match bound {
        Some(entity) if world.get::<LevelObject>(entity).is_some() => smallvec![entity],
        Some(_) => Targets::new(),
        None => actor_id
            .map(|actor_id| instances_of(world, actor_id))
            .unwrap_or_default(),
    }
}

fn destroy(world: &mut World, data: &GameData, bound: Option<Entity>) {
    let Some(entity) = bound else {
        return;
    };
    let Some(object) = world.get::<LevelObject>(entity) else {
        return;
    };
    let was_player = data.player_actor_id() == Some(object.actor_id.as_str());
    world.despawn(entity);
    if was_player {
        info!("Player instance destroyed");
        request_status(world, SessionStatus::Lost);
    }
}

/// Scaled box size of a level object.
fn size_of(world: &World, entity: Entity) -> Vec2 {
    let scale = world.get::<Scale>(entity).map_or(1.0, |s| s.scale);
    world
        .get::<BoxCollider>(entity)
        .map_or(Vec2::ZERO, |c| c.scaled_size(scale))
}

fn center_of(world: &World, entity: Entity) -> Option<Vec2> {
    let position = world.get::<MapPosition>(entity)?;
    Some(position.center(size_of(world, entity)))
}

/// Move an object by `offset`, keeping it on the stage.
fn displace(world: &mut World, entity: Entity, offset: Vec2) {
    let max = (world.resource::<GameConfig>().stage_size() - size_of(world, entity)).max(Vec2::ZERO);
    if let Some(mut position) = world.get_mut::<MapPosition>(entity) {
        position.pos = (position.pos + offset).clamp(Vec2::ZERO, max);
    }
}

fn chase_step(world: &mut World, chaser: Entity, goals: &[Entity]) {
    let Some(from) = center_of(world, chaser) else {
        return;
    };
    let nearest = goals
        .iter()
        .filter(|&&goal| goal != chaser)
        .filter_map(|&goal| center_of(world, goal))
        .min_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)));
    let Some(to) = nearest else {
        return;
    };
    let gap = to - from;
    let distance = gap.length();
    if distance <= CHASE_MIN_DISTANCE {
        return;
    }
    if let Some(mut position) = world.get_mut::<MapPosition>(chaser) {
        position.pos += gap / distance * CHASE_STEP.min(distance);
    }
}

/// Spawn one projectile from `shooter`, aimed at the nearest object that is
/// not itself a projectile, or straight down when there is none.
fn shoot(world: &mut World, shooter: Entity, actor_id: &str, muzzle: Vec2, speed: f32) {
    let Some(position) = world.get::<MapPosition>(shooter).copied() else {
        return;
    };
    let origin = position.pos + muzzle;
    let actor_size = world.resource::<GameConfig>().actor_size();
    let shot_center = origin + Vec2::splat(actor_size * 0.5);

    let mut query = world.query_filtered::<Entity, (With<LevelObject>, Without<Projectile>)>();
    let candidates: Targets = query.iter(world).filter(|&e| e != shooter).collect();
    let aim = candidates
        .into_iter()
        .filter_map(|e| center_of(world, e))
        .min_by(|a, b| shot_center.distance(*a).total_cmp(&shot_center.distance(*b)))
        .map(|target| target - shot_center)
        .and_then(|gap| gap.try_normalize())
        .unwrap_or(Vec2::Y);

    let mut object = LevelObjectData::new(format!("{}-shot", actor_id), actor_id, origin.x, origin.y);
    object.ephemeral = true;
    object.vx = aim.x * speed;
    object.vy = aim.y * speed;
    let projectile = spawn_object(world, &object, actor_size);
    world
        .entity_mut(projectile)
        .insert((Projectile, Ttl::new(PROJECTILE_LIFETIME)));
}

fn carried_by(world: &mut World, holder: Entity) -> Targets {
    let mut query = world.query::<(Entity, &HeldBy)>();
    query
        .iter(world)
        .filter(|(_, held)| held.holder == holder)
        .map(|(entity, _)| entity)
        .collect()
}
