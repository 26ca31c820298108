//! Rule dispatch.
//!
//! [`dispatch_rules`] runs once per frame while PLAYING. It fires due TIMER
//! rules, then drains [`PendingTriggers`] (start, keys, clicks, contact
//! edges, variable changes) and binds every matching rule to its subject and
//! object instances. A binding only fires when its guard is free and the
//! chance roll passes; it then becomes a [`RuleTask`] that starts running
//! immediately.

use bevy_ecs::prelude::*;
use log::{debug, warn};
use smallvec::{SmallVec, smallvec};

use crate::components::levelobject::LevelObject;
use crate::components::rigidbody::RigidBody;
use crate::events::audio::AudioCmd;
use crate::gamedata::{GameData, Rule, Trigger};
use crate::resources::audio::send_audio_cmd;
use crate::resources::gamedata::GameDataRes;
use crate::resources::gamestate::{ActiveScene, GameState};
use crate::resources::rng::SessionRng;
use crate::resources::rulestate::{GuardKey, RuleGuards, RuleTimers, VAR_CHECK_COOLDOWN};
use crate::resources::tasks::{RuleTask, RuleTasks};
use crate::resources::triggers::{PendingTriggers, TriggerEvent};
use crate::resources::variables::RuntimeVariables;
use crate::resources::worldtime::WorldTime;
use crate::systems::effects::{instances_of, run_task};

/// Upper bound on triggers handled in one frame.
pub const MAX_TRIGGERS_PER_FRAME: usize = 256;

type Bindings = SmallVec<[(Option<Entity>, Option<Entity>); 8]>;

/// Canonical name of a key: arrows and their WASD aliases map to
/// `up`/`down`/`left`/`right`, everything else is lowercased.
pub fn normalize_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    let canonical = match lower.as_str() {
        "arrowup" | "up" | "w" => "up",
        "arrowdown" | "down" | "s" => "down",
        "arrowleft" | "left" | "a" => "left",
        "arrowright" | "right" | "d" => "right",
        " " | "space" | "spacebar" => "space",
        _ => return lower,
    };
    canonical.to_string()
}

/// Whether a uniform draw falls at or below `chance`.
pub fn passes_chance(rng: &mut fastrand::Rng, chance: f32) -> bool {
    if chance >= 1.0 {
        return true;
    }
    chance > 0.0 && rng.f32() <= chance
}

pub fn dispatch_rules(world: &mut World) {
    if !world.resource::<GameState>().is_playing() {
        world.resource_mut::<PendingTriggers>().clear();
        return;
    }
    let data = world.resource::<GameDataRes>().shared();
    let scene_id = world.resource::<ActiveScene>().id.clone();

    fire_due_timers(world, &data, &scene_id);

    let mut handled = 0;
    loop {
        let next = world.resource_mut::<PendingTriggers>().pop();
        let Some(event) = next else {
            break;
        };
        if !world.resource::<GameState>().is_playing() {
            world.resource_mut::<PendingTriggers>().clear();
            break;
        }
        handled += 1;
        if handled > MAX_TRIGGERS_PER_FRAME {
            warn!("Trigger budget exhausted, dropping the rest of this frame's triggers");
            world.resource_mut::<PendingTriggers>().clear();
            break;
        }
        handle_trigger(world, &data, &scene_id, event);
    }
}

fn scoped<'a>(data: &'a GameData, scene_id: &'a str) -> impl Iterator<Item = (usize, &'a Rule)> {
    data.rules
        .iter()
        .enumerate()
        .filter(move |(_, rule)| rule.scope.applies_to(scene_id))
}

fn fire_due_timers(world: &mut World, data: &GameData, scene_id: &str) {
    let now = world.resource::<WorldTime>().elapsed;
    for (index, rule) in scoped(data, scene_id) {
        let Trigger::Timer { interval_ms } = rule.trigger else {
            continue;
        };
        let interval = interval_ms as f32 / 1000.0;
        if world
            .resource_mut::<RuleTimers>()
            .poll(&rule.id, interval, now)
        {
            for (subject, object) in bind_subjects(world, rule) {
                fire(world, data, index, subject, object);
            }
        }
    }
}

fn handle_trigger(world: &mut World, data: &GameData, scene_id: &str, event: TriggerEvent) {
    match event {
        TriggerEvent::Start => {
            for (index, rule) in scoped(data, scene_id) {
                if rule.trigger == Trigger::Start {
                    for (subject, object) in bind_subjects(world, rule) {
                        fire(world, data, index, subject, object);
                    }
                }
            }
        }
        TriggerEvent::Key(key) => {
            let pressed = normalize_key(&key);
            for (index, rule) in scoped(data, scene_id) {
                let Trigger::KeyPress { key } = &rule.trigger else {
                    continue;
                };
                if (normalize_key(key) == pressed) == rule.invert {
                    continue;
                }
                for (subject, object) in bind_subjects(world, rule) {
                    fire(world, data, index, subject, object);
                }
            }
        }
        TriggerEvent::Click(entity) => {
            let Some(clicked) = actor_of(world, entity) else {
                return;
            };
            for (index, rule) in scoped(data, scene_id) {
                if rule.trigger != Trigger::Click {
                    continue;
                }
                if !rule.invert {
                    if rule.subject_id.as_deref().is_none_or(|s| s == clicked) {
                        fire(world, data, index, Some(entity), None);
                    }
                } else if let Some(subject_actor) = rule.subject_id.as_deref() {
                    // Broadcast on miss: every instance of the subject type.
                    if subject_actor != clicked {
                        for instance in instances_of(world, subject_actor) {
                            fire(world, data, index, Some(instance), None);
                        }
                    }
                }
            }
        }
        TriggerEvent::Contact { a, b } => contact_edge(world, data, scene_id, a, b, false),
        TriggerEvent::Separation { a, b } => contact_edge(world, data, scene_id, a, b, true),
        TriggerEvent::VariableChanged => {
            let player = data
                .player_actor_id()
                .and_then(|actor| instances_of(world, actor).first().copied());
            for (index, rule) in scoped(data, scene_id) {
                let Trigger::VarCheck {
                    variable_id,
                    comparison,
                    value,
                } = &rule.trigger
                else {
                    continue;
                };
                let Some(current) = world.resource::<RuntimeVariables>().get(variable_id) else {
                    continue;
                };
                if comparison.holds(current, *value) == rule.invert {
                    continue;
                }
                fire(world, data, index, player, None);
            }
        }
    }
}

/// Match COLLISION and HIT rules against a contact edge.
///
/// `separated` selects inverted rules, which fire when the pair comes apart.
fn contact_edge(
    world: &mut World,
    data: &GameData,
    scene_id: &str,
    a: Entity,
    b: Entity,
    separated: bool,
) {
    let (Some(actor_a), Some(actor_b)) = (actor_of(world, a), actor_of(world, b)) else {
        return;
    };
    let moving_a = is_moving(world, a);
    let moving_b = is_moving(world, b);

    for (index, rule) in scoped(data, scene_id) {
        if rule.invert != separated {
            continue;
        }
        let candidates: Bindings = [(a, &actor_a, b, &actor_b), (b, &actor_b, a, &actor_a)]
            .into_iter()
            .filter(|(_, subject, _, object)| pair_matches(rule, subject, object))
            .map(|(s, _, o, _)| (Some(s), Some(o)))
            .collect();
        let binding = match rule.trigger {
            Trigger::Collision => candidates.first().copied(),
            Trigger::Hit => {
                if !moving_a && !moving_b {
                    continue;
                }
                // The projectile is the moving party and binds as object.
                let projectile_is_object = |(_, o): &(Option<Entity>, Option<Entity>)| {
                    if *o == Some(a) { moving_a } else { moving_b }
                };
                candidates
                    .iter()
                    .find(|c| projectile_is_object(*c))
                    .or(candidates.first())
                    .copied()
            }
            _ => continue,
        };
        if let Some((subject, object)) = binding {
            fire(world, data, index, subject, object);
        }
    }
}

fn pair_matches(rule: &Rule, subject_actor: &str, object_actor: &str) -> bool {
    rule.subject_id.as_deref().is_none_or(|s| s == subject_actor)
        && rule.object_id.as_deref().is_none_or(|o| o == object_actor)
}

fn actor_of(world: &World, entity: Entity) -> Option<String> {
    world
        .get::<LevelObject>(entity)
        .map(|object| object.actor_id.clone())
}

fn is_moving(world: &World, entity: Entity) -> bool {
    world
        .get::<RigidBody>(entity)
        .is_some_and(|body| body.is_moving())
}

/// One binding per live subject instance, or a single unbound one when the
/// rule names no subject.
fn bind_subjects(world: &mut World, rule: &Rule) -> Bindings {
    match &rule.subject_id {
        Some(actor_id) => instances_of(world, actor_id)
            .into_iter()
            .map(|e| (Some(e), None))
            .collect(),
        None => smallvec![(None, None)],
    }
}

/// Fire rule `index` for one binding, subject to its guard and chance.
pub fn fire(
    world: &mut World,
    data: &GameData,
    index: usize,
    subject: Option<Entity>,
    object: Option<Entity>,
) {
    let Some(rule) = data.rules.get(index) else {
        return;
    };
    let now = world.resource::<WorldTime>().elapsed;
    let guard: GuardKey = (rule.id.clone(), subject);
    if !world.resource::<RuleGuards>().is_free(&guard, now) {
        debug!("Rule '{}' busy for {:?}", rule.id, subject);
        return;
    }
    if !passes_chance(&mut world.resource_mut::<SessionRng>().0, rule.chance) {
        return;
    }
    let Some(epoch) = world
        .resource_mut::<RuleGuards>()
        .acquire(guard.clone(), now)
    else {
        return;
    };
    debug!(
        "Rule '{}' fired (subject {:?}, object {:?})",
        rule.id, subject, object
    );
    if let Some(sound_id) = &rule.sound_id {
        send_audio_cmd(world, AudioCmd::PlaySound { id: sound_id.clone() });
    }

    let task = RuleTask {
        rule_index: index,
        subject,
        object,
        cursor: 0,
        resume_at: now,
        pending_delay: 0.0,
        scene_change: None,
        guard,
        epoch,
        cooldown: rule.is_var_check().then_some(VAR_CHECK_COOLDOWN),
    };
    if let Some(task) = run_task(world, data, task) {
        world.resource_mut::<RuleTasks>().tasks.push(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_share_names() {
        assert_eq!(normalize_key("ArrowUp"), "up");
        assert_eq!(normalize_key("W"), "up");
        assert_eq!(normalize_key("a"), normalize_key("ArrowLeft"));
        assert_eq!(normalize_key(" "), "space");
        assert_eq!(normalize_key("Enter"), "enter");
    }

    #[test]
    fn chance_bounds() {
        let mut rng = fastrand::Rng::with_seed(5);
        assert!((0..100).all(|_| passes_chance(&mut rng, 1.0)));
        assert!((0..100).all(|_| !passes_chance(&mut rng, 0.0)));
        let hits = (0..1000).filter(|_| passes_chance(&mut rng, 0.5)).count();
        assert!(hits > 350 && hits < 650);
    }
}
