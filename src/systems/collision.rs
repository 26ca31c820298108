//! Contact detection between level objects.
//!
//! [`collision_detector`] runs once per frame and keeps
//! [`TouchingPairs`] up to date: a pair enters on strict overlap and only
//! exits once the boxes are apart by more than [`SEPARATION_MARGIN`], so an
//! object resting on a boundary does not flicker in and out of contact. Each
//! transition triggers a [`CollisionEvent`].
//!
//! [`drag_object`] is a separate pass used only while the player drags an
//! object: it consults COLLISION rules up front to veto or push before the
//! move is committed.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;
use smallvec::SmallVec;

use crate::components::boxcollider::BoxCollider;
use crate::components::levelobject::{LevelObject, Locked};
use crate::components::mapposition::MapPosition;
use crate::components::scale::Scale;
use crate::events::collision::{CollisionEvent, ContactPhase};
use crate::gamedata::{Effect, Trigger};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamedata::GameDataRes;
use crate::resources::gamestate::ActiveScene;
use crate::resources::touching::TouchingPairs;

/// Growth of each box, in pixels, when testing whether a pair separated.
pub const SEPARATION_MARGIN: f32 = 4.0;

pub fn collision_detector(
    mut commands: Commands,
    query: Query<(Entity, &MapPosition, &BoxCollider, &Scale), With<LevelObject>>,
    mut touching: ResMut<TouchingPairs>,
) {
    touching.retain_alive(|e| query.contains(e));

    for [(a, pos_a, box_a, scale_a), (b, pos_b, box_b, scale_b)] in query.iter_combinations() {
        let was_touching = touching.contains(a, b);
        if !was_touching {
            if box_a.overlaps(pos_a.pos, scale_a.scale, box_b, pos_b.pos, scale_b.scale) {
                touching.insert(a, b);
                commands.trigger(CollisionEvent {
                    a,
                    b,
                    phase: ContactPhase::Enter,
                });
            }
        } else if !box_a.overlaps_with_margin(
            pos_a.pos,
            scale_a.scale,
            box_b,
            pos_b.pos,
            scale_b.scale,
            SEPARATION_MARGIN,
        ) {
            touching.remove(a, b);
            commands.trigger(CollisionEvent {
                a,
                b,
                phase: ContactPhase::Exit,
            });
        }
    }
}

/// Move `entity` to `target` on behalf of the player.
///
/// Locked objects never move. For every object the dragged one would overlap
/// at `target`, non-inverted COLLISION rules with the dragged actor as
/// subject and the other actor as object are consulted: a BLOCK effect
/// vetoes the whole move, a PUSH effect shoves the other object by the drag
/// delta, clamped to the stage. Returns whether the move was committed.
pub fn drag_object(world: &mut World, entity: Entity, target: Vec2) -> bool {
    if world.get::<Locked>(entity).is_some() {
        return false;
    }
    let Some(dragged) = world.get::<LevelObject>(entity).cloned() else {
        return false;
    };
    let (Some(position), Some(collider)) = (
        world.get::<MapPosition>(entity).copied(),
        world.get::<BoxCollider>(entity).copied(),
    ) else {
        return false;
    };
    let scale = world.get::<Scale>(entity).map_or(1.0, |s| s.scale);
    let delta = target - position.pos;

    let mut hits: SmallVec<[(Entity, String, Vec2, BoxCollider, f32); 4]> = SmallVec::new();
    let mut query = world.query::<(Entity, &LevelObject, &MapPosition, &BoxCollider, &Scale)>();
    for (other, object, other_pos, other_box, other_scale) in query.iter(world) {
        if other == entity {
            continue;
        }
        if collider.overlaps(target, scale, other_box, other_pos.pos, other_scale.scale) {
            hits.push((
                other,
                object.actor_id.clone(),
                other_pos.pos,
                *other_box,
                other_scale.scale,
            ));
        }
    }

    let data = world.resource::<GameDataRes>().shared();
    let scene_id = world.resource::<ActiveScene>().id.clone();
    let stage = world.resource::<GameConfig>().stage_size();

    let mut pushes: SmallVec<[(Entity, Vec2); 4]> = SmallVec::new();
    for (other, other_actor, other_pos, other_box, other_scale) in &hits {
        for rule in data.rules_in_scope(&scene_id) {
            if rule.trigger != Trigger::Collision
                || rule.invert
                || rule.subject_id.as_deref() != Some(dragged.actor_id.as_str())
                || rule.object_id.as_deref() != Some(other_actor.as_str())
            {
                continue;
            }
            if rule.has_effect(|e| matches!(e, Effect::Block)) {
                debug!("Drag of {:?} blocked by rule '{}'", entity, rule.id);
                return false;
            }
            if rule.has_effect(|e| matches!(e, Effect::Push { .. })) {
                let size = other_box.scaled_size(*other_scale);
                let max = (stage - size).max(Vec2::ZERO);
                pushes.push((*other, (*other_pos + delta).clamp(Vec2::ZERO, max)));
            }
        }
    }

    for (other, pos) in pushes {
        if let Some(mut other_pos) = world.get_mut::<MapPosition>(other) {
            other_pos.pos = pos;
        }
    }
    if let Some(mut pos) = world.get_mut::<MapPosition>(entity) {
        pos.pos = target;
    }
    true
}
