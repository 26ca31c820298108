//! Engine tick integration tests for movement, paths, held objects, TTL,
//! particles and contact detection.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec2;

use playkit::components::animation::ActiveAnimation;
use playkit::components::boxcollider::BoxCollider;
use playkit::components::held::HeldBy;
use playkit::components::levelobject::LevelObject;
use playkit::components::mapposition::MapPosition;
use playkit::components::particle::Particle;
use playkit::components::path::ActivePath;
use playkit::components::rigidbody::RigidBody;
use playkit::components::scale::Scale;
use playkit::components::speech::SpeechBubble;
use playkit::components::ttl::Ttl;
use playkit::events::collision::observe_collision_edges;
use playkit::gamedata::ParticleKind;
use playkit::resources::gameconfig::GameConfig;
use playkit::resources::shake::ScreenShake;
use playkit::resources::touching::TouchingPairs;
use playkit::resources::triggers::{PendingTriggers, TriggerEvent};
use playkit::resources::worldtime::WorldTime;
use playkit::systems::animation::finish_animations;
use playkit::systems::collision::collision_detector;
use playkit::systems::held::held_system;
use playkit::systems::movement::{GRAVITY, movement};
use playkit::systems::particles::particle_system;
use playkit::systems::path::path_system;
use playkit::systems::speech::{decay_screen_shake, expire_speech_bubbles};
use playkit::systems::time::update_world_time;
use playkit::systems::ttl::ttl_system;

const EPSILON: f32 = 1e-4;
const FRAME: f32 = 1.0 / 60.0;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(GameConfig::new());
    world.insert_resource(TouchingPairs::default());
    world.insert_resource(PendingTriggers::default());
    world.insert_resource(ScreenShake::default());
    world
}

fn advance(world: &mut World, schedule: &mut Schedule) {
    update_world_time(world, FRAME);
    schedule.run(world);
}

fn tick_movement(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(movement);
    advance(world, &mut schedule);
}

fn tick_path(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(path_system);
    advance(world, &mut schedule);
}

fn tick_held(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(held_system);
    advance(world, &mut schedule);
}

fn tick_ttl(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(ttl_system);
    advance(world, &mut schedule);
}

fn tick_particles(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(particle_system);
    advance(world, &mut schedule);
}

fn tick_visual_timers(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems((finish_animations, expire_speech_bubbles, decay_screen_shake));
    advance(world, &mut schedule);
}

fn tick_collision_detector(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(collision_detector);
    advance(world, &mut schedule);
}

fn spawn_box(world: &mut World, id: &str, x: f32, y: f32) -> Entity {
    world
        .spawn((
            LevelObject::new(id, id),
            MapPosition::new(x, y),
            RigidBody::default(),
            Scale::default(),
            BoxCollider::new(64.0, 64.0),
        ))
        .id()
}

// ==================== MOVEMENT ====================

#[test]
fn movement_integrates_velocity_per_frame() {
    let mut world = make_world();
    let e = world
        .spawn((MapPosition::new(10.0, 10.0), RigidBody::new(2.0, 3.0)))
        .id();
    tick_movement(&mut world);
    let pos = world.get::<MapPosition>(e).unwrap().pos;
    assert!(approx_vec(pos, Vec2::new(12.0, 13.0)), "got {:?}", pos);
}

#[test]
fn jump_rises_then_lands_under_gravity() {
    let mut world = make_world();
    let e = world
        .spawn((MapPosition::new(100.0, 100.0), RigidBody::default().with_vz(12.0)))
        .id();
    tick_movement(&mut world);
    let pos = world.get::<MapPosition>(e).unwrap();
    let body = world.get::<RigidBody>(e).unwrap();
    assert!(approx_eq(pos.z, 12.0));
    assert!(approx_eq(body.vz, 12.0 - GRAVITY));

    for _ in 0..60 {
        tick_movement(&mut world);
    }
    let pos = world.get::<MapPosition>(e).unwrap();
    let body = world.get::<RigidBody>(e).unwrap();
    assert_eq!(pos.z, 0.0);
    assert_eq!(body.vz, 0.0);
    assert!(approx_vec(pos.pos, Vec2::new(100.0, 100.0)));
}

#[test]
fn movement_leaves_held_objects_alone() {
    let mut world = make_world();
    let carrier = world.spawn(MapPosition::new(0.0, 0.0)).id();
    let e = world
        .spawn((
            MapPosition::new(10.0, 10.0),
            RigidBody::new(5.0, 0.0),
            HeldBy::new(carrier),
        ))
        .id();
    tick_movement(&mut world);
    assert_eq!(world.get::<MapPosition>(e).unwrap().pos, Vec2::new(10.0, 10.0));
}

#[test]
fn objects_far_off_stage_are_culled() {
    let mut world = make_world();
    let gone = world
        .spawn((MapPosition::new(900.0, 0.0), RigidBody::new(1.0, 0.0)))
        .id();
    let stays = world
        .spawn((MapPosition::new(790.0, 0.0), RigidBody::new(1.0, 0.0)))
        .id();
    tick_movement(&mut world);
    assert!(world.get_entity(gone).is_err());
    assert!(world.get_entity(stays).is_ok());
}

// ==================== PATHS ====================

#[test]
fn path_walks_waypoints_and_detaches_when_done() {
    let mut world = make_world();
    let e = world
        .spawn((
            MapPosition::new(0.0, 0.0),
            ActivePath::new(vec![Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]).with_loop(false),
        ))
        .id();
    tick_path(&mut world);
    assert!(approx_vec(
        world.get::<MapPosition>(e).unwrap().pos,
        Vec2::new(2.0, 0.0)
    ));

    for _ in 0..20 {
        tick_path(&mut world);
    }
    assert!(world.get::<ActivePath>(e).is_none());
    assert!(approx_vec(
        world.get::<MapPosition>(e).unwrap().pos,
        Vec2::new(10.0, 10.0)
    ));
}

#[test]
fn looping_path_keeps_going() {
    let mut world = make_world();
    let e = world
        .spawn((
            MapPosition::new(0.0, 0.0),
            ActivePath::new(vec![Vec2::new(4.0, 0.0), Vec2::new(0.0, 0.0)]),
        ))
        .id();
    for _ in 0..10 {
        tick_path(&mut world);
    }
    assert!(world.get::<ActivePath>(e).is_some());
}

// ==================== HELD ====================

#[test]
fn held_object_snaps_to_carrier_with_offset() {
    let mut world = make_world();
    let carrier = world.spawn(MapPosition::new(50.0, 50.0).with_z(5.0)).id();
    let e = world
        .spawn((
            MapPosition::new(0.0, 0.0),
            HeldBy::new(carrier).with_offset(Vec2::new(5.0, -5.0)),
        ))
        .id();
    tick_held(&mut world);
    let pos = world.get::<MapPosition>(e).unwrap();
    assert_eq!(pos.pos, Vec2::new(55.0, 45.0));
    assert_eq!(pos.z, 5.0);
}

#[test]
fn held_relation_cleared_when_carrier_despawns() {
    let mut world = make_world();
    let carrier = world.spawn(MapPosition::new(50.0, 50.0)).id();
    let e = world
        .spawn((MapPosition::new(0.0, 0.0), HeldBy::new(carrier)))
        .id();
    tick_held(&mut world);
    world.despawn(carrier);
    tick_held(&mut world);
    assert!(world.get::<HeldBy>(e).is_none());
    assert_eq!(world.get::<MapPosition>(e).unwrap().pos, Vec2::new(50.0, 50.0));
}

// ==================== TTL / PARTICLES ====================

#[test]
fn ttl_despawns_when_expired() {
    let mut world = make_world();
    let e = world.spawn(Ttl::new(0.02)).id();
    tick_ttl(&mut world);
    assert!(world.get_entity(e).is_ok());
    tick_ttl(&mut world);
    assert!(world.get_entity(e).is_err());
}

#[test]
fn confetti_falls_and_expires() {
    let mut world = make_world();
    let e = world
        .spawn(Particle {
            kind: ParticleKind::Confetti,
            pos: Vec2::new(100.0, 100.0),
            velocity: Vec2::ZERO,
            life: 0.05,
            max_life: 0.05,
            size: 4.0,
            color: "#ffffff",
            phase: 0.0,
        })
        .id();
    tick_particles(&mut world);
    let particle = world.get::<Particle>(e).unwrap();
    assert!(particle.velocity.y > 0.0);
    assert!(particle.pos.y > 100.0);

    for _ in 0..3 {
        tick_particles(&mut world);
    }
    assert!(world.get_entity(e).is_err());
}

#[test]
fn emitted_particles_stay_within_profile() {
    let mut rng = fastrand::Rng::with_seed(3);
    for kind in [
        ParticleKind::Confetti,
        ParticleKind::Explosion,
        ParticleKind::Smoke,
        ParticleKind::Rain,
    ] {
        let profile = kind.profile();
        for _ in 0..20 {
            let p = Particle::emit(kind, Vec2::new(50.0, 50.0), &mut rng);
            assert!(p.life >= profile.life.0 && p.life <= profile.life.1);
            assert!(p.size >= profile.size.0 && p.size <= profile.size.1);
            assert!(profile.palette.contains(&p.color));
        }
    }
}

// ==================== VISUAL TIMERS ====================

#[test]
fn one_shot_animation_and_bubble_expire() {
    let mut world = make_world();
    let e = world
        .spawn((
            ActiveAnimation::new("hero-wave", 2, 0.0),
            SpeechBubble::new("hi", 0.0),
        ))
        .id();
    let looping = world
        .spawn(ActiveAnimation::new("hero-walk", 2, 0.0).with_loop(true))
        .id();

    for _ in 0..15 {
        tick_visual_timers(&mut world);
    }
    assert!(world.get::<ActiveAnimation>(e).is_none());
    assert!(world.get::<ActiveAnimation>(looping).is_some());

    tick_visual_timers(&mut world);
    assert!(world.get::<SpeechBubble>(e).is_some());
    world.resource_mut::<WorldTime>().elapsed = 2.5;
    tick_visual_timers(&mut world);
    assert!(world.get::<SpeechBubble>(e).is_none());
}

#[test]
fn screen_shake_decays_to_zero() {
    let mut world = make_world();
    world.resource_mut::<ScreenShake>().start(10.0, 0.0);
    for _ in 0..40 {
        tick_visual_timers(&mut world);
    }
    assert_eq!(world.resource::<ScreenShake>().intensity, 0.0);
}

// ==================== COLLISION ====================

fn drain(world: &mut World) -> Vec<TriggerEvent> {
    let mut pending = world.resource_mut::<PendingTriggers>();
    std::iter::from_fn(|| pending.pop()).collect()
}

#[test]
fn contact_edges_fire_once_with_hysteresis() {
    let mut world = make_world();
    world.spawn(Observer::new(observe_collision_edges));
    world.flush();

    let a = spawn_box(&mut world, "a", 0.0, 0.0);
    let b = spawn_box(&mut world, "b", 60.0, 0.0);

    tick_collision_detector(&mut world);
    let events = drain(&mut world);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], TriggerEvent::Contact { .. }));

    tick_collision_detector(&mut world);
    assert!(drain(&mut world).is_empty());

    // Just apart, but within the separation margin: still touching.
    world.get_mut::<MapPosition>(b).unwrap().pos.x = 66.0;
    tick_collision_detector(&mut world);
    assert!(drain(&mut world).is_empty());

    world.get_mut::<MapPosition>(b).unwrap().pos.x = 100.0;
    tick_collision_detector(&mut world);
    let events = drain(&mut world);
    assert_eq!(events.len(), 1);
    match events[0] {
        TriggerEvent::Separation { a: x, b: y } => {
            assert!((x == a && y == b) || (x == b && y == a));
        }
        ref other => panic!("expected separation, got {:?}", other),
    }
    assert!(world.resource::<TouchingPairs>().is_empty());
}

#[test]
fn despawned_objects_leave_touching_pairs() {
    let mut world = make_world();
    world.spawn(Observer::new(observe_collision_edges));
    world.flush();

    spawn_box(&mut world, "a", 0.0, 0.0);
    let b = spawn_box(&mut world, "b", 10.0, 0.0);
    tick_collision_detector(&mut world);
    assert_eq!(world.resource::<TouchingPairs>().len(), 1);

    world.despawn(b);
    tick_collision_detector(&mut world);
    assert!(world.resource::<TouchingPairs>().is_empty());
}
