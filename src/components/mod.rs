//! ECS components for level objects and transient visuals.
//!
//! A live LevelObject instance is an entity carrying at least
//! [`levelobject::LevelObject`], [`mapposition::MapPosition`],
//! [`rigidbody::RigidBody`], [`scale::Scale`] and
//! [`boxcollider::BoxCollider`]. The remaining components are attached and
//! removed by effects and the physics loop.
//!
//! Submodules overview:
//! - [`animation`] – PLAY_ANIM override of the displayed actor
//! - [`boxcollider`] – axis-aligned box sized by base size × scale
//! - [`held`] – held relation to a carrier instance
//! - [`hud`] – variable readout attached to an object
//! - [`levelobject`] – authored identity, lock, ephemeral and projectile markers
//! - [`mapposition`] – stage position and jump height
//! - [`particle`] – transient particles and their motion profiles
//! - [`path`] – waypoint path attached by MOVE
//! - [`rigidbody`] – velocity in px/frame
//! - [`scale`] – uniform scale factor
//! - [`speech`] – SAY speech bubbles
//! - [`ttl`] – countdown despawn for projectiles

pub mod animation;
pub mod boxcollider;
pub mod held;
pub mod hud;
pub mod levelobject;
pub mod mapposition;
pub mod particle;
pub mod path;
pub mod rigidbody;
pub mod scale;
pub mod speech;
pub mod ttl;
