//! Engine systems.
//!
//! This module groups all ECS systems that advance the simulation and the
//! rule engine. The per-frame order is set up in [`crate::game`].
//!
//! Submodules overview
//! - [`animation`] – end one-shot PLAY_ANIM overrides
//! - [`audio`] – bridge with the audio thread (poll/update message queues)
//! - [`collision`] – contact edges between level objects and the drag pass
//! - [`effects`] – effect interpreter and resumption of parked rule tasks
//! - [`gamestate`] – check for pending status transitions and trigger events
//! - [`held`] – snap held objects to their carrier
//! - [`movement`] – integrate velocity, jump height and gravity
//! - [`particles`] – move and expire particles
//! - [`path`] – follow MOVE waypoint paths
//! - [`rules`] – match queued triggers and timers against rules
//! - [`speech`] – expire speech bubbles, decay screen shake
//! - [`time`] – update simulation time and delta
//! - [`ttl`] – despawn projectiles whose lifetime ran out

pub mod animation;
pub mod audio;
pub mod collision;
pub mod effects;
pub mod gamestate;
pub mod held;
pub mod movement;
pub mod particles;
pub mod path;
pub mod rules;
pub mod speech;
pub mod time;
pub mod ttl;
