//! ECS resources made available to systems.
//!
//! Session-wide state lives here; per-object state lives in
//! [`crate::components`].
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread
//! - `gameconfig` – stage, session and audio settings loaded from INI
//! - `gamedata` – shared read-only authored data
//! - `gamestate` – session status, pending transitions and the active scene
//! - `rng` – seeded random source
//! - `rulestate` – re-entrancy guards and timer bookkeeping for rules
//! - `shake` – decaying screen-shake intensity
//! - `tasks` – suspended rule executions
//! - `touching` – object pairs currently in contact
//! - `triggers` – queued events waiting for rule dispatch
//! - `variables` – runtime variable values
//! - `worldtime` – session clock and frame delta
pub mod audio;
pub mod gameconfig;
pub mod gamedata;
pub mod gamestate;
pub mod rng;
pub mod rulestate;
pub mod shake;
pub mod tasks;
pub mod touching;
pub mod triggers;
pub mod variables;
pub mod worldtime;
