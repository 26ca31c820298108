//! Session status resources.
//!
//! [`GameState`] holds the authoritative status, [`NextGameState`] a pending
//! request. See `crate::events::gamestate::observe_gamestate_change_event`
//! for how a request is applied.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

/// Lifecycle of a play session.
///
/// LOADING → READY → PLAYING → {WON, LOST, TRANSITION}; TRANSITION returns
/// to PLAYING once the next scene has been reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    #[default]
    Loading,
    Ready,
    Playing,
    Won,
    Lost,
    Transition,
}

/// Representation of a requested next status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(SessionStatus),
}

/// Authoritative current status.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: SessionStatus,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self) -> SessionStatus {
        self.current
    }
    /// Update the current status immediately, bypassing the change observer.
    pub fn set(&mut self, status: SessionStatus) {
        self.current = status;
    }
    pub fn is_playing(&self) -> bool {
        self.current == SessionStatus::Playing
    }
}

/// Intent to change to a new status.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &NextGameStates {
        &self.next
    }

    /// Request a transition to `next`.
    ///
    /// The system `check_pending_state` will emit the change event.
    pub fn set(&mut self, next: SessionStatus) {
        self.next = NextGameStates::Pending(next);
    }

    pub fn reset(&mut self) {
        self.next = NextGameStates::Unchanged;
    }
}

/// The one scene currently instantiated in the world.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveScene {
    pub index: usize,
    pub id: String,
}
