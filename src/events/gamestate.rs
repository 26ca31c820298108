//! Session status transition event and observer.
//!
//! Status changes are requested through [`NextGameState`]. Emitting a
//! [`GameStateChangedEvent`] then triggers the observer in this module,
//! which applies the request to [`GameState`].
use crate::resources::gamestate::NextGameStates::{Pending, Unchanged};
use crate::resources::gamestate::{GameState, NextGameState, SessionStatus};
use crate::resources::rulestate::RuleTimers;
use crate::resources::triggers::PendingTriggers;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

/// Event used to indicate that a pending status transition should be applied.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Observer that applies a pending status transition.
///
/// Leaving PLAYING drops queued triggers; they belong to a scene that no
/// longer accepts input. Entering PLAYING re-arms the rule timers so every
/// interval is measured from the moment play begins.
pub fn observe_gamestate_change_event(
    _trigger: On<GameStateChangedEvent>,
    mut next_game_state: Option<ResMut<NextGameState>>,
    mut game_state: Option<ResMut<GameState>>,
    mut pending: ResMut<PendingTriggers>,
    mut timers: ResMut<RuleTimers>,
) {
    debug!("GameStateChangedEvent triggered");

    let (Some(next_game_state), Some(game_state)) =
        (next_game_state.as_deref_mut(), game_state.as_deref_mut())
    else {
        warn!(
            "One or more resources missing in observe_gamestate_change_event. next_state: {:?}, game_state: {:?}",
            next_game_state.is_some(),
            game_state.is_some()
        );
        return;
    };

    match *next_game_state.get() {
        Pending(new_state) => {
            let old_state = game_state.get();
            next_game_state.reset();
            if old_state == new_state {
                return;
            }
            info!("Transitioning from {:?} to {:?}", old_state, new_state);
            game_state.set(new_state);
            if old_state == SessionStatus::Playing {
                pending.clear();
            }
            if new_state == SessionStatus::Playing {
                timers.clear();
            }
        }
        Unchanged => {
            debug!("No state change pending.");
        }
    }
}
