use crate::events::gamestate::GameStateChangedEvent;
use crate::resources::gamestate::{GameState, NextGameState, NextGameStates, SessionStatus};
use bevy_ecs::prelude::*;

pub fn check_pending_state(mut commands: Commands, next_state: Res<NextGameState>) {
    // Check if there is a pending state change
    if let NextGameStates::Pending(_new_state) = next_state.get() {
        // If there is, trigger the GameStateChangedEvent
        commands.trigger(GameStateChangedEvent {});
    }
}

pub fn state_is_playing(state: Res<GameState>) -> bool {
    state.is_playing()
}

/// Request `status` and apply it immediately.
///
/// Used from exclusive code (effects, scene resets, the host API) where the
/// change has to be visible to the very next statement.
pub fn request_status(world: &mut World, status: SessionStatus) {
    world.resource_mut::<NextGameState>().set(status);
    world.trigger(GameStateChangedEvent {});
}
