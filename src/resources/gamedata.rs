use std::sync::Arc;

use bevy_ecs::prelude::Resource;

use crate::gamedata::GameData;

/// Read-only game data shared with every system.
///
/// Wrapped in an [`Arc`] so exclusive systems can hold the rules while they
/// mutate the world.
#[derive(Resource, Clone, Debug)]
pub struct GameDataRes(pub Arc<GameData>);

impl GameDataRes {
    pub fn new(data: GameData) -> Self {
        Self(Arc::new(data))
    }

    pub fn shared(&self) -> Arc<GameData> {
        Arc::clone(&self.0)
    }
}

impl std::ops::Deref for GameDataRes {
    type Target = GameData;

    fn deref(&self) -> &GameData {
        &self.0
    }
}
