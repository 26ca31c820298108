//! playkit library.
//!
//! The play-mode runtime of a small 2D game maker: a trigger/effect rule
//! engine, a per-frame physics and collision loop, and an audio step
//! sequencer, all driven through [`Session`].
//!
//! The ECS components, resources, systems and events are public for use in
//! integration tests and by hosts that want finer control than [`Session`].

pub mod audio;
pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod gamedata;
pub mod resources;
pub mod snapshot;
pub mod systems;

pub use error::PlaykitError;
pub use game::Session;
pub use gamedata::GameData;
pub use resources::gameconfig::GameConfig;
pub use resources::gamestate::SessionStatus;
pub use snapshot::WorldSnapshot;
