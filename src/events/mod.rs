//! Event types and observers used by the engine.
//!
//! Events decouple the systems that detect something (the collision
//! detector, host input, status requests) from the code reacting to it.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`collision`] – contact enter/exit edges between level objects
//! - [`gamestate`] – session status transitions
//! - [`input`] – key presses and object clicks from the host
pub mod audio;
pub mod collision;
pub mod gamestate;
pub mod input;
