//! Movement and collision core for a 3D platformer with phase-shifting twin
//! platforms.
//!
//! A level is loaded into a [`hecs::World`] by [`scene`], and
//! [`app::GameWorld`] steps the player through it one fixed tick at a time.

pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod recording;
pub mod scene;
pub mod systems;

pub use app::{GameWorld, WorldEvent};
pub use config::{ConfigError, InputScript, PlayerTuning};
pub use recording::Recorder;
