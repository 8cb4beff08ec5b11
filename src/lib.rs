//! Emberwild - a small real-time action RPG
//!
//! Follow the trail through the forest, clear three dungeons, and face
//! the warden waiting in the arena below.

pub mod audio;
pub mod combat;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod progression;
pub mod ui;
pub mod world;

// Re-export commonly used types
pub use config::GameConfig;
pub use game::{Game, GameMode};
pub use world::MapId;
