//! Audio system
//!
//! The game only queues [`AudioRequest`]s; [`AudioManager`] plays them
//! using the Kira audio library.

pub mod manager;
pub mod sounds;

pub use manager::AudioManager;
pub use sounds::{AudioChannel, AudioCue, AudioRequest, ChannelVolumes};
