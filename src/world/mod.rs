//! World module
//!
//! Terrain, procedural trails and dungeons, and the maps built from them.

pub mod terrain;
pub mod trail;
pub mod dungeon;
pub mod map;

pub use map::{load_map, MapContents, MapId};
pub use terrain::{height, is_underwater};
pub use trail::{Trail, TrailPoint};
