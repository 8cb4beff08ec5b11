//! Tuning configuration
//!
//! Loaded from a RON file with every field optional. A missing file means
//! defaults; a broken or out-of-range one is logged and also means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::ChannelVolumes;
use crate::entities::BossRhythm;
use crate::error::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "EMBERWILD_CONFIG";

/// Config file name, looked up in the working directory and the
/// platform config dir
pub const CONFIG_FILE: &str = "emberwild.ron";

/// Everything tunable without recompiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Half-extent of the overworld; it spans `[-world_size, world_size]`
    pub world_size: f32,
    pub overworld: OverworldSettings,
    pub dungeon: DungeonSettings,
    pub boss: BossRhythm,
    pub audio: AudioSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate: 60,
            world_size: 40.0,
            overworld: OverworldSettings::default(),
            dungeon: DungeonSettings::default(),
            boss: BossRhythm::default(),
            audio: AudioSettings::default(),
        }
    }
}

/// How busy the overworld is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverworldSettings {
    pub trees: u32,
    pub rocks: u32,
    pub bushes: u32,
    pub grass: u32,
    /// Side paths grown off the main trail
    pub branches: u32,
    /// Chance of a wolf pack member at each clearing
    pub enemy_chance: f64,
    /// Chance of a pickup at each clearing
    pub pickup_chance: f64,
    pub enemy_level: u32,
    /// Scenery keeps at least this far from the trail
    pub trail_clearance: f32,
}

impl Default for OverworldSettings {
    fn default() -> Self {
        Self {
            trees: 140,
            rocks: 40,
            bushes: 50,
            grass: 120,
            branches: 3,
            enemy_chance: 0.5,
            pickup_chance: 0.3,
            enemy_level: 1,
            trail_clearance: 2.0,
        }
    }
}

/// Dungeon layout parameters, one entry per dungeon level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonSettings {
    pub room_counts: [u32; 3],
    pub branch_chances: [f64; 3],
    /// Per occupied non-start cell
    pub obstacle_chance: f64,
    pub item_chance: f64,
    pub enemy_chance: f64,
    /// Walk length for the boss arena
    pub arena_rooms: u32,
}

impl Default for DungeonSettings {
    fn default() -> Self {
        Self {
            room_counts: [30, 40, 50],
            branch_chances: [0.0, 0.2, 0.3],
            obstacle_chance: 0.15,
            item_chance: 0.1,
            enemy_chance: 0.25,
            arena_rooms: 24,
        }
    }
}

impl DungeonSettings {
    /// Walk length and branch chance for dungeon `level` (1-based)
    pub fn for_level(&self, level: u32) -> (u32, f64) {
        let idx = (level.max(1) as usize - 1).min(self.room_counts.len() - 1);
        (self.room_counts[idx], self.branch_chances[idx])
    }
}

/// Audio backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub enabled: bool,
    pub master_volume: f64,
    pub volumes: ChannelVolumes,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: 1.0,
            volumes: ChannelVolumes::default(),
        }
    }
}

impl GameConfig {
    /// Load from the first config file found, falling back to defaults
    pub fn load() -> Self {
        for path in candidate_paths() {
            if !path.exists() {
                continue;
            }
            return match Self::from_path(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("{}. Using defaults.", e);
                    Self::default()
                }
            };
        }
        log::debug!("No config file found, using defaults");
        Self::default()
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse RON text; errors are reported against an unnamed source
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        config.validate().map_err(|details| ConfigError::Invalid {
            path: path.to_path_buf(),
            details,
        })?;
        Ok(config)
    }

    /// Reject values the generators and timers cannot work with
    fn validate(&self) -> Result<(), String> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(format!("world_size must be positive, got {}", self.world_size));
        }
        if !(self.overworld.trail_clearance.is_finite() && self.overworld.trail_clearance >= 0.0) {
            return Err(format!(
                "overworld.trail_clearance must not be negative, got {}",
                self.overworld.trail_clearance
            ));
        }
        if self.dungeon.arena_rooms == 0 {
            return Err("dungeon.arena_rooms must be at least 1".to_string());
        }

        let dungeon = &self.dungeon;
        let chances = [
            ("overworld.enemy_chance", self.overworld.enemy_chance),
            ("overworld.pickup_chance", self.overworld.pickup_chance),
            ("dungeon.branch_chances[0]", dungeon.branch_chances[0]),
            ("dungeon.branch_chances[1]", dungeon.branch_chances[1]),
            ("dungeon.branch_chances[2]", dungeon.branch_chances[2]),
            ("dungeon.obstacle_chance", dungeon.obstacle_chance),
            ("dungeon.item_chance", dungeon.item_chance),
            ("dungeon.enemy_chance", dungeon.enemy_chance),
        ];
        for (name, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{} must be within 0..=1, got {}", name, chance));
            }
        }

        let boss = &self.boss;
        let timings = [
            ("boss.pause_after_charge", boss.pause_after_charge),
            ("boss.special_cooldown", boss.special_cooldown),
            ("boss.special_range", boss.special_range),
            ("boss.anim_interval", boss.anim_interval),
            ("boss.enraged_anim_interval", boss.enraged_anim_interval),
        ];
        for (name, value) in timings {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{} must not be negative, got {}", name, value));
            }
        }

        let volumes = &self.audio.volumes;
        for (name, volume) in [
            ("audio.master_volume", self.audio.master_volume),
            ("audio.volumes.music", volumes.music),
            ("audio.volumes.effects", volumes.effects),
            ("audio.volumes.ambient", volumes.ambient),
            ("audio.volumes.ui", volumes.ui),
        ] {
            if !volume.is_finite() {
                return Err(format!("{} must be a number, got {}", name, volume));
            }
        }
        Ok(())
    }
}

/// Places a config file may live, in lookup order
fn candidate_paths() -> Vec<PathBuf> {
    use directories::ProjectDirs;

    let mut paths = Vec::new();
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        paths.push(PathBuf::from(explicit));
    }
    paths.push(PathBuf::from(CONFIG_FILE));
    if let Some(proj_dirs) = ProjectDirs::from("com", "emberwild", "Emberwild") {
        paths.push(proj_dirs.config_dir().join(CONFIG_FILE));
    }
    paths
}
