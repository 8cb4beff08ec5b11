//! Sound definitions and mappings
//!
//! Every sound the core can ask for, the channel it plays on, and the
//! request type the game pushes onto its audio queue.

use std::ops::{Index, IndexMut};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Sound event identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    // === Combat ===
    /// An attack connected
    AttackHit,
    /// Player special bolt fired
    SpecialCast,
    /// Player took damage
    PlayerHurt,
    EnemyDefeated,
    BossEnraged,
    BossDefeated,

    // === Progression ===
    ItemPickup,
    LevelUp,
    SkillLearned,

    // === World ===
    PortalUsed,
    GameOver,

    // === UI ===
    MenuOpen,
    MenuClose,
    MenuSelect,

    // === Ambient loops ===
    ForestAmbience,
    DungeonAmbience,
    ArenaTheme,
    ParadiseTheme,
    HearthAmbience,
}

impl AudioCue {
    /// Get the file path for this sound
    pub fn file_path(&self) -> &'static str {
        match self {
            AudioCue::AttackHit => "assets/sounds/combat/hit.ogg",
            AudioCue::SpecialCast => "assets/sounds/combat/bolt.ogg",
            AudioCue::PlayerHurt => "assets/sounds/combat/player_hurt.ogg",
            AudioCue::EnemyDefeated => "assets/sounds/combat/enemy_death.ogg",
            AudioCue::BossEnraged => "assets/sounds/combat/boss_enrage.ogg",
            AudioCue::BossDefeated => "assets/sounds/combat/boss_defeat.ogg",

            AudioCue::ItemPickup => "assets/sounds/items/pickup.ogg",
            AudioCue::LevelUp => "assets/sounds/ambient/level_up.ogg",
            AudioCue::SkillLearned => "assets/sounds/ui/skill.ogg",

            AudioCue::PortalUsed => "assets/sounds/environment/portal.ogg",
            AudioCue::GameOver => "assets/sounds/combat/player_death.ogg",

            AudioCue::MenuOpen => "assets/sounds/ui/open.ogg",
            AudioCue::MenuClose => "assets/sounds/ui/back.ogg",
            AudioCue::MenuSelect => "assets/sounds/ui/select.ogg",

            AudioCue::ForestAmbience => "assets/sounds/music/forest.ogg",
            AudioCue::DungeonAmbience => "assets/sounds/music/dungeon.ogg",
            AudioCue::ArenaTheme => "assets/sounds/music/arena.ogg",
            AudioCue::ParadiseTheme => "assets/sounds/music/paradise.ogg",
            AudioCue::HearthAmbience => "assets/sounds/music/hearth.ogg",
        }
    }

    /// Get the default volume for this sound (0.0 - 1.0)
    pub fn default_volume(&self) -> f64 {
        match self {
            AudioCue::MenuSelect | AudioCue::MenuOpen | AudioCue::MenuClose => 0.5,
            AudioCue::ItemPickup => 0.5,
            AudioCue::AttackHit | AudioCue::SpecialCast => 0.6,
            AudioCue::PlayerHurt => 0.7,
            AudioCue::LevelUp | AudioCue::BossEnraged => 0.8,
            AudioCue::BossDefeated | AudioCue::GameOver => 0.9,
            _ => 0.6,
        }
    }

    /// Which mixer channel the cue plays on
    pub fn channel(&self) -> AudioChannel {
        match self {
            AudioCue::AttackHit | AudioCue::SpecialCast | AudioCue::PlayerHurt |
            AudioCue::EnemyDefeated | AudioCue::BossEnraged | AudioCue::BossDefeated |
            AudioCue::ItemPickup | AudioCue::LevelUp | AudioCue::PortalUsed |
            AudioCue::GameOver => AudioChannel::Effects,

            AudioCue::MenuOpen | AudioCue::MenuClose | AudioCue::MenuSelect |
            AudioCue::SkillLearned => AudioChannel::Ui,

            AudioCue::ForestAmbience | AudioCue::DungeonAmbience |
            AudioCue::HearthAmbience => AudioChannel::Ambient,

            AudioCue::ArenaTheme | AudioCue::ParadiseTheme => AudioChannel::Music,
        }
    }

    /// Check if the sound file exists
    pub fn exists(&self) -> bool {
        Path::new(self.file_path()).exists()
    }
}

/// Mixer channels, each with its own volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChannel {
    Music,
    Effects,
    Ambient,
    Ui,
}

/// Per-channel volume table, indexed by [`AudioChannel`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelVolumes {
    pub music: f64,
    pub effects: f64,
    pub ambient: f64,
    pub ui: f64,
}

impl Default for ChannelVolumes {
    fn default() -> Self {
        Self {
            music: 0.6,
            effects: 0.7,
            ambient: 0.5,
            ui: 0.5,
        }
    }
}

impl Index<AudioChannel> for ChannelVolumes {
    type Output = f64;

    fn index(&self, channel: AudioChannel) -> &f64 {
        match channel {
            AudioChannel::Music => &self.music,
            AudioChannel::Effects => &self.effects,
            AudioChannel::Ambient => &self.ambient,
            AudioChannel::Ui => &self.ui,
        }
    }
}

impl IndexMut<AudioChannel> for ChannelVolumes {
    fn index_mut(&mut self, channel: AudioChannel) -> &mut f64 {
        match channel {
            AudioChannel::Music => &mut self.music,
            AudioChannel::Effects => &mut self.effects,
            AudioChannel::Ambient => &mut self.ambient,
            AudioChannel::Ui => &mut self.ui,
        }
    }
}

/// What the game asks of the audio backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioRequest {
    /// Fire and forget
    Play(AudioCue),
    /// Start a loop; a cue already looping is left alone
    PlayLoop(AudioCue),
    StopLoop(AudioCue),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_loops_on_background_channels() {
        for cue in [AudioCue::ForestAmbience, AudioCue::DungeonAmbience, AudioCue::ArenaTheme] {
            assert!(matches!(cue.channel(), AudioChannel::Ambient | AudioChannel::Music));
        }
        assert_eq!(AudioCue::MenuOpen.channel(), AudioChannel::Ui);
    }

    #[test]
    fn test_channel_volume_indexing() {
        let mut volumes = ChannelVolumes::default();
        volumes[AudioChannel::Effects] = 0.25;
        assert_eq!(volumes.effects, 0.25);
        assert_eq!(volumes[AudioChannel::Music], ChannelVolumes::default().music);
    }
}
