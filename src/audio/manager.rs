//! Audio manager using Kira
//!
//! Drains the game's audio requests: one-shots, plus looping tracks kept
//! by handle so they can be stopped on map change.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use kira::{
    manager::{backend::DefaultBackend, AudioManager as KiraManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
    Volume,
};

use super::sounds::{AudioCue, AudioRequest, ChannelVolumes};
use crate::config::AudioSettings;
use crate::error::AudioError;

/// Audio manager that handles all sound playback
pub struct AudioManager {
    /// Kira audio manager
    manager: KiraManager,
    /// Sound data, loaded on first use
    sounds: HashMap<AudioCue, StaticSoundData>,
    /// Cues whose files could not be loaded; not retried
    missing: HashSet<AudioCue>,
    /// Currently playing loops
    loops: HashMap<AudioCue, StaticSoundHandle>,
    /// Master volume (0.0 - 1.0)
    master_volume: f64,
    volumes: ChannelVolumes,
}

impl AudioManager {
    /// Open the audio device
    pub fn new(settings: &AudioSettings) -> Result<Self, AudioError> {
        let manager = KiraManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        log::info!("Audio manager initialized successfully");

        Ok(Self {
            manager,
            sounds: HashMap::new(),
            missing: HashSet::new(),
            loops: HashMap::new(),
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            volumes: settings.volumes,
        })
    }

    /// Load a sound from file
    fn load_sound(&mut self, cue: AudioCue) -> Result<StaticSoundData, AudioError> {
        if let Some(data) = self.sounds.get(&cue) {
            return Ok(data.clone());
        }

        let path = cue.file_path();
        if !Path::new(path).exists() {
            return Err(AudioError::FileNotFound(path.to_string()));
        }

        let data = StaticSoundData::from_file(path).map_err(|e| AudioError::Load {
            path: path.to_string(),
            details: e.to_string(),
        })?;
        self.sounds.insert(cue, data.clone());
        Ok(data)
    }

    /// Sound data ready to play at the cue's mixed volume
    fn prepare(&mut self, cue: AudioCue) -> Option<StaticSoundData> {
        if self.missing.contains(&cue) {
            return None;
        }

        let data = match self.load_sound(cue) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Cannot play sound {:?}: {}", cue, e);
                self.missing.insert(cue);
                return None;
            }
        };

        let volume = cue.default_volume() * self.volumes[cue.channel()] * self.master_volume;
        let settings = StaticSoundSettings::new().volume(Volume::Amplitude(volume));
        Some(data.with_settings(settings))
    }

    /// Play a sound effect
    pub fn play(&mut self, cue: AudioCue) {
        let Some(sound) = self.prepare(cue) else {
            return;
        };
        if let Err(e) = self.manager.play(sound) {
            log::debug!("Failed to play sound {:?}: {:?}", cue, e);
        }
    }

    /// Start a looping track unless it is already running
    pub fn play_loop(&mut self, cue: AudioCue) {
        if self.loops.contains_key(&cue) {
            return;
        }
        let Some(sound) = self.prepare(cue) else {
            return;
        };
        match self.manager.play(sound.loop_region(..)) {
            Ok(handle) => {
                self.loops.insert(cue, handle);
            }
            Err(e) => log::debug!("Failed to loop sound {:?}: {:?}", cue, e),
        }
    }

    pub fn stop_loop(&mut self, cue: AudioCue) {
        if let Some(mut handle) = self.loops.remove(&cue) {
            let _ = handle.stop(Tween::default());
        }
    }

    /// Carry out one request from the game
    pub fn handle(&mut self, request: AudioRequest) {
        match request {
            AudioRequest::Play(cue) => self.play(cue),
            AudioRequest::PlayLoop(cue) => self.play_loop(cue),
            AudioRequest::StopLoop(cue) => self.stop_loop(cue),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, volume: f64) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f64 {
        self.master_volume
    }

    pub fn volumes_mut(&mut self) -> &mut ChannelVolumes {
        &mut self.volumes
    }
}
