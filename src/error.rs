//! Error types
//!
//! Only the edges of the game (config files, audio backend) produce errors.
//! Game logic itself answers with `bool` or `Option`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the tuning config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// RON parsing failed.
    #[error("Parse error in config '{path}': {details}")]
    Parse { path: PathBuf, details: String },

    /// Config parsed but holds a value the game cannot run with.
    #[error("Invalid value in config '{path}': {details}")]
    Invalid { path: PathBuf, details: String },
}

/// Errors from the audio backend.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The audio device could not be opened.
    #[error("Failed to initialize audio backend: {0}")]
    Backend(String),

    /// Sound file is missing from the assets folder.
    #[error("Sound file not found: {0}")]
    FileNotFound(String),

    /// Sound file exists but could not be decoded.
    #[error("Failed to load sound '{path}': {details}")]
    Load { path: String, details: String },
}
