// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player settings file.
//!
//! Stored as RON next to the stories it plays:
//! - Format version
//! - Frame rate of the headless loop
//! - Simulated asset streaming delay
//! - Timeline and flight tuning

use serde::{Deserialize, Serialize};
use std::path::Path;
use storycam_timeline::TimelineSettings;
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "storycam.ron";

/// Errors reading or writing a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read or written
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid RON
    #[error("invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer player
    #[error("settings version {found} is newer than supported version {supported}")]
    NewerVersion {
        /// Version in the file
        found: u32,
        /// Highest version this player reads
        supported: u32,
    },
}

/// Complete player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Settings format version
    pub version: u32,
    /// Frames per second of the headless loop
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Seconds before each projection's asset reports loaded
    #[serde(default)]
    pub asset_load_delay_secs: f32,
    /// Timeline and flight tuning
    #[serde(default)]
    pub timeline: TimelineSettings,
}

fn default_frame_rate() -> u32 {
    60
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            frame_rate: default_frame_rate(),
            asset_load_delay_secs: 0.0,
            timeline: TimelineSettings::default(),
        }
    }
}

impl PlayerSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: PlayerSettings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::NewerVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        tracing::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Length of one frame of the headless loop
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}
