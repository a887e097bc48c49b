//! Headless runner settings
//!
//! Read from a JSON file; any missing field takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE_HZ;

/// Settings for an autoplayed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the autopilot's music timing
    pub seed: u64,
    /// Shortest stretch of music per round, in ticks
    pub min_music_ticks: u32,
    /// Longest stretch of music per round, in ticks
    pub max_music_ticks: u32,
    /// Give up after this many ticks
    pub max_ticks: u64,
    /// Print the final snapshot as JSON
    pub print_snapshot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            min_music_ticks: TICK_RATE_HZ,
            max_music_ticks: 5 * TICK_RATE_HZ,
            max_ticks: 60 * 60 * TICK_RATE_HZ as u64,
            print_snapshot: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, fixing up an inverted music range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if settings.min_music_ticks > settings.max_music_ticks {
            log::warn!(
                "min_music_ticks {} > max_music_ticks {}, swapping",
                settings.min_music_ticks,
                settings.max_music_ticks
            );
            std::mem::swap(&mut settings.min_music_ticks, &mut settings.max_music_ticks);
        }
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), err);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Invalid settings in {}: {}, using defaults", path.display(), err);
                Self::default()
            }
        }
    }
}
