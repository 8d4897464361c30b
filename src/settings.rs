//! Shell settings
//!
//! Read once at startup from an optional JSON block in the page. Nothing is
//! written back: every session starts from these values.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;

/// Log verbosity for the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Shell settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logger verbosity
    pub log_level: LogLevel,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
    /// Suppress `playSound` notifications
    pub mute_cues: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            seed: None,
            mute_cues: false,
        }
    }
}

impl Settings {
    /// Page element holding optional settings JSON
    pub const ELEMENT_ID: &'static str = "arcade-settings";

    /// Parse settings; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Seed to use for a run, falling back to `clock_seed` when not pinned
    pub fn effective_seed(&self, clock_seed: u64) -> u64 {
        self.seed.unwrap_or(clock_seed)
    }
}
