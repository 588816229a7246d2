//! Engine configuration
//!
//! Defaults come from the crate-root constants; a JSON file can override any
//! field (missing fields keep their defaults).

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::types::{ModuleId, Unit};
use crate::{
    DEFAULT_FADE_MS, DEFAULT_HISTORY_LENGTH, DEFAULT_NARRATIVE_TICK_MS, DEFAULT_PLOT_WIDTH,
    DEFAULT_UNLOCK_THRESHOLD, MIN_HISTORY_LENGTH, MIN_NARRATIVE_TICK_MS,
};

/// Tunables for one puzzle screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples kept in the rolling window
    pub history_length: usize,
    /// Display unit for the metric and threshold
    pub unit: Unit,
    /// Unlock threshold in `unit`
    pub unlock_threshold: f64,
    /// Plot with resting gravity as the visual floor
    pub normalized: bool,
    pub plot_width: f64,
    /// Interval between time-driven advance triggers, 0 disables the timer
    pub narrative_tick_ms: u64,
    /// Terminal text fade duration
    pub fade_ms: u64,
    /// Disable the home affordance while a lock puzzle is on screen
    pub home_locked_during_puzzle: bool,
    /// Modules that stay closed until the shake puzzle is solved
    pub gated_modules: Vec<ModuleId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_length: DEFAULT_HISTORY_LENGTH,
            unit: Unit::G,
            unlock_threshold: DEFAULT_UNLOCK_THRESHOLD,
            normalized: false,
            plot_width: DEFAULT_PLOT_WIDTH,
            narrative_tick_ms: DEFAULT_NARRATIVE_TICK_MS,
            fade_ms: DEFAULT_FADE_MS,
            home_locked_during_puzzle: true,
            gated_modules: vec![ModuleId::Camera, ModuleId::Compass],
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_length < MIN_HISTORY_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "history_length must be at least {}, got {}",
                MIN_HISTORY_LENGTH, self.history_length
            )));
        }
        if !self.unlock_threshold.is_finite() || self.unlock_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "unlock_threshold must be a positive number, got {}",
                self.unlock_threshold
            )));
        }
        if !self.plot_width.is_finite() || self.plot_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "plot_width must be positive, got {}",
                self.plot_width
            )));
        }
        if self.narrative_tick_ms != 0 && self.narrative_tick_ms < MIN_NARRATIVE_TICK_MS {
            return Err(ConfigError::Invalid(format!(
                "narrative_tick_ms must be 0 or at least {}, got {}",
                MIN_NARRATIVE_TICK_MS, self.narrative_tick_ms
            )));
        }
        Ok(())
    }
}

/// Why a config could not be loaded
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "malformed config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}
