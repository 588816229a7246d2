//! Reason codes for pipeline decisions, narrative beats and navigation

use serde::{Deserialize, Serialize};

/// Reason codes attached to every decision. Anomalies are display states,
/// never faults, so this taxonomy is where they surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R001: Unlock
    // =========================================================================
    /// Threshold crossed for the first time this session
    R001_UNLOCKED,
    /// Already unlocked, reading ignored
    R001_ALREADY_UNLOCKED,
    /// Below threshold, still locked
    R001_BELOW_THRESHOLD,

    // =========================================================================
    // R002: Data
    // =========================================================================
    /// Fewer than two buffered samples
    R002_INSUFFICIENT_DATA,
    /// Sensor, camera or microphone permission denied
    R002_PERMISSION_DENIED,
    /// Permission not answered yet
    R002_PERMISSION_PENDING,

    // =========================================================================
    // R003: Narrative
    // =========================================================================
    /// Glitch level advanced
    R003_LEVEL_ADVANCED,
    /// Advance received at max level, no-op
    R003_LEVEL_SATURATED,
    /// Explicit reset to level 0
    R003_LEVEL_RESET,

    // =========================================================================
    // R004: Navigation
    // =========================================================================
    /// Module opened
    R004_MODULE_OPENED,
    /// Open rejected, module still locked
    R004_MODULE_GATED,
    /// Entered a module's lock puzzle
    R004_MODULE_CHALLENGED,
    /// Returned home
    R004_HOME,
    /// Home affordance disabled
    R004_HOME_DISABLED,
    /// Intent targets the current state
    R004_UNCHANGED,

    // =========================================================================
    // R005: Lifecycle
    // =========================================================================
    /// Screen exited, input ignored
    R005_SCREEN_EXITED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R001_UNLOCKED => "R001_UNLOCKED",
            Self::R001_ALREADY_UNLOCKED => "R001_ALREADY_UNLOCKED",
            Self::R001_BELOW_THRESHOLD => "R001_BELOW_THRESHOLD",
            Self::R002_INSUFFICIENT_DATA => "R002_INSUFFICIENT_DATA",
            Self::R002_PERMISSION_DENIED => "R002_PERMISSION_DENIED",
            Self::R002_PERMISSION_PENDING => "R002_PERMISSION_PENDING",
            Self::R003_LEVEL_ADVANCED => "R003_LEVEL_ADVANCED",
            Self::R003_LEVEL_SATURATED => "R003_LEVEL_SATURATED",
            Self::R003_LEVEL_RESET => "R003_LEVEL_RESET",
            Self::R004_MODULE_OPENED => "R004_MODULE_OPENED",
            Self::R004_MODULE_GATED => "R004_MODULE_GATED",
            Self::R004_MODULE_CHALLENGED => "R004_MODULE_CHALLENGED",
            Self::R004_HOME => "R004_HOME",
            Self::R004_HOME_DISABLED => "R004_HOME_DISABLED",
            Self::R004_UNCHANGED => "R004_UNCHANGED",
            Self::R005_SCREEN_EXITED => "R005_SCREEN_EXITED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R001_UNLOCKED => "Threshold crossed - unlocked",
            Self::R001_ALREADY_UNLOCKED => "Already unlocked",
            Self::R001_BELOW_THRESHOLD => "Below unlock threshold",
            Self::R002_INSUFFICIENT_DATA => "Not enough samples to draw",
            Self::R002_PERMISSION_DENIED => "Permission denied",
            Self::R002_PERMISSION_PENDING => "Waiting for permission",
            Self::R003_LEVEL_ADVANCED => "Infection advanced",
            Self::R003_LEVEL_SATURATED => "Infection at maximum",
            Self::R003_LEVEL_RESET => "Infection reset",
            Self::R004_MODULE_OPENED => "Module opened",
            Self::R004_MODULE_GATED => "Module locked",
            Self::R004_MODULE_CHALLENGED => "Lock puzzle shown",
            Self::R004_HOME => "Returned home",
            Self::R004_HOME_DISABLED => "Home disabled",
            Self::R004_UNCHANGED => "Already there",
            Self::R005_SCREEN_EXITED => "Screen exited",
        }
    }

    /// True when the decision changed nothing
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Self::R001_ALREADY_UNLOCKED
                | Self::R001_BELOW_THRESHOLD
                | Self::R002_INSUFFICIENT_DATA
                | Self::R002_PERMISSION_DENIED
                | Self::R002_PERMISSION_PENDING
                | Self::R003_LEVEL_SATURATED
                | Self::R004_MODULE_GATED
                | Self::R004_HOME_DISABLED
                | Self::R004_UNCHANGED
                | Self::R005_SCREEN_EXITED
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
