//! Glitch levels, narrative triggers and render directives

use serde::{Deserialize, Serialize};
use crate::{
    CURSOR_GLYPH, CURSOR_LEVEL, DANGER_TINT_LEVEL, MAX_GLITCH_LEVEL, OVERLAY_LEVEL, OVERLAY_TEXT,
};

/// Infection stage, always within [0, MAX_GLITCH_LEVEL]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlitchLevel(u8);

impl GlitchLevel {
    pub const ZERO: GlitchLevel = GlitchLevel(0);
    pub const MAX: GlitchLevel = GlitchLevel(MAX_GLITCH_LEVEL);

    /// Clamps out-of-range values to MAX
    pub fn new(level: u8) -> Self {
        Self(level.min(MAX_GLITCH_LEVEL))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Next level, saturating at MAX
    pub fn next(&self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    pub fn is_terminal(&self) -> bool {
        self.0 >= MAX_GLITCH_LEVEL
    }

    /// Progress for indicators, 0..=100
    pub fn progress_percent(&self) -> f64 {
        self.0 as f64 / MAX_GLITCH_LEVEL as f64 * 100.0
    }
}

impl std::fmt::Display for GlitchLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, MAX_GLITCH_LEVEL)
    }
}

/// Where a trigger came from. Only used for logging and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// Elapsed-time tick
    Tick,
    /// Successful terminal command
    Command,
    /// Matched voice phrase
    Voice,
    /// Completion callback of a running animation
    Animation,
}

/// Discrete event consumed by the narrative engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Advance(TriggerSource),
    Reset,
}

/// Terminal lines shown per level
const SCRIPT: [&str; (MAX_GLITCH_LEVEL as usize) + 1] = [
    "> system status: nominal",
    "> running routine diagnostics...",
    "> [ERR] unknown process 0x7f3a attached to /dev/sensors",
    "> [ERR] kernel watchdog unresponsive, memory map rewritten",
    "> [CRIT] camera, microphone, location streams exfiltrating",
    "> [CRIT] vault keys copied to remote host 203.0.113.66",
    "> [CRIT] device control transferred. goodbye.",
];

/// What the view should render for a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub level: GlitchLevel,
    /// Full terminal line; reveal it progressively with `revealed_text`
    pub text: String,
    /// Blinking cursor appended after the text (visual only)
    pub show_cursor: bool,
    /// Background shifts to the danger color
    pub danger_tint: bool,
    /// Full-screen warning text layered above everything
    pub overlay: Option<String>,
    /// Play the alarm cue when entering this level
    pub audio_cue: bool,
    pub progress_percent: f64,
}

impl Directive {
    pub fn for_level(level: GlitchLevel) -> Self {
        let n = level.value();
        Self {
            level,
            text: SCRIPT[n as usize].to_string(),
            show_cursor: n >= CURSOR_LEVEL,
            danger_tint: n >= DANGER_TINT_LEVEL,
            overlay: (n >= OVERLAY_LEVEL).then(|| OVERLAY_TEXT.to_string()),
            audio_cue: matches!(n, 2 | 4 | 6),
            progress_percent: level.progress_percent(),
        }
    }

    /// Prefix of the text revealed at `fraction` (0..=1) of the typewriter run.
    /// Levels below the danger tint show their text in full.
    pub fn revealed_text(&self, fraction: f64) -> String {
        let chars = self.text.chars().count();
        let shown = if self.danger_tint {
            (fraction.clamp(0.0, 1.0) * chars as f64).floor() as usize
        } else {
            chars
        };
        self.text.chars().take(shown).collect()
    }

    /// Text as rendered, cursor glyph included
    pub fn display_text(&self, fraction: f64) -> String {
        let mut text = self.revealed_text(fraction);
        if self.show_cursor {
            text.push(CURSOR_GLYPH);
        }
        text
    }
}
