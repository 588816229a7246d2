//! Narrative Engine: glitch level state machine
//!
//! Pure reducer over (level, trigger):
//! - advance → min(level + 1, 6)
//! - reset   → 0
//!
//! The engine owns no timers; ticks, commands and voice matches arrive as
//! triggers from outside.

use serde::{Deserialize, Serialize};
use crate::types::{Directive, GlitchLevel, ReasonCode, Trigger, TriggerSource};

/// Next level for a trigger
pub fn reduce(level: GlitchLevel, trigger: Trigger) -> GlitchLevel {
    match trigger {
        Trigger::Advance(_) => level.next(),
        Trigger::Reset => GlitchLevel::ZERO,
    }
}

/// Result of applying one trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeOutput {
    pub previous: GlitchLevel,
    pub level: GlitchLevel,
    pub changed: bool,
    pub directive: Directive,
    pub reason: ReasonCode,
}

impl NarrativeOutput {
    /// Format for terminal display
    pub fn to_terminal_string(&self) -> String {
        let color = if self.directive.danger_tint { "\x1b[31m" } else { "\x1b[32m" };
        let mut out = format!(
            "{}[{} {:>3.0}%] {}\x1b[0m",
            color,
            self.level,
            self.directive.progress_percent,
            self.directive.display_text(1.0)
        );
        if let Some(overlay) = &self.directive.overlay {
            out.push_str(&format!("\n\x1b[41;97m  {}  \x1b[0m", overlay));
        }
        out
    }

    pub fn to_parseable_string(&self) -> String {
        format!(
            "level={} | progress={:.0} | overlay={} | audio={} | reason={}",
            self.level.value(),
            self.directive.progress_percent,
            self.directive.overlay.is_some(),
            self.directive.audio_cue,
            self.reason.code()
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct NarrativeEngine {
    level: GlitchLevel,
    /// Triggers applied, no-ops included
    trigger_count: u64,
    last_source: Option<TriggerSource>,
}

impl NarrativeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume at a saved level
    pub fn at_level(level: GlitchLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Apply a trigger and return the directive for the resulting level
    pub fn apply(&mut self, trigger: Trigger) -> NarrativeOutput {
        let previous = self.level;
        let level = reduce(previous, trigger);
        self.trigger_count += 1;

        let reason = match trigger {
            Trigger::Reset => ReasonCode::R003_LEVEL_RESET,
            Trigger::Advance(_) if level == previous => ReasonCode::R003_LEVEL_SATURATED,
            Trigger::Advance(_) => ReasonCode::R003_LEVEL_ADVANCED,
        };
        if let Trigger::Advance(source) = trigger {
            self.last_source = Some(source);
        }

        let changed = level != previous;
        if changed {
            log::info!("glitch level {} -> {} ({:?})", previous, level, trigger);
        } else {
            log::debug!("glitch level unchanged at {} ({:?})", level, trigger);
        }
        self.level = level;

        NarrativeOutput {
            previous,
            level,
            changed,
            directive: Directive::for_level(level),
            reason,
        }
    }

    pub fn level(&self) -> GlitchLevel {
        self.level
    }

    pub fn directive(&self) -> Directive {
        Directive::for_level(self.level)
    }

    pub fn progress_percent(&self) -> f64 {
        self.level.progress_percent()
    }

    pub fn is_terminal(&self) -> bool {
        self.level.is_terminal()
    }

    pub fn trigger_count(&self) -> u64 {
        self.trigger_count
    }

    pub fn last_source(&self) -> Option<TriggerSource> {
        self.last_source
    }
}
