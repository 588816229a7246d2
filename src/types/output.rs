//! Output structures for terminal display

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{Metric, ReasonCode, SeverityBand, Unit};

/// Output for each sample pushed through a sensor pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Derived metric, None while the window holds fewer than two samples
    pub metric: Option<Metric>,
    pub unit: Unit,
    pub threshold: f64,
    pub is_unlocked: bool,
    /// Set only on the tick that crossed the threshold
    pub just_unlocked: bool,
    pub samples: usize,
    pub reason: ReasonCode,
}

impl TickOutput {
    pub fn new(
        metric: Option<Metric>,
        unit: Unit,
        threshold: f64,
        is_unlocked: bool,
        samples: usize,
        reason: ReasonCode,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            metric,
            unit,
            threshold,
            is_unlocked,
            just_unlocked: reason == ReasonCode::R001_UNLOCKED,
            samples,
            reason,
        }
    }

    /// Band of the current window; red while there is nothing to draw
    pub fn band(&self) -> SeverityBand {
        self.metric
            .map(|m| m.severity_band)
            .unwrap_or(SeverityBand::Red)
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let band = self.band();
        let lock = if self.is_unlocked { "🔓" } else { "🔒" };
        match self.metric {
            Some(m) => format!(
                "{}{} {} value={:.2}{} | max={:.2} | threshold={:.2} | {}{}",
                band.color_code(),
                band.emoji(),
                lock,
                m.converted_value,
                self.unit,
                m.window_max,
                self.threshold,
                self.reason.code(),
                SeverityBand::color_reset()
            ),
            None => format!(
                "\x1b[90m{} waiting for samples ({}) | {}{}",
                lock,
                self.samples,
                self.reason.code(),
                SeverityBand::color_reset()
            ),
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        match self.metric {
            Some(m) => format!(
                "value={:.3} | unit={} | max={:.3} | band={} | unlocked={} | reason={}",
                m.converted_value,
                self.unit,
                m.window_max,
                m.severity_band,
                self.is_unlocked,
                self.reason.code()
            ),
            None => format!(
                "value=- | unit={} | samples={} | unlocked={} | reason={}",
                self.unit,
                self.samples,
                self.is_unlocked,
                self.reason.code()
            ),
        }
    }
}
