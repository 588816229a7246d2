//! MetricDeriver: reduces a window of samples to a scalar metric
//!
//! - magnitude of the latest sample, converted to the display unit
//! - window max, floored at the unit's resting gravity
//! - severity band from the window max (visual urgency only)
//! - plot geometry for the companion line chart

use crate::{
    NORMALIZED_FLOOR_FACTOR, PLOT_MAX_HEIGHT, PLOT_MIN_HEIGHT, PLOT_SCALE_DIVISOR,
    DEFAULT_PLOT_WIDTH,
};
use crate::types::{Metric, Plot, PlotPoint, SensorSample, SeverityBand, Unit};

#[derive(Debug, Clone)]
pub struct MetricDeriver {
    unit: Unit,
    normalized: bool,
    width: f64,
}

impl Default for MetricDeriver {
    fn default() -> Self {
        Self::new(Unit::G)
    }
}

impl MetricDeriver {
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            normalized: false,
            width: DEFAULT_PLOT_WIDTH,
        }
    }

    /// Treat resting gravity as the visual floor instead of zero
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Derive the metric for a chronological window.
    /// Fewer than two samples is the empty state: returns None.
    pub fn derive(&self, window: &[SensorSample]) -> Option<Metric> {
        if window.len() < 2 {
            return None;
        }
        let latest = window.last()?;
        let raw_magnitude = latest.magnitude();
        let window_max = self.window_max(window);

        Some(Metric {
            raw_magnitude,
            unit: self.unit,
            converted_value: self.unit.convert(raw_magnitude),
            window_max,
            severity_band: SeverityBand::from_max(window_max),
        })
    }

    /// Max converted value over the window, never below resting gravity
    pub fn window_max(&self, window: &[SensorSample]) -> f64 {
        window
            .iter()
            .map(|s| self.unit.convert(s.magnitude()))
            .fold(self.unit.expected_gravity(), f64::max)
    }

    /// Visual floor of the plot
    pub fn plot_min(&self) -> f64 {
        if self.normalized {
            self.unit.expected_gravity() * NORMALIZED_FLOOR_FACTOR
        } else {
            0.0
        }
    }

    /// Plot geometry. `history_length` fixes the horizontal spacing so the line
    /// grows from the left until the window is full.
    pub fn plot(&self, window: &[SensorSample], history_length: usize) -> Option<Plot> {
        if window.len() < 2 {
            return None;
        }
        let max = self.window_max(window);
        let min = self.plot_min();
        let height = plot_height(max);
        let span = (history_length.max(2) - 1) as f64;

        let points = window
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let value = self.unit.convert(s.magnitude());
                PlotPoint {
                    x: (i as f64 / span) * self.width,
                    y: height - ((value - min) / (max - min)) * height,
                    value,
                }
            })
            .collect();

        Some(Plot {
            width: self.width,
            height,
            min,
            max,
            band: SeverityBand::from_max(max),
            points,
        })
    }
}

/// Plotted height for a window max: 30 + (max/50)·170, clamped to [30, 200]
pub fn plot_height(max: f64) -> f64 {
    (PLOT_MIN_HEIGHT + (max / PLOT_SCALE_DIVISOR) * (PLOT_MAX_HEIGHT - PLOT_MIN_HEIGHT))
        .clamp(PLOT_MIN_HEIGHT, PLOT_MAX_HEIGHT)
}
