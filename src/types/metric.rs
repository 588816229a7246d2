//! Derived metric types: units, severity bands, plot geometry

use serde::{Deserialize, Serialize};
use crate::{
    BAND_GREEN_MIN, BAND_ORANGE_MIN, BAND_PINK_MIN, BAND_YELLOW_MIN,
    EXPECTED_GRAVITY_FTS2, EXPECTED_GRAVITY_G, EXPECTED_GRAVITY_MS2, STANDARD_GRAVITY_MS2,
};

/// Display unit for acceleration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    #[serde(rename = "g")]
    #[default]
    G,
    #[serde(rename = "m/s2")]
    MetersPerSecondSquared,
    #[serde(rename = "ft/s2")]
    FeetPerSecondSquared,
}

impl Unit {
    /// Reading of a device at rest, in this unit
    pub fn expected_gravity(&self) -> f64 {
        match self {
            Unit::G => EXPECTED_GRAVITY_G,
            Unit::MetersPerSecondSquared => EXPECTED_GRAVITY_MS2,
            Unit::FeetPerSecondSquared => EXPECTED_GRAVITY_FTS2,
        }
    }

    /// Convert a raw magnitude (m/s²) into this unit
    pub fn convert(&self, raw_ms2: f64) -> f64 {
        match self {
            Unit::MetersPerSecondSquared => raw_ms2,
            _ => raw_ms2 / STANDARD_GRAVITY_MS2 * self.expected_gravity(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::G => "g",
            Unit::MetersPerSecondSquared => "m/s²",
            Unit::FeetPerSecondSquared => "ft/s²",
        }
    }

    /// Parse the short names used in config files and on the CLI
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" => Some(Unit::G),
            "m/s2" | "m/s²" | "ms2" => Some(Unit::MetersPerSecondSquared),
            "ft/s2" | "ft/s²" | "fts2" => Some(Unit::FeetPerSecondSquared),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Visual urgency of the current window. Never consulted for unlock decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Red,
    Orange,
    Yellow,
    Green,
    Pink,
}

impl SeverityBand {
    /// Band lookup over the window max
    pub fn from_max(max: f64) -> Self {
        if max >= BAND_PINK_MIN {
            SeverityBand::Pink
        } else if max >= BAND_GREEN_MIN {
            SeverityBand::Green
        } else if max >= BAND_YELLOW_MIN {
            SeverityBand::Yellow
        } else if max >= BAND_ORANGE_MIN {
            SeverityBand::Orange
        } else {
            SeverityBand::Red
        }
    }

    /// ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            SeverityBand::Red => "\x1b[31m",
            SeverityBand::Orange => "\x1b[38;5;208m",
            SeverityBand::Yellow => "\x1b[33m",
            SeverityBand::Green => "\x1b[32m",
            SeverityBand::Pink => "\x1b[95m",
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Stroke color for the companion plot
    pub fn hex(&self) -> &'static str {
        match self {
            SeverityBand::Red => "#ff3b30",
            SeverityBand::Orange => "#ff9500",
            SeverityBand::Yellow => "#ffcc00",
            SeverityBand::Green => "#34c759",
            SeverityBand::Pink => "#ff2d92",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SeverityBand::Red => "🟥",
            SeverityBand::Orange => "🟧",
            SeverityBand::Yellow => "🟨",
            SeverityBand::Green => "🟩",
            SeverityBand::Pink => "🩷",
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SeverityBand::Red => "RED",
            SeverityBand::Orange => "ORANGE",
            SeverityBand::Yellow => "YELLOW",
            SeverityBand::Green => "GREEN",
            SeverityBand::Pink => "PINK",
        };
        write!(f, "{}", name)
    }
}

/// Metric derived from the current window. Recomputed per sample, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Magnitude of the latest sample, m/s²
    pub raw_magnitude: f64,
    pub unit: Unit,
    /// Latest magnitude in `unit`
    pub converted_value: f64,
    /// Window max in `unit`, floored at resting gravity
    pub window_max: f64,
    pub severity_band: SeverityBand,
}

/// One vertex of the plotted line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    /// Converted value this vertex represents
    pub value: f64,
}

/// Geometry for the companion visualization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub width: f64,
    pub height: f64,
    /// Visual floor: 0, or 0.8 × resting gravity in normalized mode
    pub min: f64,
    pub max: f64,
    pub band: SeverityBand,
    /// Chronological: oldest sample first, newest last
    pub points: Vec<PlotPoint>,
}

impl Plot {
    /// Vertex of the most recent sample
    pub fn newest(&self) -> Option<&PlotPoint> {
        self.points.last()
    }

    /// SVG path data ("M x y L x y ...")
    pub fn to_svg_path(&self) -> String {
        let mut path = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                path.push(' ');
            }
            path.push_str(&format!("{} {:.2} {:.2}", cmd, p.x, p.y));
        }
        path
    }
}
