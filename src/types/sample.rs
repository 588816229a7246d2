//! Raw sensor samples delivered by the sensor collaborator

use serde::{Deserialize, Serialize};

/// What a sensor delivered for one tick.
///
/// Accelerometers deliver a three-axis vector; the gyroscope family arrives
/// already reduced to a scalar speed. Both plot identically downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    /// Three-axis reading in m/s²
    Axes { x: f64, y: f64, z: f64 },
    /// Pre-reduced scalar
    Speed(f64),
}

impl Reading {
    /// Euclidean norm for axes, the scalar itself for speeds
    pub fn magnitude(&self) -> f64 {
        match *self {
            Reading::Axes { x, y, z } => (x * x + y * y + z * z).sqrt(),
            Reading::Speed(v) => v.abs(),
        }
    }
}

/// One timestamped sample. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub reading: Reading,
    pub timestamp_ms: i64,
}

impl SensorSample {
    /// Three-axis sample
    pub fn axes(x: f64, y: f64, z: f64, timestamp_ms: i64) -> Self {
        Self {
            reading: Reading::Axes { x, y, z },
            timestamp_ms,
        }
    }

    /// Scalar speed sample
    pub fn speed(value: f64, timestamp_ms: i64) -> Self {
        Self {
            reading: Reading::Speed(value),
            timestamp_ms,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.reading.magnitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_magnitude_is_euclidean() {
        let s = SensorSample::axes(3.0, 4.0, 12.0, 0);
        assert_eq!(s.magnitude(), 13.0);
    }

    #[test]
    fn test_single_axis_magnitude_is_exact() {
        let s = SensorSample::axes(0.0, 0.0, 19.62, 0);
        assert_eq!(s.magnitude(), 19.62);
    }

    #[test]
    fn test_speed_magnitude_passes_through() {
        assert_eq!(SensorSample::speed(2.5, 10).magnitude(), 2.5);
        assert_eq!(SensorSample::speed(-2.5, 10).magnitude(), 2.5);
    }
}
