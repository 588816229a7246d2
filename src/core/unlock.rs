//! Unlock Evaluator: sticky threshold crossing
//!
//! State transitions:
//! - LOCKED → UNLOCKED: converted value ≥ threshold (first crossing)
//! - UNLOCKED → UNLOCKED: any reading (one-way within a session)
//! - any → LOCKED: explicit reset only

use crate::types::{Metric, ReasonCode, UnlockState};

/// Threshold evaluator holding the unlock flag across ticks
#[derive(Debug, Clone)]
pub struct UnlockEvaluator {
    state: UnlockState,
    /// Value of the reading that unlocked
    unlocked_at: Option<f64>,
    /// Number of evaluations
    update_count: u64,
}

impl UnlockEvaluator {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: UnlockState::locked(threshold),
            unlocked_at: None,
            update_count: 0,
        }
    }

    /// Evaluate against the configured threshold
    pub fn update(&mut self, metric: &Metric) -> (UnlockState, ReasonCode) {
        let threshold = self.state.threshold;
        self.evaluate(metric, threshold)
    }

    /// Evaluate a metric against `threshold`. Once unlocked, stays unlocked.
    pub fn evaluate(&mut self, metric: &Metric, threshold: f64) -> (UnlockState, ReasonCode) {
        self.update_count += 1;
        self.state.threshold = threshold;

        if self.state.is_unlocked {
            return (self.state, ReasonCode::R001_ALREADY_UNLOCKED);
        }

        if metric.converted_value >= threshold {
            self.state.is_unlocked = true;
            self.unlocked_at = Some(metric.converted_value);
            log::info!(
                "unlocked: {:.3}{} >= {:.3}{}",
                metric.converted_value,
                metric.unit,
                threshold,
                metric.unit
            );
            (self.state, ReasonCode::R001_UNLOCKED)
        } else {
            (self.state, ReasonCode::R001_BELOW_THRESHOLD)
        }
    }

    pub fn state(&self) -> UnlockState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.is_unlocked
    }

    pub fn unlocked_at(&self) -> Option<f64> {
        self.unlocked_at
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Session restart: back to locked, same threshold
    pub fn reset(&mut self) {
        *self = Self::new(self.state.threshold);
    }
}

// =============================================================================
// TESTS
// =============================================================================
