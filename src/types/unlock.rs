//! Unlock state owned by the evaluator

use serde::{Deserialize, Serialize};

/// Whether a puzzle module has been unlocked this session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnlockState {
    pub is_unlocked: bool,
    /// Threshold in the metric's unit
    pub threshold: f64,
}

impl UnlockState {
    pub fn locked(threshold: f64) -> Self {
        Self {
            is_unlocked: false,
            threshold,
        }
    }
}
