//! Sensor pipeline for one channel.
//!
//! raw sample → SampleBuffer → MetricDeriver → UnlockEvaluator → TickOutput
//!
//! Runs synchronously once per delivered sample: O(history_length) work,
//! no suspension, no I/O.

use crate::config::EngineConfig;
use crate::core::{MetricDeriver, SampleBuffer, UnlockEvaluator};
use crate::types::{Plot, ReasonCode, SensorSample, TickOutput, Unit, UnlockState};

#[derive(Debug, Clone)]
pub struct SensorPipeline {
    buffer: SampleBuffer,
    deriver: MetricDeriver,
    evaluator: UnlockEvaluator,
    history_length: usize,
    total_samples: u64,
}

impl SensorPipeline {
    pub fn new(history_length: usize, unit: Unit, threshold: f64) -> Self {
        let buffer = SampleBuffer::new(history_length);
        Self {
            history_length: buffer.capacity(),
            buffer,
            deriver: MetricDeriver::new(unit),
            evaluator: UnlockEvaluator::new(threshold),
            total_samples: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut pipeline = Self::new(config.history_length, config.unit, config.unlock_threshold);
        pipeline.deriver = MetricDeriver::new(config.unit)
            .normalized(config.normalized)
            .with_width(config.plot_width);
        pipeline
    }

    /// Push one sample through every stage
    pub fn process(&mut self, sample: SensorSample) -> TickOutput {
        self.buffer.push(sample);
        self.total_samples += 1;

        let window = self.buffer.snapshot();
        let threshold = self.evaluator.state().threshold;
        match self.deriver.derive(&window) {
            Some(metric) => {
                let (state, reason) = self.evaluator.update(&metric);
                TickOutput::new(
                    Some(metric),
                    self.deriver.unit(),
                    threshold,
                    state.is_unlocked,
                    window.len(),
                    reason,
                )
            }
            None => TickOutput::new(
                None,
                self.deriver.unit(),
                threshold,
                self.evaluator.is_unlocked(),
                window.len(),
                ReasonCode::R002_INSUFFICIENT_DATA,
            ),
        }
    }

    /// Geometry for the current window, None below two samples
    pub fn plot(&self) -> Option<Plot> {
        self.deriver.plot(&self.buffer.snapshot(), self.history_length)
    }

    /// Newest-first copy for list rendering
    pub fn recent(&self) -> Vec<SensorSample> {
        self.buffer.iter().rev().copied().collect()
    }

    pub fn unlock_state(&self) -> UnlockState {
        self.evaluator.state()
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn window_samples(&self) -> usize {
        self.buffer.len()
    }

    /// Drop buffered samples; the next metric needs two fresh ones
    pub fn clear_window(&mut self) {
        self.buffer.clear();
    }

    /// Back to locked, window kept
    pub fn relock(&mut self) {
        self.evaluator.reset();
    }

    /// Drop the window and relock
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.evaluator.reset();
        self.total_samples = 0;
    }
}
