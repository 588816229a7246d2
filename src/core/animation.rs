//! Frame-driven continuous values and cancellable timers
//!
//! Both are advanced explicitly by the owning screen (`tick(dt_ms)`), never by
//! a background thread, and both die with their owner.

use std::fmt;

use crate::MAX_TIMER_CATCHUP;

/// Lifecycle of one animation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Linear interpolation toward a target with a one-shot completion callback.
///
/// The callback fires at most once per run, and never after `cancel()` or a
/// restart.
pub struct Interpolation {
    value: f64,
    from: f64,
    target: f64,
    duration_ms: u64,
    elapsed_ms: u64,
    phase: AnimationPhase,
    on_complete: Option<Box<dyn FnOnce()>>,
    runs: u64,
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolation")
            .field("value", &self.value)
            .field("target", &self.target)
            .field("duration_ms", &self.duration_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("phase", &self.phase)
            .field("runs", &self.runs)
            .finish()
    }
}

impl Interpolation {
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            from: initial,
            target: initial,
            duration_ms: 0,
            elapsed_ms: 0,
            phase: AnimationPhase::Idle,
            on_complete: None,
            runs: 0,
        }
    }

    /// Start a run from the current value. A run already in flight is
    /// cancelled first and its callback dropped.
    pub fn start(&mut self, target: f64, duration_ms: u64, on_complete: impl FnOnce() + 'static) {
        self.cancel();
        self.from = self.value;
        self.target = target;
        self.duration_ms = duration_ms;
        self.elapsed_ms = 0;
        self.phase = AnimationPhase::Running;
        self.on_complete = Some(Box::new(on_complete));
        self.runs += 1;
    }

    /// Advance by one frame and return the current value
    pub fn tick(&mut self, dt_ms: u64) -> f64 {
        if self.phase != AnimationPhase::Running {
            return self.value;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            (self.elapsed_ms as f64 / self.duration_ms as f64).min(1.0)
        };
        self.value = self.from + (self.target - self.from) * t;

        if t >= 1.0 {
            self.value = self.target;
            self.phase = AnimationPhase::Completed;
            if let Some(callback) = self.on_complete.take() {
                callback();
            }
        }
        self.value
    }

    /// Stop a running animation where it is. Its callback never fires.
    pub fn cancel(&mut self) {
        if self.phase == AnimationPhase::Running {
            self.phase = AnimationPhase::Cancelled;
        }
        self.on_complete = None;
    }

    /// Jump to a value without animating
    pub fn set(&mut self, value: f64) {
        self.cancel();
        self.value = value;
        self.from = value;
        self.target = value;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Fraction of the current run completed, 1.0 when not running
    pub fn progress(&self) -> f64 {
        match self.phase {
            AnimationPhase::Running if self.duration_ms > 0 => {
                (self.elapsed_ms as f64 / self.duration_ms as f64).min(1.0)
            }
            AnimationPhase::Running => 0.0,
            _ => 1.0,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == AnimationPhase::Running
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }
}

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    interval_ms: u64,
    remaining_ms: u64,
    repeating: bool,
}

/// Cancellable one-shot and repeating timers advanced by frame ticks
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once after `delay_ms`
    pub fn after(&mut self, delay_ms: u64) -> TimerId {
        self.schedule(delay_ms, false)
    }

    /// Fire every `interval_ms` until cancelled
    pub fn every(&mut self, interval_ms: u64) -> TimerId {
        self.schedule(interval_ms, true)
    }

    fn schedule(&mut self, interval_ms: u64, repeating: bool) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let interval_ms = interval_ms.max(1);
        self.timers.push(Timer {
            id,
            interval_ms,
            remaining_ms: interval_ms,
            repeating,
        });
        id
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Advance all timers; returns fired ids ordered by due time.
    /// A repeating timer fires once per elapsed interval, at most
    /// `MAX_TIMER_CATCHUP` times per tick; further missed intervals are dropped.
    pub fn tick(&mut self, dt_ms: u64) -> Vec<TimerId> {
        // (offset into this tick, id)
        let mut fired: Vec<(u64, TimerId)> = Vec::new();
        for timer in &mut self.timers {
            let mut offset = 0u64;
            let mut count = 0usize;
            while dt_ms - offset >= timer.remaining_ms {
                offset += timer.remaining_ms;
                fired.push((offset, timer.id));
                count += 1;
                if !timer.repeating {
                    timer.remaining_ms = 0;
                    break;
                }
                timer.remaining_ms = timer.interval_ms;
                if count >= MAX_TIMER_CATCHUP {
                    log::debug!("timer {:?} dropped missed intervals", timer.id);
                    offset = dt_ms - (dt_ms - offset) % timer.interval_ms;
                    break;
                }
            }
            if timer.remaining_ms > 0 {
                timer.remaining_ms -= dt_ms - offset;
            }
        }
        self.timers.retain(|t| t.repeating || t.remaining_ms > 0);
        fired.sort_by_key(|(offset, _)| *offset);
        fired.into_iter().map(|(_, id)| id).collect()
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }
}
