//! Puzzle screen: lifetime owner of one sensor pipeline, the narrative
//! engine, the navigator, and the animations and timers keyed to them.
//!
//! Ordering on every level change: the discrete transition is applied first,
//! then the terminal fade restarts. Exiting the screen stops sample intake,
//! drops the sample window and unlock progress, cancels the fade and clears
//! every timer, so nothing fires against a torn-down screen.
//!
//! A threshold crossing only releases the module whose lock puzzle is on
//! screen. Released gates live in the navigator and survive exit.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::core::{
    Interpolation, ModuleNavigator, NarrativeEngine, NarrativeOutput, NavOutcome, SensorPipeline,
    TimerId, TimerSet,
};
use crate::types::{
    Directive, ModuleContent, ModuleId, ModuleState, Permission, PermissionKind, Plot, ReasonCode, SensorSample,
    TickOutput, Trigger, TriggerSource,
};

/// What the sensor panel should draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", content = "plot", rename_all = "snake_case")]
pub enum SensorView {
    PermissionDenied,
    AwaitingPermission,
    /// Fewer than two samples
    Empty,
    Plot(Plot),
}

impl SensorView {
    /// Why nothing is drawn, None when a plot is available
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            SensorView::PermissionDenied => Some(ReasonCode::R002_PERMISSION_DENIED),
            SensorView::AwaitingPermission => Some(ReasonCode::R002_PERMISSION_PENDING),
            SensorView::Empty => Some(ReasonCode::R002_INSUFFICIENT_DATA),
            SensorView::Plot(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct PuzzleScreen {
    config: EngineConfig,
    pipeline: SensorPipeline,
    narrative: NarrativeEngine,
    navigator: ModuleNavigator,
    /// Opacity of the terminal text block
    fade: Interpolation,
    timers: TimerSet,
    narrative_timer: Option<TimerId>,
    /// Triggers queued by callbacks, drained on the next frame
    pending: Rc<RefCell<VecDeque<Trigger>>>,
    /// Fade completion queues the next beat
    auto_advance: bool,
    mounted: bool,
}

impl PuzzleScreen {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            pipeline: SensorPipeline::from_config(&config),
            navigator: ModuleNavigator::with_gates(&config.gated_modules),
            narrative: NarrativeEngine::new(),
            fade: Interpolation::new(0.0),
            timers: TimerSet::new(),
            narrative_timer: None,
            pending: Rc::new(RefCell::new(VecDeque::new())),
            auto_advance: false,
            mounted: false,
            config,
        }
    }

    /// Chain narrative beats: each finished fade queues an advance
    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    /// Screen became active: start the narrative timer and fade in
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if self.config.narrative_tick_ms > 0 && !self.narrative.is_terminal() {
            self.narrative_timer = Some(self.timers.every(self.config.narrative_tick_ms));
        }
        self.start_fade();
        log::info!("puzzle screen mounted at level {}", self.narrative.level());
    }

    /// Screen left: stop intake, cancel animations and timers
    pub fn exit(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.fade.cancel();
        self.timers.clear();
        self.narrative_timer = None;
        self.pending.borrow_mut().clear();
        log::info!(
            "{} after {} samples",
            ReasonCode::R005_SCREEN_EXITED.code(),
            self.pipeline.total_samples()
        );
        self.pipeline.clear_window();
        self.pipeline.relock();
    }

    /// Feed one sensor sample. Ignored (None) once the screen has exited.
    pub fn on_sample(&mut self, sample: SensorSample) -> Option<TickOutput> {
        if !self.mounted {
            log::debug!("sample at {}ms ignored: screen not mounted", sample.timestamp_ms);
            return None;
        }
        let output = self.pipeline.process(sample);
        if output.is_unlocked {
            if let ModuleState::Locked(module) = self.navigator.state() {
                self.navigator.update_gate(module, &self.pipeline.unlock_state());
                self.navigator.set_home_enabled(true);
                self.navigator.open(module);
            }
        }
        Some(output)
    }

    /// Apply an external trigger right away
    pub fn on_trigger(&mut self, trigger: Trigger) -> Option<NarrativeOutput> {
        if !self.mounted {
            log::debug!("trigger {:?} ignored: screen not mounted", trigger);
            return None;
        }
        Some(self.apply(trigger))
    }

    /// Advance animations and timers by one frame; returns the narrative
    /// transitions this frame produced, in order.
    pub fn on_frame(&mut self, dt_ms: u64) -> Vec<NarrativeOutput> {
        if !self.mounted {
            return Vec::new();
        }
        self.fade.tick(dt_ms);
        for id in self.timers.tick(dt_ms) {
            if Some(id) == self.narrative_timer {
                self.pending
                    .borrow_mut()
                    .push_back(Trigger::Advance(TriggerSource::Tick));
            }
        }

        let mut outputs = Vec::new();
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(trigger) => outputs.push(self.apply(trigger)),
                None => break,
            }
        }
        outputs
    }

    fn apply(&mut self, trigger: Trigger) -> NarrativeOutput {
        let output = self.narrative.apply(trigger);
        if output.changed {
            self.start_fade();
        }
        if self.narrative.is_terminal() {
            if let Some(id) = self.narrative_timer.take() {
                self.timers.cancel(id);
            }
        } else if self.narrative_timer.is_none() && self.config.narrative_tick_ms > 0 {
            self.narrative_timer = Some(self.timers.every(self.config.narrative_tick_ms));
        }
        output
    }

    fn start_fade(&mut self) {
        self.fade.set(0.0);
        let pending = Rc::clone(&self.pending);
        let chain = self.auto_advance && !self.narrative.is_terminal();
        self.fade.start(1.0, self.config.fade_ms, move || {
            if chain {
                pending
                    .borrow_mut()
                    .push_back(Trigger::Advance(TriggerSource::Animation));
            }
        });
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn open(&mut self, module: ModuleId) -> NavOutcome {
        if !self.mounted {
            return self.exited();
        }
        self.navigator.open(module)
    }

    /// Show a gated module's lock puzzle
    pub fn challenge(&mut self, module: ModuleId) -> NavOutcome {
        if !self.mounted {
            return self.exited();
        }
        let outcome = self.navigator.challenge(module);
        if matches!(outcome.state, ModuleState::Locked(_)) {
            // Each puzzle needs its own crossing
            self.pipeline.relock();
            if self.config.home_locked_during_puzzle {
                self.navigator.set_home_enabled(false);
            }
        }
        outcome
    }

    pub fn go_home(&mut self) -> NavOutcome {
        if !self.mounted {
            return self.exited();
        }
        self.navigator.go_home()
    }

    fn exited(&self) -> NavOutcome {
        NavOutcome {
            state: self.navigator.state(),
            changed: false,
            reason: ReasonCode::R005_SCREEN_EXITED,
        }
    }

    pub fn set_permission(&mut self, kind: PermissionKind, permission: Permission) {
        self.navigator.set_permission(kind, permission);
    }

    // -------------------------------------------------------------------------
    // Render state
    // -------------------------------------------------------------------------

    pub fn sensor_view(&self) -> SensorView {
        match ModuleContent::from(self.navigator.permission(PermissionKind::Motion)) {
            ModuleContent::Denied => SensorView::PermissionDenied,
            ModuleContent::AwaitingPermission => SensorView::AwaitingPermission,
            ModuleContent::Live => match self.pipeline.plot() {
                Some(plot) => SensorView::Plot(plot),
                None => SensorView::Empty,
            },
        }
    }

    pub fn directive(&self) -> Directive {
        self.narrative.directive()
    }

    /// Terminal text as currently revealed, cursor included
    pub fn terminal_text(&self) -> String {
        self.narrative.directive().display_text(self.fade.progress())
    }

    pub fn opacity(&self) -> f64 {
        self.fade.value()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_running()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn navigator(&self) -> &ModuleNavigator {
        &self.navigator
    }

    pub fn narrative(&self) -> &NarrativeEngine {
        &self.narrative
    }

    pub fn pipeline(&self) -> &SensorPipeline {
        &self.pipeline
    }

    /// Explicit session restart: everything back to initial state
    pub fn restart(&mut self) {
        let was_mounted = self.mounted;
        self.exit();
        self.pipeline.reset();
        self.navigator.reset();
        self.narrative = NarrativeEngine::new();
        self.fade.set(0.0);
        if was_mounted {
            self.mount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlitchLevel;

    fn config() -> EngineConfig {
        EngineConfig {
            narrative_tick_ms: 1000,
            fade_ms: 100,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_unmounted_screen_ignores_input() {
        let mut screen = PuzzleScreen::new(config());
        assert!(screen.on_sample(SensorSample::speed(1.0, 0)).is_none());
        assert!(screen.on_trigger(Trigger::Reset).is_none());
        assert!(screen.on_frame(16).is_empty());
    }

    #[test]
    fn test_timer_advances_narrative() {
        let mut screen = PuzzleScreen::new(config());
        screen.mount();
        assert!(screen.on_frame(999).is_empty());
        let out = screen.on_frame(1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].level, GlitchLevel::new(1));
    }

    #[test]
    fn test_level_change_restarts_fade() {
        let mut screen = PuzzleScreen::new(config());
        screen.mount();
        screen.on_frame(100);
        assert_eq!(screen.opacity(), 1.0);
        screen.on_trigger(Trigger::Advance(TriggerSource::Command));
        assert_eq!(screen.opacity(), 0.0);
        assert!(screen.is_fading());
    }

    #[test]
    fn test_exit_cancels_everything() {
        let mut screen = PuzzleScreen::new(config()).with_auto_advance(true);
        screen.mount();
        screen.on_frame(50);
        screen.exit();
        assert!(!screen.is_fading());
        assert_eq!(screen.pending_timers(), 0);
        assert!(screen.on_frame(10_000).is_empty());
        assert_eq!(screen.narrative().level(), GlitchLevel::ZERO);
        assert_eq!(screen.go_home().reason, ReasonCode::R005_SCREEN_EXITED);
    }

    #[test]
    fn test_sensor_view_reasons() {
        let mut screen = PuzzleScreen::new(config());
        screen.mount();
        assert_eq!(screen.sensor_view().reason(), Some(ReasonCode::R002_PERMISSION_PENDING));
        screen.set_permission(PermissionKind::Motion, Permission::Denied);
        assert_eq!(screen.sensor_view().reason(), Some(ReasonCode::R002_PERMISSION_DENIED));
    }

    #[test]
    fn test_timer_stops_at_terminal_level() {
        let mut screen = PuzzleScreen::new(config());
        screen.mount();
        for _ in 0..6 {
            screen.on_trigger(Trigger::Advance(TriggerSource::Voice));
        }
        assert!(screen.narrative().is_terminal());
        assert_eq!(screen.pending_timers(), 0);
    }
}
