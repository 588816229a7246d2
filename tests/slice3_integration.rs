//! Integration tests for Slice 3 - Navigation and puzzle screen
//!
//! Tests module gating, permission-driven content, and the screen that wires
//! the sensor pipeline, narrative engine and navigator together.

use glitchlock::config::EngineConfig;
use glitchlock::core::{ModuleNavigator, PuzzleScreen, SensorView};
use glitchlock::types::{
    GlitchLevel, ModuleContent, ModuleId, ModuleState, Permission, PermissionKind, ReasonCode, SensorSample, Trigger,
    TriggerSource,
};
use glitchlock::STANDARD_GRAVITY_MS2;
use pretty_assertions::assert_eq;

fn config() -> EngineConfig {
    EngineConfig {
        history_length: 10,
        narrative_tick_ms: 1000,
        fade_ms: 200,
        ..EngineConfig::default()
    }
}

fn rest(t: i64) -> SensorSample {
    SensorSample::axes(0.0, 0.0, STANDARD_GRAVITY_MS2, t)
}

fn shake(t: i64) -> SensorSample {
    SensorSample::axes(0.0, 0.0, 2.5 * STANDARD_GRAVITY_MS2, t)
}

// =============================================================================
// NAVIGATOR
// =============================================================================

#[test]
fn test_gated_open_keeps_prior_state() {
    let mut nav = ModuleNavigator::with_gates(&[ModuleId::Camera]);
    nav.open(ModuleId::Terminal);

    let out = nav.open(ModuleId::Camera);
    assert_eq!(out.state, ModuleState::Open(ModuleId::Terminal));
    assert!(!out.changed);
    assert_eq!(out.reason, ReasonCode::R004_MODULE_GATED);
    assert_eq!(nav.history().len(), 1);
}

#[test]
fn test_open_from_open_switches_module() {
    let mut nav = ModuleNavigator::new();
    nav.open(ModuleId::Logs);
    let out = nav.open(ModuleId::Audio);
    assert_eq!(out.state, ModuleState::Open(ModuleId::Audio));
    assert_eq!(
        nav.history(),
        &[
            (ModuleState::Home, ModuleState::Open(ModuleId::Logs)),
            (ModuleState::Open(ModuleId::Logs), ModuleState::Open(ModuleId::Audio)),
        ]
    );
}

#[test]
fn test_permission_content_per_module() {
    let mut nav = ModuleNavigator::new();
    nav.set_permission(PermissionKind::Microphone, Permission::Granted);
    nav.set_permission(PermissionKind::Motion, Permission::Denied);

    assert_eq!(nav.content(ModuleId::Audio), ModuleContent::Live);
    assert_eq!(nav.content(ModuleId::Compass), ModuleContent::Denied);
    assert_eq!(nav.content(ModuleId::System), ModuleContent::Denied);
    assert_eq!(nav.content(ModuleId::Camera), ModuleContent::AwaitingPermission);
    assert_eq!(nav.content(ModuleId::Logs), ModuleContent::Live);
}

// =============================================================================
// PUZZLE SCREEN
// =============================================================================

#[test]
fn test_solving_puzzle_opens_challenged_module() {
    let mut screen = PuzzleScreen::new(config());
    screen.mount();

    let out = screen.challenge(ModuleId::Compass);
    assert_eq!(out.state, ModuleState::Locked(ModuleId::Compass));
    assert!(!screen.navigator().home_enabled());
    assert_eq!(screen.go_home().reason, ReasonCode::R004_HOME_DISABLED);

    screen.on_sample(rest(0));
    screen.on_sample(rest(20));
    assert_eq!(screen.navigator().state(), ModuleState::Locked(ModuleId::Compass));

    let tick = screen.on_sample(shake(40)).unwrap();
    assert!(tick.just_unlocked);
    assert_eq!(screen.navigator().state(), ModuleState::Open(ModuleId::Compass));
    assert!(screen.navigator().home_enabled());
    assert!(screen.navigator().is_available(ModuleId::Compass));
    assert!(!screen.navigator().is_available(ModuleId::Camera));
}

#[test]
fn test_shake_without_puzzle_releases_nothing() {
    let mut screen = PuzzleScreen::new(config());
    screen.mount();
    screen.on_sample(rest(0));
    let tick = screen.on_sample(SensorSample::axes(0.0, 0.0, 30.0, 20)).unwrap();
    assert!(tick.is_unlocked);

    assert!(!screen.navigator().is_available(ModuleId::Camera));
    assert!(!screen.navigator().is_available(ModuleId::Compass));
    assert!(screen.navigator().unlocked_modules().is_empty());

    // The earlier crossing does not count toward a puzzle shown afterwards
    screen.challenge(ModuleId::Camera);
    screen.on_sample(rest(40));
    assert_eq!(screen.navigator().state(), ModuleState::Locked(ModuleId::Camera));
    screen.on_sample(shake(60));
    assert_eq!(screen.navigator().state(), ModuleState::Open(ModuleId::Camera));
    assert_eq!(screen.navigator().unlocked_modules(), vec![ModuleId::Camera]);
}

#[test]
fn test_remount_starts_with_empty_window() {
    let mut screen = PuzzleScreen::new(config());
    screen.set_permission(PermissionKind::Motion, Permission::Granted);
    screen.mount();
    screen.on_sample(rest(0));
    screen.on_sample(rest(20));
    assert!(matches!(screen.sensor_view(), SensorView::Plot(_)));

    screen.exit();
    screen.mount();
    assert_eq!(screen.sensor_view(), SensorView::Empty);
    assert_eq!(screen.pipeline().window_samples(), 0);
}

#[test]
fn test_released_gate_survives_exit() {
    let mut screen = PuzzleScreen::new(config());
    screen.mount();
    screen.challenge(ModuleId::Compass);
    screen.on_sample(rest(0));
    screen.on_sample(shake(20));
    screen.exit();
    screen.mount();

    assert!(!screen.pipeline().unlock_state().is_unlocked);
    assert!(screen.navigator().is_available(ModuleId::Compass));
    assert_eq!(screen.open(ModuleId::Compass).reason, ReasonCode::R004_UNCHANGED);
}

#[test]
fn test_sensor_view_follows_motion_permission() {
    let mut screen = PuzzleScreen::new(config());
    screen.mount();
    assert_eq!(screen.sensor_view(), SensorView::AwaitingPermission);

    screen.set_permission(PermissionKind::Motion, Permission::Granted);
    screen.on_sample(rest(0));
    assert_eq!(screen.sensor_view(), SensorView::Empty);

    screen.on_sample(rest(20));
    match screen.sensor_view() {
        SensorView::Plot(plot) => assert_eq!(plot.points.len(), 2),
        other => panic!("expected plot, got {:?}", other),
    }

    screen.set_permission(PermissionKind::Motion, Permission::Denied);
    assert_eq!(screen.sensor_view(), SensorView::PermissionDenied);
}

#[test]
fn test_narrative_ticks_and_fade_reveal() {
    let mut screen = PuzzleScreen::new(config());
    screen.mount();

    screen.on_frame(1000);
    screen.on_frame(1000);
    assert_eq!(screen.narrative().level(), GlitchLevel::new(2));

    // Level 2 text types out with the fade
    assert!(screen.terminal_text().is_empty());
    screen.on_frame(100);
    let half = screen.terminal_text();
    screen.on_frame(100);
    let full = screen.terminal_text();
    assert!(!half.is_empty());
    assert!(half.len() < full.len());
    assert_eq!(full, screen.directive().text);
}

#[test]
fn test_auto_advance_chains_beats() {
    let config = EngineConfig {
        narrative_tick_ms: 0,
        fade_ms: 100,
        ..config()
    };
    let mut screen = PuzzleScreen::new(config).with_auto_advance(true);
    screen.mount();

    let mut steps = 0;
    while !screen.narrative().is_terminal() && steps < 20 {
        screen.on_frame(100);
        steps += 1;
    }
    assert!(screen.narrative().is_terminal());
    assert!(screen.on_frame(1000).is_empty());
}

#[test]
fn test_exit_stops_intake_and_timers() {
    let mut screen = PuzzleScreen::new(config());
    screen.mount();
    screen.on_sample(rest(0));
    screen.exit();

    assert!(screen.on_sample(shake(20)).is_none());
    assert!(screen.on_trigger(Trigger::Advance(TriggerSource::Command)).is_none());
    assert!(screen.on_frame(5000).is_empty());
    assert_eq!(screen.pending_timers(), 0);
    assert!(!screen.pipeline().unlock_state().is_unlocked);
    assert_eq!(screen.narrative().level(), GlitchLevel::ZERO);
}

#[test]
fn test_restart_resets_session() {
    let mut screen = PuzzleScreen::new(config());
    screen.mount();
    screen.challenge(ModuleId::Camera);
    screen.on_sample(rest(0));
    screen.on_sample(shake(20));
    screen.on_trigger(Trigger::Advance(TriggerSource::Voice));
    assert_eq!(screen.navigator().state(), ModuleState::Open(ModuleId::Camera));

    screen.restart();
    assert!(screen.is_mounted());
    assert_eq!(screen.navigator().state(), ModuleState::Home);
    assert!(!screen.navigator().is_available(ModuleId::Camera));
    assert_eq!(screen.narrative().level(), GlitchLevel::ZERO);
    assert_eq!(screen.pipeline().total_samples(), 0);
}
