//! Glitchlock: sensor-to-state pipeline and narrative engine
//!
//! Raw motion samples → SampleBuffer → MetricDeriver → UnlockEvaluator →
//! ModuleNavigator gating. The NarrativeEngine runs beside it, driven by
//! external triggers, and produces render directives for the terminal view.

pub mod config;
pub mod core;
pub mod types;

// =============================================================================
// GRAVITY & UNITS
// =============================================================================

/// Standard gravity in m/s². Raw accelerometer magnitudes arrive in m/s².
pub const STANDARD_GRAVITY_MS2: f64 = 9.81;

/// Resting gravity expressed in g
pub const EXPECTED_GRAVITY_G: f64 = 1.0;

/// Resting gravity expressed in m/s²
pub const EXPECTED_GRAVITY_MS2: f64 = 9.81;

/// Resting gravity expressed in ft/s²
pub const EXPECTED_GRAVITY_FTS2: f64 = 32.17;

// =============================================================================
// SEVERITY BANDS - lower bounds, inclusive
// =============================================================================

pub const BAND_PINK_MIN: f64 = 100.0;
pub const BAND_GREEN_MIN: f64 = 50.0;
pub const BAND_YELLOW_MIN: f64 = 40.0;
pub const BAND_ORANGE_MIN: f64 = 25.0;

// =============================================================================
// PLOT GEOMETRY
// =============================================================================

/// Smallest plotted height
pub const PLOT_MIN_HEIGHT: f64 = 30.0;

/// Largest plotted height
pub const PLOT_MAX_HEIGHT: f64 = 200.0;

/// Window max at which the plot reaches full height
pub const PLOT_SCALE_DIVISOR: f64 = 50.0;

/// Normalized mode floor as a fraction of resting gravity
pub const NORMALIZED_FLOOR_FACTOR: f64 = 0.8;

/// Default plot width
pub const DEFAULT_PLOT_WIDTH: f64 = 300.0;

// =============================================================================
// PIPELINE DEFAULTS
// =============================================================================

/// Samples kept per channel. Tens, not thousands: the plot is rebuilt per sample.
pub const DEFAULT_HISTORY_LENGTH: usize = 50;

/// Smallest usable window (a line needs two points)
pub const MIN_HISTORY_LENGTH: usize = 2;

/// Default unlock threshold in the configured unit (2 g)
pub const DEFAULT_UNLOCK_THRESHOLD: f64 = 2.0;

// =============================================================================
// NARRATIVE
// =============================================================================

/// Terminal glitch level, no escalation beyond it
pub const MAX_GLITCH_LEVEL: u8 = 6;

/// Level at which the background tint turns to danger
pub const DANGER_TINT_LEVEL: u8 = 2;

/// Level at which the blinking cursor is appended
pub const CURSOR_LEVEL: u8 = 3;

/// Level at which the full-screen warning overlay appears
pub const OVERLAY_LEVEL: u8 = 4;

/// Overlay text
pub const OVERLAY_TEXT: &str = "SYSTEM COMPROMISED";

/// Cursor glyph appended from CURSOR_LEVEL on
pub const CURSOR_GLYPH: char = '█';

/// Default interval between time-driven advance triggers (milliseconds)
pub const DEFAULT_NARRATIVE_TICK_MS: u64 = 8000;

/// Shortest accepted narrative interval; 0 still disables the timer
pub const MIN_NARRATIVE_TICK_MS: u64 = 100;

/// Firings a repeating timer may catch up on within one frame
pub const MAX_TIMER_CATCHUP: usize = 64;

/// Default fade duration for the terminal text block (milliseconds)
pub const DEFAULT_FADE_MS: u64 = 600;

// =============================================================================
// BACKEND
// =============================================================================

/// Shortest accepted password on signup
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
