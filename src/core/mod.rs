//! Core modules for Glitchlock

pub mod buffer;
pub mod deriver;
pub mod unlock;
pub mod pipeline;
pub mod narrative;
pub mod navigator;
pub mod animation;
pub mod trigger;
pub mod screen;
pub mod api;

pub use buffer::SampleBuffer;
pub use deriver::{MetricDeriver, plot_height};
pub use unlock::UnlockEvaluator;
pub use pipeline::SensorPipeline;
pub use narrative::{NarrativeEngine, NarrativeOutput, reduce};
pub use navigator::{ModuleNavigator, NavOutcome};
pub use animation::{AnimationPhase, Interpolation, TimerId, TimerSet};
pub use trigger::TriggerParser;
pub use screen::{PuzzleScreen, SensorView};
pub use api::{create_router, run_server};
