//! Core types for Glitchlock

mod sample;
mod metric;
mod unlock;
mod glitch;
mod module;
mod reason;
mod output;
mod account;

pub use sample::{Reading, SensorSample};
pub use metric::{Metric, Plot, PlotPoint, SeverityBand, Unit};
pub use unlock::UnlockState;
pub use glitch::{Directive, GlitchLevel, Trigger, TriggerSource};
pub use module::{ModuleContent, ModuleId, ModuleState, Permission, PermissionKind};
pub use reason::ReasonCode;
pub use output::TickOutput;
pub use account::{GameProgress, PublicUser, User};
