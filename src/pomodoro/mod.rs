pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sinks;
pub mod stats;

pub use scheduler::{
    Frame, PauseOutcome, SchedulerSnapshot, SessionScheduler, StartOutcome, Tick,
};
pub use session::SessionKind;
pub use settings::{Durations, SettingsError, SettingsSource, SharedSettings};
pub use sinks::{AlertSink, DisplaySink};
pub use stats::SessionStats;
