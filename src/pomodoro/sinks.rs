use super::session::SessionKind;
use super::stats::SessionStats;

/// Receives countdown frames. Called from the event loop, so it must be quick.
pub trait DisplaySink: Send + Sync {
    /// `progress` is in `[0, 1]`; a reset sends `(0, 0.0, "Idle")`.
    fn update(&self, remaining_seconds: u64, progress: f64, session_label: &str);

    fn session_started(&self, _kind: SessionKind) {}

    fn session_completed(&self, _kind: SessionKind, _stats: &SessionStats) {}
}

/// Best-effort notification that a session finished.
///
/// Runs on a blocking worker and its outcome is never observed, so
/// implementations swallow their own failures.
pub trait AlertSink: Send + Sync {
    fn notify(&self, completed: SessionKind);
}
