use serde::Serialize;

use super::session::SessionKind;

/// Totals accumulated since startup. Survive `reset()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub work_sessions_completed: u32,
    pub break_sessions_completed: u32,
    pub total_focus_seconds: u64,
}

impl SessionStats {
    pub(crate) fn record(&mut self, kind: SessionKind, total_seconds: u64) {
        match kind {
            SessionKind::Work => {
                self.work_sessions_completed += 1;
                self.total_focus_seconds += total_seconds;
            }
            SessionKind::ShortBreak | SessionKind::LongBreak => {
                self.break_sessions_completed += 1;
            }
            SessionKind::Idle => {}
        }
    }

    pub fn focus_minutes(&self) -> u64 {
        self.total_focus_seconds / 60
    }
}
