use serde::{Deserialize, Serialize};
use std::fmt;

/// Sessions between two long breaks, counted in repetitions.
pub const LONG_BREAK_EVERY: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
    Idle,
}

impl SessionKind {
    /// Kind of the session that begins at the given repetition.
    ///
    /// Odd repetitions are work, even ones are short breaks, and every
    /// multiple of eight is a long break instead.
    pub fn for_repetition(repetition: u32) -> Self {
        if repetition % LONG_BREAK_EVERY == 0 {
            SessionKind::LongBreak
        } else if repetition % 2 == 0 {
            SessionKind::ShortBreak
        } else {
            SessionKind::Work
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::ShortBreak => "Short Break",
            SessionKind::LongBreak => "Long Break",
            SessionKind::Idle => "Idle",
        }
    }

    pub(crate) fn emoji(&self) -> &'static str {
        match self {
            SessionKind::Work => "💼",
            SessionKind::ShortBreak => "☕",
            SessionKind::LongBreak => "🌴",
            SessionKind::Idle => "🍅",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, SessionKind::ShortBreak | SessionKind::LongBreak)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
