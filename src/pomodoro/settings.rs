use serde::Serialize;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use super::session::SessionKind;

pub const WORK_MINUTES_DEFAULT: u32 = 25;
pub const SHORT_BREAK_MINUTES_DEFAULT: u32 = 5;
pub const LONG_BREAK_MINUTES_DEFAULT: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid {field} duration '{value}': enter positive integers")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} duration must be a positive number of minutes")]
    NotPositive { field: &'static str },
}

/// Configured session lengths in minutes. Every value is at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Durations {
    work_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
}

impl Durations {
    pub fn new(work: u32, short_break: u32, long_break: u32) -> Result<Self, SettingsError> {
        Ok(Self {
            work_minutes: positive("work", work)?,
            short_break_minutes: positive("short break", short_break)?,
            long_break_minutes: positive("long break", long_break)?,
        })
    }

    /// Parse the three values as typed by the user.
    pub fn parse(work: &str, short_break: &str, long_break: &str) -> Result<Self, SettingsError> {
        Ok(Self {
            work_minutes: parse_minutes("work", work)?,
            short_break_minutes: parse_minutes("short break", short_break)?,
            long_break_minutes: parse_minutes("long break", long_break)?,
        })
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }

    pub fn minutes_for(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.work_minutes,
            SessionKind::ShortBreak => self.short_break_minutes,
            SessionKind::LongBreak => self.long_break_minutes,
            SessionKind::Idle => 0,
        }
    }

    pub fn seconds_for(&self, kind: SessionKind) -> u64 {
        u64::from(self.minutes_for(kind)) * 60
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_minutes: WORK_MINUTES_DEFAULT,
            short_break_minutes: SHORT_BREAK_MINUTES_DEFAULT,
            long_break_minutes: LONG_BREAK_MINUTES_DEFAULT,
        }
    }
}

fn positive(field: &'static str, minutes: u32) -> Result<u32, SettingsError> {
    if minutes == 0 {
        return Err(SettingsError::NotPositive { field });
    }
    Ok(minutes)
}

fn parse_minutes(field: &'static str, raw: &str) -> Result<u32, SettingsError> {
    let trimmed = raw.trim();
    // Signed so "-5" is reported as non-positive
    let value: i64 = trimmed.parse().map_err(|_| SettingsError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    if value <= 0 {
        return Err(SettingsError::NotPositive { field });
    }
    u32::try_from(value).map_err(|_| SettingsError::NotANumber {
        field,
        value: trimmed.to_string(),
    })
}

/// Where the scheduler reads its durations from when a session starts.
pub trait SettingsSource: Send + Sync {
    fn durations(&self) -> Durations;
}

/// Durations shared between the input side and the event loop.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Durations>>,
}

impl SharedSettings {
    pub fn new(durations: Durations) -> Self {
        Self {
            inner: Arc::new(RwLock::new(durations)),
        }
    }

    pub fn apply(&self, durations: Durations) {
        match self.inner.write() {
            Ok(mut guard) => *guard = durations,
            Err(poisoned) => *poisoned.into_inner() = durations,
        }
        tracing::info!(
            work = durations.work_minutes(),
            short_break = durations.short_break_minutes(),
            long_break = durations.long_break_minutes(),
            "custom times applied"
        );
    }
}

impl SettingsSource for SharedSettings {
    fn durations(&self) -> Durations {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
