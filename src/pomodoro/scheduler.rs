use serde::Serialize;

use super::session::SessionKind;
use super::settings::Durations;
use super::stats::SessionStats;

/// What the display should show after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub remaining_seconds: u64,
    pub progress: f64,
    pub kind: SessionKind,
}

impl Frame {
    pub fn label(&self) -> &'static str {
        self.kind.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(SessionKind),
    Resumed,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Paused,
    Resumed,
    NotRunning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Not running, or paused. Nothing to show and nothing to schedule.
    Inactive,
    /// The countdown moved on; tick again in a second.
    Counting(Frame),
    /// The session reached zero and was recorded in the stats.
    Completed { frame: Frame, total_seconds: u64 },
}

/// Read-only copy of the scheduler state for stats consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SchedulerSnapshot {
    pub repetition_count: u32,
    pub kind: SessionKind,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub running: bool,
    pub paused: bool,
    pub durations: Durations,
    pub stats: SessionStats,
}

/// Session sequencing and countdown state.
///
/// Purely synchronous: the event loop decides when `tick` is called and
/// what to do with its result. All mutation goes through the methods here.
#[derive(Debug, Clone)]
pub struct SessionScheduler {
    repetition_count: u32,
    kind: SessionKind,
    remaining_seconds: u64,
    total_seconds: u64,
    running: bool,
    paused: bool,
    durations: Durations,
    stats: SessionStats,
}

impl SessionScheduler {
    pub fn new(durations: Durations) -> Self {
        Self {
            repetition_count: 0,
            kind: SessionKind::Idle,
            remaining_seconds: 0,
            total_seconds: 0,
            running: false,
            paused: false,
            durations,
            stats: SessionStats::default(),
        }
    }

    /// Replace the configured durations. A session already under way keeps
    /// the length it started with.
    pub fn configure(&mut self, durations: Durations) {
        self.durations = durations;
    }

    pub fn start(&mut self) -> StartOutcome {
        if self.running && !self.paused {
            return StartOutcome::AlreadyRunning;
        }

        let outcome = if self.running {
            StartOutcome::Resumed
        } else {
            self.repetition_count += 1;
            self.kind = SessionKind::for_repetition(self.repetition_count);
            self.total_seconds = self.durations.seconds_for(self.kind);
            self.remaining_seconds = self.total_seconds;
            StartOutcome::Started(self.kind)
        };

        self.running = true;
        self.paused = false;
        outcome
    }

    pub fn pause_or_resume(&mut self) -> PauseOutcome {
        if !self.running {
            return PauseOutcome::NotRunning;
        }
        self.paused = !self.paused;
        if self.paused {
            PauseOutcome::Paused
        } else {
            PauseOutcome::Resumed
        }
    }

    /// Back to idle. Stats are kept.
    pub fn reset(&mut self) {
        self.repetition_count = 0;
        self.running = false;
        self.paused = false;
        self.remaining_seconds = 0;
        self.total_seconds = 0;
        self.kind = SessionKind::Idle;
    }

    /// One second of countdown.
    ///
    /// The returned frame carries the value shown *before* this tick's
    /// decrement, so a session of `n` seconds shows `n` down to `0`
    /// and completes on the tick that shows `0`.
    pub fn tick(&mut self) -> Tick {
        if !self.running || self.paused {
            return Tick::Inactive;
        }

        let frame = self.frame();
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            return Tick::Counting(frame);
        }

        self.stats.record(self.kind, self.total_seconds);
        self.running = false;
        Tick::Completed {
            frame,
            total_seconds: self.total_seconds,
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            remaining_seconds: self.remaining_seconds,
            progress: self.progress(),
            kind: self.kind,
        }
    }

    /// Fraction of the current session already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let fraction = 1.0 - (self.remaining_seconds as f64 / self.total_seconds as f64);
        fraction.clamp(0.0, 1.0)
    }

    pub fn repetition_count(&self) -> u32 {
        self.repetition_count
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            repetition_count: self.repetition_count,
            kind: self.kind,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            running: self.running,
            paused: self.paused,
            durations: self.durations,
            stats: self.stats,
        }
    }
}

impl Default for SessionScheduler {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}
