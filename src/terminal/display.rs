use chrono::Local;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::pomodoro::{DisplaySink, SessionKind, SessionStats};

const PROGRESS_BAR_WIDTH: usize = 20;

/// Format seconds as zero-padded `MM:SS`.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

pub fn stats_line(stats: &SessionStats) -> String {
    format!(
        "Work: {}  Breaks: {}  Focus min: {}",
        stats.work_sessions_completed,
        stats.break_sessions_completed,
        stats.focus_minutes()
    )
}

fn countdown_line(remaining_seconds: u64, progress: f64, session_label: &str) -> String {
    format!(
        "{:<12} {} {} {:>3}%",
        session_label,
        format_mmss(remaining_seconds),
        render_progress_bar(progress, PROGRESS_BAR_WIDTH),
        (progress * 100.0).round() as u64
    )
}

/// Redraws a single status line in place on any writer (stdout by default).
pub struct TerminalDisplay<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl TerminalDisplay {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::debug!("display write failed: {}", e);
        }
    }
}

impl<W: Write + Send> DisplaySink for TerminalDisplay<W> {
    fn update(&self, remaining_seconds: u64, progress: f64, session_label: &str) {
        // \x1b[K clears what a longer previous line left behind
        self.write(&format!(
            "\r{}\x1b[K",
            countdown_line(remaining_seconds, progress, session_label)
        ));
    }

    fn session_started(&self, kind: SessionKind) {
        self.write(&format!(
            "\n{} [{}] {} started\n",
            kind.emoji(),
            Local::now().format("%H:%M:%S"),
            kind
        ));
    }

    fn session_completed(&self, kind: SessionKind, stats: &SessionStats) {
        self.write(&format!(
            "\n🔔 [{}] {} complete. {}\n",
            Local::now().format("%H:%M:%S"),
            kind,
            stats_line(stats)
        ));
    }
}
