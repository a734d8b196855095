use notify_rust::Notification;
use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::pomodoro::{AlertSink, SessionKind};

const NOTIFICATION_SUMMARY: &str = "Stop It - Pomodoro Alert";
const BELL_REPEATS: usize = 3;
const BELL_GAP: Duration = Duration::from_millis(180);

/// Message shown when a session of the given kind has just finished.
pub fn completion_message(completed: SessionKind) -> &'static str {
    match completed {
        SessionKind::Work => "Work session complete! Time for a break.",
        SessionKind::ShortBreak => "Break is over! Back to work.",
        SessionKind::LongBreak => "Long break is over! Starting a fresh cycle.",
        SessionKind::Idle => "Session complete.",
    }
}

fn send_notification(message: &str) -> Result<(), notify_rust::error::Error> {
    Notification::new()
        .summary(NOTIFICATION_SUMMARY)
        .body(message)
        .show()?;
    Ok(())
}

fn ring_bell(out: &mut impl Write) -> std::io::Result<()> {
    for i in 0..BELL_REPEATS {
        out.write_all(b"\x07")?;
        out.flush()?;
        if i + 1 < BELL_REPEATS {
            thread::sleep(BELL_GAP);
        }
    }
    Ok(())
}

/// Desktop notification and terminal bell. Either can be switched off.
#[derive(Debug, Clone, Copy)]
pub struct SystemAlert {
    desktop: bool,
    bell: bool,
}

impl SystemAlert {
    pub fn new(desktop: bool, bell: bool) -> Self {
        Self { desktop, bell }
    }
}

impl AlertSink for SystemAlert {
    fn notify(&self, completed: SessionKind) {
        let message = completion_message(completed);

        if self.desktop {
            if let Err(e) = send_notification(message) {
                tracing::warn!("Failed to send notification: {}", e);
            }
        }

        if self.bell {
            if let Err(e) = ring_bell(&mut std::io::stdout()) {
                tracing::warn!("Failed to ring terminal bell: {}", e);
            }
        }
    }
}
