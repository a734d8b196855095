use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::pomodoro::{
    AlertSink, DisplaySink, PauseOutcome, SchedulerSnapshot, SessionKind, SessionScheduler,
    SettingsSource, StartOutcome, Tick,
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const AUTO_ADVANCE_DELAY_DEFAULT: Duration = Duration::from_millis(900);

#[derive(Debug)]
pub enum Command {
    Start,
    PauseOrResume,
    Reset,
    Snapshot(oneshot::Sender<SchedulerSnapshot>),
    Shutdown,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("timer event loop has stopped")]
    Closed,
}

pub type CommandSender = mpsc::UnboundedSender<Command>;
pub type CommandReceiver = mpsc::UnboundedReceiver<Command>;

pub fn create_command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}

/// Cloneable front door to a running [`EventLoop`].
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: CommandSender,
}

impl TimerHandle {
    pub fn new(tx: CommandSender) -> Self {
        Self { tx }
    }

    pub fn start(&self) -> Result<(), DriverError> {
        self.send(Command::Start)
    }

    pub fn pause_or_resume(&self) -> Result<(), DriverError> {
        self.send(Command::PauseOrResume)
    }

    pub fn reset(&self) -> Result<(), DriverError> {
        self.send(Command::Reset)
    }

    pub fn shutdown(&self) -> Result<(), DriverError> {
        self.send(Command::Shutdown)
    }

    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, DriverError> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.send(Command::Snapshot(resp_tx))?;
        resp_rx.await.map_err(|_| DriverError::Closed)
    }

    fn send(&self, command: Command) -> Result<(), DriverError> {
        self.tx.send(command).map_err(|_| DriverError::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Tick,
    AutoAdvance,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    kind: PendingKind,
    deadline: Instant,
}

/// Owns the scheduler and serialises ticks with manual commands.
///
/// At most one timer is outstanding. Scheduling a tick or an auto-advance
/// replaces whatever was pending, and pause/reset clear it, so a stale
/// deadline can never fire against changed state.
pub struct EventLoop {
    scheduler: SessionScheduler,
    display: Arc<dyn DisplaySink>,
    alert: Arc<dyn AlertSink>,
    settings: Arc<dyn SettingsSource>,
    auto_advance_delay: Duration,
    pending: Option<Pending>,
}

impl EventLoop {
    pub fn new(
        display: Arc<dyn DisplaySink>,
        alert: Arc<dyn AlertSink>,
        settings: Arc<dyn SettingsSource>,
    ) -> Self {
        Self {
            scheduler: SessionScheduler::new(settings.durations()),
            display,
            alert,
            settings,
            auto_advance_delay: AUTO_ADVANCE_DELAY_DEFAULT,
            pending: None,
        }
    }

    pub fn with_auto_advance_delay(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    /// Run on the current tokio runtime.
    pub fn spawn(self) -> (TimerHandle, JoinHandle<()>) {
        let (tx, rx) = create_command_channel();
        let task = tokio::spawn(self.run(rx));
        (TimerHandle::new(tx), task)
    }

    pub async fn run(mut self, mut commands: CommandReceiver) {
        tracing::debug!("timer event loop started");

        loop {
            let deadline = self.pending.map(|p| p.deadline);

            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                _ = wait_until(deadline) => self.fire(),
            }
        }

        tracing::debug!("timer event loop stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::PauseOrResume => self.pause_or_resume(),
            Command::Reset => self.reset(),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.scheduler.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn fire(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match pending.kind {
            PendingKind::Tick => self.tick(),
            PendingKind::AutoAdvance => {
                tracing::debug!("auto-advancing to next session");
                self.start();
            }
        }
    }

    fn start(&mut self) {
        self.scheduler.configure(self.settings.durations());

        match self.scheduler.start() {
            StartOutcome::Started(kind) => {
                tracing::info!(
                    session = %kind,
                    repetition = self.scheduler.repetition_count(),
                    seconds = self.scheduler.total_seconds(),
                    "session started"
                );
                self.display.session_started(kind);
                self.tick();
            }
            StartOutcome::Resumed => self.resume(),
            StartOutcome::AlreadyRunning => {
                tracing::debug!("start ignored, session already running");
            }
        }
    }

    fn pause_or_resume(&mut self) {
        match self.scheduler.pause_or_resume() {
            PauseOutcome::Paused => {
                self.pending = None;
                tracing::info!(remaining = self.scheduler.remaining_seconds(), "paused");
            }
            PauseOutcome::Resumed => self.resume(),
            PauseOutcome::NotRunning => {
                tracing::debug!("pause ignored, no session running");
            }
        }
    }

    /// Redraw the held value and wait a full second before the next
    /// decrement, so a pause/resume pair never costs countdown time.
    fn resume(&mut self) {
        tracing::info!(remaining = self.scheduler.remaining_seconds(), "resumed");
        let frame = self.scheduler.frame();
        self.display
            .update(frame.remaining_seconds, frame.progress, frame.label());
        self.schedule(PendingKind::Tick, TICK_INTERVAL);
    }

    fn reset(&mut self) {
        self.pending = None;
        self.scheduler.reset();
        self.display.update(0, 0.0, SessionKind::Idle.as_str());
        tracing::info!("timer reset");
    }

    fn tick(&mut self) {
        match self.scheduler.tick() {
            Tick::Inactive => {
                self.pending = None;
            }
            Tick::Counting(frame) => {
                self.display
                    .update(frame.remaining_seconds, frame.progress, frame.label());
                self.schedule(PendingKind::Tick, TICK_INTERVAL);
            }
            Tick::Completed {
                frame,
                total_seconds,
            } => {
                self.display
                    .update(frame.remaining_seconds, frame.progress, frame.label());
                tracing::info!(
                    session = %frame.kind,
                    seconds = total_seconds,
                    "session complete"
                );
                self.display
                    .session_completed(frame.kind, self.scheduler.stats());
                self.dispatch_alert(frame.kind);
                self.schedule(PendingKind::AutoAdvance, self.auto_advance_delay);
            }
        }
    }

    fn schedule(&mut self, kind: PendingKind, after: Duration) {
        self.pending = Some(Pending {
            kind,
            deadline: Instant::now() + after,
        });
    }

    fn dispatch_alert(&self, completed: SessionKind) {
        let alert = Arc::clone(&self.alert);
        // Detached: the handle is dropped, so neither the result nor a panic
        // in the sink reaches the loop.
        drop(tokio::task::spawn_blocking(move || alert.notify(completed)));
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
