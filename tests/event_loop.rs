use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use stop_it::driver::{DriverError, EventLoop, TimerHandle};
use stop_it::pomodoro::{AlertSink, DisplaySink, Durations, SessionKind, SharedSettings};

#[derive(Default)]
struct RecordingDisplay {
    frames: Mutex<Vec<(u64, String)>>,
    started: Mutex<Vec<SessionKind>>,
}

impl RecordingDisplay {
    fn last_frame(&self) -> Option<(u64, String)> {
        self.frames.lock().unwrap().last().cloned()
    }

    fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl DisplaySink for RecordingDisplay {
    fn update(&self, remaining_seconds: u64, _progress: f64, session_label: &str) {
        self.frames
            .lock()
            .unwrap()
            .push((remaining_seconds, session_label.to_string()));
    }

    fn session_started(&self, kind: SessionKind) {
        self.started.lock().unwrap().push(kind);
    }
}

struct ChannelAlert(mpsc::UnboundedSender<SessionKind>);

impl AlertSink for ChannelAlert {
    fn notify(&self, completed: SessionKind) {
        let _ = self.0.send(completed);
    }
}

struct PanickingAlert;

impl AlertSink for PanickingAlert {
    fn notify(&self, _completed: SessionKind) {
        panic!("no sound device");
    }
}

struct Harness {
    timer: TimerHandle,
    display: Arc<RecordingDisplay>,
    alerts: mpsc::UnboundedReceiver<SessionKind>,
    settings: SharedSettings,
}

fn spawn_one_minute_sessions() -> Harness {
    let display = Arc::new(RecordingDisplay::default());
    let (alert_tx, alerts) = mpsc::unbounded_channel();
    let settings = SharedSettings::new(Durations::new(1, 1, 1).unwrap());

    let (timer, _task) = EventLoop::new(
        display.clone(),
        Arc::new(ChannelAlert(alert_tx)),
        Arc::new(settings.clone()),
    )
    .with_auto_advance_delay(Duration::from_millis(900))
    .spawn();

    Harness {
        timer,
        display,
        alerts,
        settings,
    }
}

#[tokio::test(start_paused = true)]
async fn eight_sessions_complete_a_full_cycle() {
    let mut h = spawn_one_minute_sessions();
    h.timer.start().unwrap();

    let mut completed = Vec::new();
    for _ in 0..8 {
        completed.push(h.alerts.recv().await.unwrap());
    }

    assert_eq!(
        completed,
        vec![
            SessionKind::Work,
            SessionKind::ShortBreak,
            SessionKind::Work,
            SessionKind::ShortBreak,
            SessionKind::Work,
            SessionKind::ShortBreak,
            SessionKind::Work,
            SessionKind::LongBreak,
        ]
    );

    let snapshot = h.timer.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.work_sessions_completed, 4);
    assert_eq!(snapshot.stats.break_sessions_completed, 4);
    assert_eq!(snapshot.stats.total_focus_seconds, 240);
}

#[tokio::test(start_paused = true)]
async fn countdown_advances_once_per_second() {
    let h = spawn_one_minute_sessions();
    h.timer.start().unwrap();

    tokio::time::sleep(Duration::from_millis(10_500)).await;

    let snapshot = h.timer.snapshot().await.unwrap();
    assert_eq!(snapshot.kind, SessionKind::Work);
    assert_eq!(snapshot.total_seconds, 60);
    assert_eq!(snapshot.remaining_seconds, 49);
    assert_eq!(h.display.last_frame(), Some((50, "Work".to_string())));
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_countdown() {
    let h = spawn_one_minute_sessions();
    h.timer.start().unwrap();
    tokio::time::sleep(Duration::from_millis(5_500)).await;

    h.timer.pause_or_resume().unwrap();
    let paused = h.timer.snapshot().await.unwrap();
    assert!(paused.paused);
    let frames = h.display.frame_count();

    tokio::time::sleep(Duration::from_secs(120)).await;
    let still_paused = h.timer.snapshot().await.unwrap();
    assert_eq!(still_paused.remaining_seconds, paused.remaining_seconds);
    assert_eq!(h.display.frame_count(), frames);

    h.timer.pause_or_resume().unwrap();
    let resumed = h.timer.snapshot().await.unwrap();
    assert!(resumed.running);
    assert!(!resumed.paused);
    assert_eq!(resumed.remaining_seconds, paused.remaining_seconds);
    assert_eq!(
        h.display.last_frame(),
        Some((paused.remaining_seconds, "Work".to_string()))
    );

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let ticking = h.timer.snapshot().await.unwrap();
    assert_eq!(ticking.remaining_seconds, paused.remaining_seconds - 1);
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_without_a_tick_keeps_time() {
    let h = spawn_one_minute_sessions();
    h.timer.start().unwrap();
    let started = h.timer.snapshot().await.unwrap();

    h.timer.pause_or_resume().unwrap();
    h.timer.pause_or_resume().unwrap();
    let after = h.timer.snapshot().await.unwrap();

    assert_eq!(after.remaining_seconds, started.remaining_seconds);
    assert_eq!(after.total_seconds, 60);
    assert!(after.running);
    assert!(!after.paused);
}

#[tokio::test(start_paused = true)]
async fn reset_mid_countdown_restarts_rotation() {
    let h = spawn_one_minute_sessions();
    h.timer.start().unwrap();
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    h.timer.reset().unwrap();
    let reset = h.timer.snapshot().await.unwrap();
    assert_eq!(reset.kind, SessionKind::Idle);
    assert_eq!(reset.repetition_count, 0);
    assert_eq!(reset.remaining_seconds, 0);
    assert_eq!(reset.total_seconds, 0);
    assert_eq!(h.display.last_frame(), Some((0, "Idle".to_string())));

    // No stale tick fires after the reset
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.display.last_frame(), Some((0, "Idle".to_string())));

    h.timer.start().unwrap();
    let restarted = h.timer.snapshot().await.unwrap();
    assert_eq!(restarted.repetition_count, 1);
    assert_eq!(restarted.kind, SessionKind::Work);
}

#[tokio::test(start_paused = true)]
async fn reset_during_grace_delay_cancels_auto_advance() {
    let mut h = spawn_one_minute_sessions();
    h.timer.start().unwrap();

    assert_eq!(h.alerts.recv().await, Some(SessionKind::Work));
    h.timer.reset().unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let snapshot = h.timer.snapshot().await.unwrap();
    assert!(!snapshot.running);
    assert_eq!(snapshot.kind, SessionKind::Idle);
    assert_eq!(snapshot.stats.work_sessions_completed, 1);
    assert_eq!(*h.display.started.lock().unwrap(), vec![SessionKind::Work]);
}

#[tokio::test(start_paused = true)]
async fn double_start_counts_one_repetition() {
    let h = spawn_one_minute_sessions();
    h.timer.start().unwrap();
    h.timer.start().unwrap();

    let snapshot = h.timer.snapshot().await.unwrap();
    assert_eq!(snapshot.repetition_count, 1);
    assert_eq!(h.display.frame_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn new_durations_apply_from_next_session() {
    let mut h = spawn_one_minute_sessions();
    h.timer.start().unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    h.settings.apply(Durations::new(1, 2, 3).unwrap());
    let running = h.timer.snapshot().await.unwrap();
    assert_eq!(running.total_seconds, 60);

    assert_eq!(h.alerts.recv().await, Some(SessionKind::Work));
    tokio::time::sleep(Duration::from_secs(1)).await;

    let next = h.timer.snapshot().await.unwrap();
    assert_eq!(next.kind, SessionKind::ShortBreak);
    assert_eq!(next.total_seconds, 120);
}

#[tokio::test(start_paused = true)]
async fn failing_alert_does_not_stop_the_timer() {
    let display = Arc::new(RecordingDisplay::default());
    let settings = SharedSettings::new(Durations::new(1, 1, 1).unwrap());
    let (timer, _task) = EventLoop::new(
        display.clone(),
        Arc::new(PanickingAlert),
        Arc::new(settings),
    )
    .spawn();

    timer.start().unwrap();
    tokio::time::sleep(Duration::from_secs(62)).await;

    let snapshot = timer.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.work_sessions_completed, 1);
    assert_eq!(snapshot.kind, SessionKind::ShortBreak);
    assert!(snapshot.running);
}

#[tokio::test]
async fn handle_reports_closed_loop() {
    let h = spawn_one_minute_sessions();
    h.timer.shutdown().unwrap();

    assert!(matches!(
        h.timer.snapshot().await,
        Err(DriverError::Closed)
    ));
}
