//! stop_it: a terminal Pomodoro timer.
//!
//! [`pomodoro::SessionScheduler`] is the session state machine,
//! [`driver::EventLoop`] runs it against a one-second tick on tokio, and the
//! `terminal` and `alert` modules are the collaborators it reports to.

pub mod alert;
pub mod config;
pub mod driver;
pub mod logging;
pub mod pomodoro;
pub mod terminal;
