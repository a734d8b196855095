use regex::Regex;
use std::sync::OnceLock;

use crate::pomodoro::{Durations, SettingsError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Start,
    PauseOrResume,
    Reset,
    /// New durations, already validated.
    Apply(Durations),
    /// `set` with values that did not validate.
    Invalid(SettingsError),
    Stats,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  start  | s                  start the next session (or resume)
  pause  | resume | p         pause or resume the running session
  reset  | r                  stop and go back to idle
  set <work> <short> <long>   apply custom durations in minutes
  stats                       show completed sessions and focus time
  help   | h | ?              show this help
  quit   | q | exit           print statistics and exit";

fn set_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i:set|apply)\s+(\S+)\s+(\S+)\s+(\S+)$").expect("set pattern is valid")
    })
}

/// Parse one line typed on stdin.
pub fn parse_line(line: &str) -> InputCommand {
    let line = line.trim();
    if line.is_empty() {
        return InputCommand::Empty;
    }

    if let Some(captures) = set_pattern().captures(line) {
        return match Durations::parse(&captures[1], &captures[2], &captures[3]) {
            Ok(durations) => InputCommand::Apply(durations),
            Err(e) => InputCommand::Invalid(e),
        };
    }

    match line.to_lowercase().as_str() {
        "start" | "s" => InputCommand::Start,
        "pause" | "resume" | "p" => InputCommand::PauseOrResume,
        "reset" | "r" => InputCommand::Reset,
        "stats" => InputCommand::Stats,
        "help" | "h" | "?" => InputCommand::Help,
        "quit" | "q" | "exit" => InputCommand::Quit,
        _ => InputCommand::Unknown(line.to_string()),
    }
}
