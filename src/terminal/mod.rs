pub mod display;
pub mod input;

pub use display::{TerminalDisplay, format_mmss, render_progress_bar, stats_line};
pub use input::{HELP, InputCommand, parse_line};
