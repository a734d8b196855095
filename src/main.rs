use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use stop_it::alert::SystemAlert;
use stop_it::config::Config;
use stop_it::driver::{EventLoop, TimerHandle};
use stop_it::logging::init_logging;
use stop_it::pomodoro::{Durations, SchedulerSnapshot, SharedSettings};
use stop_it::terminal::{HELP, InputCommand, TerminalDisplay, format_mmss, parse_line, stats_line};

#[derive(Debug, Parser)]
#[command(name = "stop_it", version, about = "Terminal Pomodoro timer")]
struct Cli {
    /// Work session length in minutes
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    work: Option<u32>,

    /// Short break length in minutes
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    short_break: Option<u32>,

    /// Long break length in minutes
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    long_break: Option<u32>,

    /// Delay before the next session starts on its own, in milliseconds
    #[arg(long)]
    auto_advance_ms: Option<u64>,

    /// Config file (defaults to <config dir>/stop_it/config.toml)
    #[arg(short, long, env = "STOP_IT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable desktop notifications
    #[arg(long)]
    no_notify: bool,

    /// Disable the terminal bell
    #[arg(long)]
    no_bell: bool,

    /// Start the first work session right away
    #[arg(long)]
    autostart: bool,

    /// Print final statistics as JSON
    #[arg(long)]
    json: bool,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into the file configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(work) = self.work {
            config.timer.work_minutes = work;
        }
        if let Some(short_break) = self.short_break {
            config.timer.short_break_minutes = short_break;
        }
        if let Some(long_break) = self.long_break {
            config.timer.long_break_minutes = long_break;
        }
        if let Some(ms) = self.auto_advance_ms {
            config.timer.auto_advance_ms = ms;
        }
        if self.no_notify {
            config.alert.desktop_notification = false;
        }
        if self.no_bell {
            config.alert.bell = false;
        }
        if let Some(ref level) = self.log_level {
            config.log.level = level.clone();
        }
        if let Some(ref file) = self.log_file {
            config.log.file = Some(file.clone());
        }
    }
}

fn print_banner(durations: &Durations, auto_advance: Duration) {
    println!("🍅 Stop It - Pomodoro Timer");
    println!("======================================================");
    println!(
        "Pomodoro settings: {}min work / {}min short break / {}min long break",
        durations.work_minutes(),
        durations.short_break_minutes(),
        durations.long_break_minutes()
    );
    println!("Next session starts {}ms after the previous one ends", auto_advance.as_millis());
    println!("Type 'help' for commands. Press Ctrl+C to stop and see stats\n");
}

fn print_summary(snapshot: &SchedulerSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }
    println!("\n--- Session Statistics ---");
    println!("{}", stats_line(&snapshot.stats));
    println!(
        "Current: {} {} (repetition {})",
        snapshot.kind,
        format_mmss(snapshot.remaining_seconds),
        snapshot.repetition_count
    );
    println!("------------------------\n");
    Ok(())
}

/// Handle one line from stdin. Returns false when the user asked to quit.
async fn dispatch(
    command: InputCommand,
    timer: &TimerHandle,
    settings: &SharedSettings,
) -> anyhow::Result<bool> {
    match command {
        InputCommand::Start => timer.start()?,
        InputCommand::PauseOrResume => timer.pause_or_resume()?,
        InputCommand::Reset => timer.reset()?,
        InputCommand::Apply(durations) => {
            settings.apply(durations);
            println!(
                "\nCustom times applied: {}/{}/{} min (from the next session)",
                durations.work_minutes(),
                durations.short_break_minutes(),
                durations.long_break_minutes()
            );
        }
        InputCommand::Invalid(e) => println!("\n{}", e),
        InputCommand::Stats => {
            let snapshot = timer.snapshot().await?;
            println!("\n{}", stats_line(&snapshot.stats));
        }
        InputCommand::Help => println!("\n{}", HELP),
        InputCommand::Quit => return Ok(false),
        InputCommand::Empty => {}
        InputCommand::Unknown(line) => println!("\nUnknown command '{}'. Type 'help'.", line),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_to(&mut config);

    init_logging(&config.log.level, config.log.file.as_deref())
        .context("setting up logging")?;

    let durations = config
        .timer
        .durations()
        .context("validating timer durations")?;
    let auto_advance = config.timer.auto_advance_delay();
    tracing::debug!(?config, "configuration loaded");

    print_banner(&durations, auto_advance);

    let settings = SharedSettings::new(durations);
    let display = Arc::new(TerminalDisplay::stdout());
    let alert = Arc::new(SystemAlert::new(
        config.alert.desktop_notification,
        config.alert.bell,
    ));

    let (timer, event_loop) = EventLoop::new(display, alert, Arc::new(settings.clone()))
        .with_auto_advance_delay(auto_advance)
        .spawn();

    if cli.autostart {
        timer.start()?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    other => {
                        if let Err(e) = other {
                            tracing::warn!("failed to read stdin: {}", e);
                        }
                        // No more input; keep the timer running until Ctrl+C
                        (&mut shutdown).await.context("waiting for Ctrl+C")?;
                        break;
                    }
                };
                if !dispatch(parse_line(&line), &timer, &settings).await? {
                    break;
                }
            }
            result = &mut shutdown => {
                result.context("listening for Ctrl+C")?;
                break;
            }
        }
    }

    let snapshot = timer.snapshot().await?;
    timer.shutdown()?;
    if let Err(e) = event_loop.await {
        tracing::warn!("event loop ended abnormally: {}", e);
    }

    print_summary(&snapshot, cli.json)
}
