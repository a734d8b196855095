pub mod app_config;

pub use app_config::{AlertConfig, Config, ConfigError, LogConfig, TimerConfig};
