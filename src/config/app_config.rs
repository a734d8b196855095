use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::pomodoro::settings::{
    Durations, LONG_BREAK_MINUTES_DEFAULT, SHORT_BREAK_MINUTES_DEFAULT, SettingsError,
    WORK_MINUTES_DEFAULT,
};

pub const AUTO_ADVANCE_MS_DEFAULT: u64 = 900;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid timer settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timer: TimerConfig,
    pub alert: AlertConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Grace period between a finished session and the next one.
    pub auto_advance_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: WORK_MINUTES_DEFAULT,
            short_break_minutes: SHORT_BREAK_MINUTES_DEFAULT,
            long_break_minutes: LONG_BREAK_MINUTES_DEFAULT,
            auto_advance_ms: AUTO_ADVANCE_MS_DEFAULT,
        }
    }
}

impl TimerConfig {
    pub fn durations(&self) -> Result<Durations, SettingsError> {
        Durations::new(
            self.work_minutes,
            self.short_break_minutes,
            self.long_break_minutes,
        )
    }

    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub desktop_notification: bool,
    pub bell: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            desktop_notification: true,
            bell: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// `<config dir>/stop_it/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stop_it").join("config.toml"))
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.timer.durations()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load an explicit path, or the default path if it exists, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timer.work_minutes, 25);
        assert_eq!(config.timer.short_break_minutes, 5);
        assert_eq!(config.timer.long_break_minutes, 20);
        assert_eq!(config.timer.auto_advance_delay(), Duration::from_millis(900));
        assert!(config.alert.desktop_notification);
        assert!(config.alert.bell);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            "[timer]\nwork_minutes = 50\n\n[alert]\nbell = false\n",
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(config.timer.work_minutes, 50);
        assert_eq!(config.timer.short_break_minutes, 5);
        assert!(!config.alert.bell);
        assert!(config.alert.desktop_notification);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = Config::from_toml("[timer]\nlong_break_minutes = 0\n", Path::new("c.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn test_bad_toml_rejected() {
        let err = Config::from_toml("[timer\n", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timer]\nauto_advance_ms = 0\n[log]\nlevel = \"debug\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.timer.auto_advance_ms, 0);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
