use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::interval::{RestInterval, DEFAULT_MINUTES};

/// Environment variable that switches the app into development mode.
pub const MODE_ENV_VAR: &str = "REST_REMINDER_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Development,
    Production,
}

impl ExecutionMode {
    pub fn detect() -> Self {
        Self::from_env_value(std::env::var(MODE_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("development") => ExecutionMode::Development,
            _ => ExecutionMode::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, ExecutionMode::Development)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minutes between two rest prompts at startup
    pub interval_minutes: u32,

    /// Register the app as a login item on startup (production only)
    pub launch_at_login: bool,

    /// Ask the OS to start the app hidden when launched at login
    pub open_as_hidden: bool,

    /// Post a desktop notification when a rest starts
    pub enable_notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_MINUTES,
            launch_at_login: true,
            open_as_hidden: true,
            enable_notifications: false,
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".config/rest-reminder"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Reads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.interval()?;
        Ok(())
    }

    pub fn interval(&self) -> Result<RestInterval> {
        RestInterval::from_minutes(i64::from(self.interval_minutes))
            .context("interval_minutes must be between 1 and 1440")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.interval_minutes, 45);
        assert!(config.launch_at_login);
        assert!(!config.enable_notifications);
    }

    #[test]
    fn partial_file_falls_back_to_defaults_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "interval_minutes = 30\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.interval_minutes, 30);
        assert!(config.open_as_hidden);
        assert_eq!(config.interval().unwrap().display_minutes(), 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "interval_minutes = \"soon\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_interval() {
        let zero = Config {
            interval_minutes: 0,
            ..Config::default()
        };
        let too_long = Config {
            interval_minutes: 1441,
            ..Config::default()
        };

        assert!(zero.validate().is_err());
        assert!(too_long.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn execution_mode_only_switches_on_development() {
        assert_eq!(
            ExecutionMode::from_env_value(Some("development")),
            ExecutionMode::Development
        );
        assert_eq!(
            ExecutionMode::from_env_value(Some(" Development ")),
            ExecutionMode::Development
        );
        assert_eq!(
            ExecutionMode::from_env_value(Some("production")),
            ExecutionMode::Production
        );
        assert_eq!(ExecutionMode::from_env_value(None), ExecutionMode::Production);
    }
}
