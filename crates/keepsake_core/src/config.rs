//! Engine configuration.
//!
//! # Responsibility
//! - Parse the JSON config file consumed by hosts and the CLI.
//! - Validate provider selection, paths and reminder defaults up front.
//!
//! # Invariants
//! - Missing keys fall back to `EngineConfig::default()`; unknown keys are
//!   rejected.
//! - A validated config always names a known storage provider, and the
//!   SQLite provider always has a database path.

use crate::logging::LogLevel;
use crate::model::reminder::{LeadTime, LeadTimeUnit};
use crate::repo::memory_store::MEMORY_PROVIDER_ID;
use crate::repo::sqlite_store::SQLITE_PROVIDER_ID;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 30;
const MAX_UPCOMING_WINDOW_DAYS: u32 = 366;

/// Runtime configuration for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// `sqlite` or `memory`.
    pub storage_provider: String,
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Lead time used for auto-generated special-date reminders.
    pub default_lead_time: LeadTime,
    pub upcoming_window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_provider: SQLITE_PROVIDER_ID.to_string(),
            database_path: None,
            log_level: None,
            log_dir: None,
            default_lead_time: LeadTime::new(1, LeadTimeUnit::Days)
                .unwrap_or_else(|_| LeadTime::none()),
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
        }
    }
}

/// Config loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    UnknownProvider(String),
    MissingDatabasePath,
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
    WindowOutOfRange(u32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::UnknownProvider(value) => write!(
                f,
                "unknown storage_provider `{value}`; expected {SQLITE_PROVIDER_ID}|{MEMORY_PROVIDER_ID}"
            ),
            Self::MissingDatabasePath => {
                write!(f, "database_path is required for the sqlite provider")
            }
            Self::InvalidLogLevel(value) => write!(f, "unsupported log_level `{value}`"),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be absolute, got `{}`", path.display())
            }
            Self::WindowOutOfRange(days) => write!(
                f,
                "upcoming_window_days {days} exceeds {MAX_UPCOMING_WINDOW_DAYS}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl EngineConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.storage_provider.trim() {
            SQLITE_PROVIDER_ID => {
                if self
                    .database_path
                    .as_ref()
                    .map_or(true, |path| path.as_os_str().is_empty())
                {
                    return Err(ConfigError::MissingDatabasePath);
                }
            }
            MEMORY_PROVIDER_ID => {}
            other => return Err(ConfigError::UnknownProvider(other.to_string())),
        }
        if let Some(level) = &self.log_level {
            if LogLevel::parse(level).is_none() {
                return Err(ConfigError::InvalidLogLevel(level.clone()));
            }
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        if self.upcoming_window_days > MAX_UPCOMING_WINDOW_DAYS {
            return Err(ConfigError::WindowOutOfRange(self.upcoming_window_days));
        }
        Ok(())
    }

    /// Configured level, or the build default.
    pub fn effective_log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .unwrap_or_else(LogLevel::default_for_build)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use crate::logging::LogLevel;
    use crate::model::reminder::LeadTimeUnit;
    use std::path::PathBuf;

    #[test]
    fn memory_config_uses_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"storage_provider":"memory"}"#).expect("valid config");
        assert_eq!(config.upcoming_window_days, 30);
        assert_eq!(config.default_lead_time.magnitude(), 1);
        assert_eq!(config.default_lead_time.unit(), LeadTimeUnit::Days);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn sqlite_requires_database_path() {
        assert!(matches!(
            EngineConfig::from_json_str("{}"),
            Err(ConfigError::MissingDatabasePath)
        ));
        let config = EngineConfig::from_json_str(
            r#"{"database_path":"/tmp/keepsake.db","log_level":"WARN",
                "default_lead_time":{"magnitude":2,"unit":"weeks"}}"#,
        )
        .expect("valid config");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/keepsake.db")));
        assert_eq!(config.effective_log_level(), LogLevel::Warn);
        assert_eq!(config.default_lead_time.unit(), LeadTimeUnit::Weeks);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"storage_provider":"cloud"}"#),
            Err(ConfigError::UnknownProvider(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"storage_provider":"memory","log_dir":"logs"}"#),
            Err(ConfigError::RelativeLogDir(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"storage_provider":"memory","log_level":"loud"}"#),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(
                r#"{"storage_provider":"memory","default_lead_time":{"magnitude":31,"unit":"days"}}"#
            ),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"storage_provider":"memory","colour":"blue"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            EngineConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let present = dir.path().join("keepsake.json");
        std::fs::write(&present, r#"{"storage_provider":"memory","upcoming_window_days":7}"#)
            .expect("write config");
        let config = EngineConfig::load(&present).expect("load config");
        assert_eq!(config.upcoming_window_days, 7);
    }
}
