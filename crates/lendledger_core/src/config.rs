//! Runtime configuration for a ledger process.
//!
//! Values come from `LENDLEDGER_*` environment variables; anything unset or
//! blank falls back to the defaults below.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "LENDLEDGER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "LENDLEDGER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LENDLEDGER_LOG_DIR";
pub const ENV_NOTICE_RECIPIENT: &str = "LENDLEDGER_NOTICE_RECIPIENT";
pub const ENV_NOTICE_SENDER: &str = "LENDLEDGER_NOTICE_SENDER";

pub const DEFAULT_DB_FILE_NAME: &str = "lendledger.sqlite3";
pub const DEFAULT_NOTICE_RECIPIENT: &str = "staff";
pub const DEFAULT_NOTICE_SENDER: &str = "noreply@library.local";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => {
                write!(f, "{ENV_LOG_LEVEL} has unsupported value `{value}`")
            }
            Self::RelativeLogDir(path) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// SQLite file holding the ledger.
    pub db_path: PathBuf,
    /// Normalized log level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Rolling log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Recipient of staff overdue summaries.
    pub notice_recipient: String,
    /// `From` address used by the email stub sink.
    pub notice_sender: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            notice_recipient: DEFAULT_NOTICE_RECIPIENT.to_string(),
            notice_sender: DEFAULT_NOTICE_SENDER.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Loads configuration from `(name, value)` pairs. Unknown names are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (name, value) in vars {
            let value: String = value.into();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match name.as_ref() {
                ENV_DB_PATH => config.db_path = PathBuf::from(value),
                ENV_LOG_LEVEL => {
                    config.log_level = normalize_level(value).map_err(|err| match err {
                        LoggingError::UnsupportedLevel(level) => ConfigError::InvalidLogLevel(level),
                        other => ConfigError::InvalidLogLevel(other.to_string()),
                    })?;
                }
                ENV_LOG_DIR => {
                    let dir = PathBuf::from(value);
                    if !dir.is_absolute() {
                        return Err(ConfigError::RelativeLogDir(dir));
                    }
                    config.log_dir = Some(dir);
                }
                ENV_NOTICE_RECIPIENT => config.notice_recipient = value.to_string(),
                ENV_NOTICE_SENDER => config.notice_sender = value.to_string(),
                _ => {}
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_yields_defaults() {
        let config = LedgerConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn recognized_variables_override_defaults() {
        let config = LedgerConfig::from_vars([
            (ENV_DB_PATH, "/var/lib/ledger/main.db"),
            (ENV_LOG_LEVEL, " Warning "),
            (ENV_LOG_DIR, "/var/log/ledger"),
            (ENV_NOTICE_RECIPIENT, "desk@library.local"),
            (ENV_NOTICE_SENDER, "ledger@library.local"),
            ("PATH", "/usr/bin"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/ledger/main.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/ledger")));
        assert_eq!(config.notice_recipient, "desk@library.local");
        assert_eq!(config.notice_sender, "ledger@library.local");
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = LedgerConfig::from_vars([(ENV_DB_PATH, "   ")]).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let level = LedgerConfig::from_vars([(ENV_LOG_LEVEL, "chatty")]).unwrap_err();
        assert_eq!(level, ConfigError::InvalidLogLevel("chatty".to_string()));

        let dir = LedgerConfig::from_vars([(ENV_LOG_DIR, "logs")]).unwrap_err();
        assert_eq!(dir, ConfigError::RelativeLogDir(PathBuf::from("logs")));
    }
}
