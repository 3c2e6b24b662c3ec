use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use content_store::ContentStoreConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address for the HTTP server to listen on
    pub listen_addr: SocketAddr,

    /// Path to the sqlite database; if not set an in-memory database
    /// will be used (nothing survives a restart)
    pub sqlite_path: Option<PathBuf>,

    /// Content storage backend configuration
    pub content_store: ContentStoreConfig,

    /// Salt mixed into password hashes
    pub password_salt: String,

    /// How long minted session tokens stay valid
    pub session_ttl: Duration,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

/// On-disk configuration file (toml). Every field is optional; CLI
/// flags override whatever the file sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub listen_addr: Option<SocketAddr>,
    pub sqlite_path: Option<PathBuf>,
    pub content_store: Option<ContentStoreConfig>,
    pub password_salt: Option<String>,
    pub session_ttl_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// CLI-provided overrides, applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen_addr: Option<SocketAddr>,
    pub sqlite_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn build(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let listen_addr = overrides
            .listen_addr
            .or(file.listen_addr)
            .unwrap_or_else(|| {
                SocketAddr::from_str(DEFAULT_LISTEN_ADDR)
                    .unwrap_or_else(|_| ([0, 0, 0, 0], 8080).into())
            });

        let log_level = match overrides.log_level.or(file.log_level) {
            Some(raw) => tracing::Level::from_str(&raw)
                .map_err(|_| ConfigError::InvalidLogLevel(raw))?,
            None => tracing::Level::INFO,
        };

        let password_salt = file
            .password_salt
            .ok_or(ConfigError::MissingPasswordSalt)?;

        Ok(Config {
            listen_addr,
            sqlite_path: overrides.sqlite_path.or(file.sqlite_path),
            content_store: file.content_store.unwrap_or_default(),
            password_salt,
            session_ttl: Duration::from_secs(
                file.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ),
            log_level,
            log_dir: file.log_dir,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("password_salt must be set in the config file")]
    MissingPasswordSalt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_resolves_with_defaults() {
        let file: FileConfig = toml::from_str(r#"password_salt = "s3cret-salt""#).unwrap();
        let config = Config::build(file, Overrides::default()).unwrap();

        assert_eq!(config.listen_addr.port(), 8080);
        assert!(config.sqlite_path.is_none());
        assert!(matches!(config.content_store, ContentStoreConfig::Inline));
        assert_eq!(config.session_ttl, Duration::from_secs(43_200));
        assert_eq!(config.log_level, tracing::Level::INFO);
    }

    #[test]
    fn missing_salt_is_an_error() {
        let err = Config::build(FileConfig::default(), Overrides::default());
        assert!(matches!(err, Err(ConfigError::MissingPasswordSalt)));
    }

    #[test]
    fn overrides_win_over_file() {
        let file: FileConfig = toml::from_str(
            r#"
            password_salt = "s3cret-salt"
            listen_addr = "127.0.0.1:9000"
            log_level = "debug"

            [content_store]
            type = "memory"
            "#,
        )
        .unwrap();

        let overrides = Overrides {
            listen_addr: Some(SocketAddr::from_str("127.0.0.1:9999").unwrap()),
            sqlite_path: Some(PathBuf::from("/tmp/arkiv.db")),
            log_level: None,
        };
        let config = Config::build(file, overrides).unwrap();

        assert_eq!(config.listen_addr.port(), 9999);
        assert_eq!(config.sqlite_path.as_deref(), Some(Path::new("/tmp/arkiv.db")));
        assert!(matches!(config.content_store, ContentStoreConfig::Memory));
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }
}
