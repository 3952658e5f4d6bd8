//! Process configuration, read from the environment once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use mediashelf_infra::StorageConfig;
use mediashelf_observability::{LogFormat, UnknownLogFormat};

pub const ENV_ADDR: &str = "MEDIASHELF_ADDR";
pub const ENV_STORAGE: &str = "MEDIASHELF_STORAGE";
pub const ENV_DATA_FILE: &str = "MEDIASHELF_DATA_FILE";
pub const ENV_DATABASE_URL: &str = "MEDIASHELF_DATABASE_URL";
pub const ENV_LOG_FORMAT: &str = "MEDIASHELF_LOG_FORMAT";

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_DATA_FILE: &str = "library_data.json";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://library.db?mode=rwc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MEDIASHELF_ADDR: invalid listen address {value:?}: {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("MEDIASHELF_STORAGE: unknown storage backend {0:?} (expected \"json\" or \"sqlite\")")]
    UnknownStorage(String),

    #[error("MEDIASHELF_LOG_FORMAT: {0}")]
    LogFormat(#[from] UnknownLogFormat),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub storage: StorageConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (unset and blank values fall back
    /// to defaults).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = get(ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = raw_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr { value: raw_addr.clone(), source })?;

        let storage = match get(ENV_STORAGE).map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("json") => StorageConfig::Json {
                path: PathBuf::from(get(ENV_DATA_FILE).unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())),
            },
            Some("sqlite") => StorageConfig::Sqlite {
                url: get(ENV_DATABASE_URL).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            },
            Some(other) => return Err(ConfigError::UnknownStorage(other.to_string())),
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        Ok(Self { addr, storage, log_format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_use_json_file_on_port_5000() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.storage, StorageConfig::Json { path: PathBuf::from("library_data.json") });
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn sqlite_backend_uses_database_url() {
        let cfg = config(&[(ENV_STORAGE, "SQLite"), (ENV_DATABASE_URL, "sqlite://x.db")]).unwrap();
        assert_eq!(cfg.storage, StorageConfig::Sqlite { url: "sqlite://x.db".into() });
    }

    #[test]
    fn sqlite_backend_has_default_url() {
        let cfg = config(&[(ENV_STORAGE, "sqlite")]).unwrap();
        assert_eq!(cfg.storage, StorageConfig::Sqlite { url: DEFAULT_DATABASE_URL.into() });
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = config(&[(ENV_ADDR, "  "), (ENV_STORAGE, ""), (ENV_DATA_FILE, "")]).unwrap();
        assert_eq!(cfg.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.storage, StorageConfig::Json { path: PathBuf::from(DEFAULT_DATA_FILE) });
    }

    #[test]
    fn custom_address_and_file() {
        let cfg = config(&[(ENV_ADDR, "0.0.0.0:8080"), (ENV_DATA_FILE, "/var/lib/shelf.json")]).unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.storage, StorageConfig::Json { path: PathBuf::from("/var/lib/shelf.json") });
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(config(&[(ENV_ADDR, "nowhere")]), Err(ConfigError::InvalidAddr { .. })));
        assert!(matches!(
            config(&[(ENV_STORAGE, "postgres")]),
            Err(ConfigError::UnknownStorage(s)) if s == "postgres"
        ));
        assert!(matches!(config(&[(ENV_LOG_FORMAT, "xml")]), Err(ConfigError::LogFormat(_))));
    }

    #[test]
    fn pretty_logs_can_be_selected() {
        let cfg = config(&[(ENV_LOG_FORMAT, "pretty")]).unwrap();
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }
}
