//! Server configuration

use std::str::FromStr;

use crate::error::BoxError;

/// Which engine backs the stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageKind::Postgres),
            "memory" | "mem" => Ok(StorageKind::Memory),
            other => Err(format!("unknown STORAGE value: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL (unused with `STORAGE=memory`)
    pub database_url: Option<String>,
    pub storage: StorageKind,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// Daily rolling log files go here when set
    pub log_dir: Option<String>,
    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let storage = match lookup("STORAGE").filter(|s| !s.is_empty()) {
            Some(s) => s.parse::<StorageKind>()?,
            None => StorageKind::Postgres,
        };
        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        if storage == StorageKind::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set".into());
        }

        Ok(Self {
            database_url,
            storage,
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: lookup("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, BoxError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/orders")]).unwrap();
        assert_eq!(config.storage, StorageKind::Postgres);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.db_max_connections, 10);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn test_memory_storage_needs_no_url() {
        let config = config_from(&[("STORAGE", "memory"), ("HTTP_PORT", "9000")]).unwrap();
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.http_port, 9000);
    }

    #[test]
    fn test_unknown_storage_rejected() {
        assert!(config_from(&[("STORAGE", "sqlite")]).is_err());
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[
            ("STORAGE", "memory"),
            ("HTTP_PORT", "not-a-port"),
            ("DB_MAX_CONNECTIONS", "-1"),
            ("LOG_JSON", "TRUE"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.db_max_connections, 10);
        assert!(config.log_json);
    }
}
