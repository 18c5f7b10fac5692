//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,

    /// URL pinged by the keep-alive job
    pub keep_alive_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3333".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let keep_alive_url = lookup("KEEP_ALIVE_URL").filter(|url| !url.trim().is_empty());
        if let Some(ref url) = keep_alive_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue("KEEP_ALIVE_URL"));
            }
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            cors_origins,
            keep_alive_url,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Default log filter when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_production() {
            "ledger_desk=info,tower_http=warn"
        } else {
            "ledger_desk=debug,tower_http=debug"
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/ledger")]).unwrap();
        assert_eq!(config.port, 3333);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_max_connections, 10);
        assert!(!config.is_production());
        assert!(config.cors_origins.is_empty());
        assert!(config.keep_alive_url.is_none());
        assert_eq!(config.default_log_filter(), "ledger_desk=debug,tower_http=debug");
    }

    #[test]
    fn test_missing_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("PORT")));
    }

    #[test]
    fn test_production_settings() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://app.example.com, http://localhost:5173,"),
            ("KEEP_ALIVE_URL", "https://api.example.com/health"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert_eq!(
            config.cors_origins,
            vec!["https://app.example.com".to_string(), "http://localhost:5173".to_string()]
        );
        assert_eq!(config.keep_alive_url.as_deref(), Some("https://api.example.com/health"));
        assert_eq!(config.default_log_filter(), "ledger_desk=info,tower_http=warn");
    }

    #[test]
    fn test_keep_alive_url_must_be_http() {
        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("KEEP_ALIVE_URL", "ftp://x")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("KEEP_ALIVE_URL")));
    }
}
