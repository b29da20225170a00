//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for a single-kiosk deployment.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,

    /// HTTP port.
    pub http_port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// Maximum connections in the database pool.
    pub db_max_connections: u32,

    /// Optional shared bearer token required on write endpoints.
    ///
    /// The reference deployment ran every write endpoint unauthenticated
    /// (kiosk on a closed LAN). Set `KIOSCO_API_TOKEN` to close that gap;
    /// leave it unset to keep the open behavior.
    pub api_token: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            bind_addr: env::var("KIOSCO_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            http_port: env::var("KIOSCO_HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KIOSCO_HTTP_PORT".to_string()))?,

            database_path: env::var("KIOSCO_DATABASE_PATH")
                .unwrap_or_else(|_| "./data/kiosco.db".to_string()),

            db_max_connections: env::var("KIOSCO_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("KIOSCO_DB_MAX_CONNECTIONS".to_string()))?,

            // Empty string counts as unset so `KIOSCO_API_TOKEN= server`
            // doesn't silently require an empty bearer token
            api_token: env::var("KIOSCO_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "KIOSCO_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var driven tests are kept out of here on purpose: cargo runs
    // tests in parallel within one process and env mutation races across
    // tests. The load() defaults are exercised by the integration suite.

    #[test]
    fn test_config_is_cloneable_with_token() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1".to_string(),
            http_port: 8080,
            database_path: ":memory:".to_string(),
            db_max_connections: 1,
            api_token: Some("secret".to_string()),
        };
        let cloned = config.clone();
        assert_eq!(cloned.api_token.as_deref(), Some("secret"));
    }
}
