use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub media_dir: PathBuf,
    /// Key used to sign session tokens.
    pub secret_key: String,
    pub session_ttl_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = std::env::var("BLOGICUM_SECRET_KEY")
            .map_err(|_| ConfigError::Missing("BLOGICUM_SECRET_KEY"))?;
        if secret_key.len() < 16 {
            return Err(ConfigError::Invalid(
                "BLOGICUM_SECRET_KEY",
                "must be at least 16 bytes long",
            ));
        }

        let listen_addr = std::env::var("BLOGICUM_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("BLOGICUM_LISTEN_ADDR", "must be a valid socket address")
            })?;

        let database_url = std::env::var("BLOGICUM_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://blogicum.db".to_string());

        let media_dir = std::env::var("BLOGICUM_MEDIA_DIR")
            .unwrap_or_else(|_| "./media".to_string())
            .into();

        let session_ttl_hours = std::env::var("BLOGICUM_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "336".to_string())
            .parse::<i64>()
            .ok()
            .filter(|h| *h > 0)
            .ok_or(ConfigError::Invalid(
                "BLOGICUM_SESSION_TTL_HOURS",
                "must be a positive number of hours",
            ))?;

        Ok(Config {
            listen_addr,
            database_url,
            media_dir,
            secret_key,
            session_ttl_hours,
        })
    }

    /// Create a test configuration.
    pub fn for_testing() -> Self {
        Config {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: "sqlite::memory:".to_string(),
            media_dir: PathBuf::from("./media"),
            secret_key: "test-secret-key-not-for-production".to_string(),
            session_ttl_hours: 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
