//! Server configuration.

use std::{env, path::PathBuf};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Path of the JSON file holding the user collection.
    pub data_path: PathBuf,
    /// Shared secret every request must present in the `token` header.
    pub api_token: String,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Creates a configuration with default network settings.
    pub fn new(api_token: impl Into<String>, data_path: impl Into<PathBuf>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_path: data_path.into(),
            api_token: api_token.into(),
            log_level: "info".to_string(),
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_token = env::var("USERS_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow::anyhow!("USERS_API_TOKEN is required"))?;

        Ok(Self {
            host: env::var("USERS_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("USERS_SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_path: env::var("USERS_DATA_PATH")
                .unwrap_or_else(|_| "users.json".to_string())
                .into(),
            api_token,
            log_level: env::var("USERS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
