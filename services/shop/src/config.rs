//! Service settings
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`shop.toml`, or the path in `SHOP_CONFIG`), then `SHOP__`-prefixed
//! environment variables using `__` between nested keys.

use std::path::PathBuf;

use common::database::DatabaseConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::Furniture;

/// Environment variable holding an alternative settings file path
pub const CONFIG_PATH_ENV: &str = "SHOP_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "shop";

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for `/` and any path without a handler
    pub static_dir: PathBuf,
    /// Upper bound on the time spent handling one request
    pub request_timeout_secs: u64,
    /// Origins allowed to make cross-origin requests
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("static"),
            request_timeout_secs: 30,
            cors_origins: vec!["http://localhost:8080".to_string()],
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Replaces the built-in furniture catalog when set
    pub catalog: Option<Vec<Furniture>>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("SHOP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
