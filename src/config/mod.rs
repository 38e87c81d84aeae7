use axum::http::HeaderValue;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

/// Wildcard entry accepted in `allowed_origins`
pub const ANY_ORIGIN: &str = "*";

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origins permitted to call the API. `*` allows every origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![ANY_ORIGIN.to_string()]
}

impl CorsConfig {
    /// True when any origin is allowed (an empty list counts as `*`)
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }

    /// Parse the explicit origins into header values
    pub fn origin_values(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allowed_origins
            .iter()
            .filter(|o| o.as_str() != ANY_ORIGIN)
            .map(|o| {
                HeaderValue::from_str(o.trim()).map_err(|_| ConfigError::InvalidOrigin(o.clone()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.origin_values().map(|_| ())
    }
}

/// Static credential set checked by the placeholder verifier
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
    /// Bearer token handed out on login and accepted by the profile endpoint
    #[serde(default = "default_token")]
    pub token: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
            admin_name: default_admin_name(),
            token: default_token(),
        }
    }
}

fn default_admin_email() -> String {
    "admin@damoang.dev".to_string()
}

fn default_admin_password() -> String {
    "damoang123".to_string()
}

fn default_admin_name() -> String {
    "Damoang Admin".to_string()
}

fn default_token() -> String {
    "damoang-jwt-token-placeholder".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let config: Config = toml::from_str(&content)?;
            config.cors.validate()?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    /// Address the API server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
