//! Configuration for the registration backend.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// CSV export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Admin authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of a built front-end to serve for unmatched paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON record file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, records are in-memory only)
    #[serde(default = "default_true")]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory for temporary CSV files
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Admin username
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Admin password
    #[serde(default = "default_admin_password")]
    pub password: SecretString,

    /// HMAC secret for signing admin tokens
    #[serde(default)]
    pub secret_key: Option<SecretString>,

    /// Admin token lifetime
    #[serde(default = "default_token_ttl", with = "humantime_serde")]
    pub token_ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Registration submissions accepted per minute, across all clients
    #[serde(default = "default_registrations_per_minute")]
    pub registrations_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            persist: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
            secret_key: None,
            token_ttl: default_token_ttl(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            registrations_per_minute: default_registrations_per_minute(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/registrations.json")
}

fn default_true() -> bool {
    true
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_admin_username() -> String {
    "admin".into()
}

fn default_admin_password() -> SecretString {
    SecretString::new("admin123".into())
}

fn default_token_ttl() -> Duration {
    Duration::from_secs(60)
}

fn default_registrations_per_minute() -> u32 {
    600
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            // Bare names used by existing deployments
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("auth.secret_key", std::env::var("SECRET_KEY").ok())?
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let auth = AuthConfig::default();
        assert_eq!(auth.username, "admin");
        assert_eq!(auth.password.expose_secret(), "admin123");
        assert!(auth.secret_key.is_none());
        assert_eq!(auth.token_ttl, Duration::from_secs(60));

        let server = ServerConfig::default();
        assert_eq!(server.port, 5000);
        assert!(server.static_dir.is_none());

        assert!(StoreConfig::default().persist);
        assert_eq!(ExportConfig::default().dir, PathBuf::from("downloads"));
    }

    #[test]
    fn test_deserialize_nested_sections() {
        let config: Config = config::Config::builder()
            .set_override("auth.username", "host")
            .unwrap()
            .set_override("auth.token_ttl", "2m")
            .unwrap()
            .set_override("server.port", 8080)
            .unwrap()
            .set_override("store.persist", false)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.auth.username, "host");
        assert_eq!(config.auth.token_ttl, Duration::from_secs(120));
        assert_eq!(config.server.port, 8080);
        assert!(!config.store.persist);
        assert_eq!(config.rate_limit.registrations_per_minute, 600);
        assert_eq!(config.log.level, "info");
    }
}
