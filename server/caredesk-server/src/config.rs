//! Layered server configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `CAREDESK_`-prefixed environment variables. Nested keys use a double
//! underscore, e.g. `CAREDESK_IDENTITY__REMEMBER_ME_DAYS=14`.

use auth_identity::IdentityConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "caredesk.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Display name used in page titles and the startup banner
    pub name: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// Mark cookies `Secure`; enable when served over HTTPS
    pub cookie_secure: bool,
    pub identity: IdentityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "CareDesk".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "sqlite://caredesk.db?mode=rwc".to_string(),
            max_connections: 5,
            cookie_secure: false,
            identity: IdentityConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `path` (if it exists) and the environment
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("CAREDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.identity.validate().map_err(ConfigError::Message)?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_missing_file() {
        let config = ServerConfig::load("definitely-not-here.toml").unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_url, "sqlite://caredesk.db?mode=rwc");
        assert_eq!(config.identity.remember_me_days, 30);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_rejects_unusable_session_lifetime() {
        let path = std::env::temp_dir().join(format!("caredesk-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[identity]\nremember_me_days = -3\n").unwrap();

        let err = ServerConfig::load(path.to_str().unwrap()).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("remember_me_days"), "{err}");
    }
}
