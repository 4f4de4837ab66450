//! HTTP bind configuration for the service binaries

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Address a service listens on
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load `<PREFIX>_HOST` and `<PREFIX>_PORT`, falling back to `0.0.0.0` and `default_port`
    pub fn load(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_apply_without_environment() {
        let config = ServerConfig::load("CATALOG_TEST_DEFAULTS", 3001).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn environment_overrides_defaults() {
        unsafe {
            std::env::set_var("CATALOG_TEST_OVERRIDE_HOST", "127.0.0.1");
            std::env::set_var("CATALOG_TEST_OVERRIDE_PORT", "8088");
        }

        let config = ServerConfig::load("CATALOG_TEST_OVERRIDE", 3001).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8088);

        unsafe {
            std::env::remove_var("CATALOG_TEST_OVERRIDE_HOST");
            std::env::remove_var("CATALOG_TEST_OVERRIDE_PORT");
        }
    }
}
