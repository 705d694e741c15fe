use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use walkability_core::loading::WalkabilityConfig;

/// Contents of the server's TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    #[serde(flatten)]
    pub walkability: WalkabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 60,
            concurrency_limit: 64,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ServerConfig {
    /// Reads the configuration file; a missing path yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkability_core::loading::ProviderKind;
    use walkability_core::session::HomeAddress;

    #[test]
    fn parses_full_config() {
        let config: ServerConfig = toml::from_str(
            r#"
            catalog = "pois.json"

            [home]
            address = "330 De Neve Dr, Los Angeles"

            [provider]
            kind = "straight_line"
            walking_speed = 1.2

            [server]
            bind = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.server.concurrency_limit, 64);
        assert_eq!(
            config.walkability.home,
            Some(HomeAddress::text("330 De Neve Dr, Los Angeles"))
        );
        assert_eq!(config.walkability.provider.kind, ProviderKind::StraightLine);
        assert_eq!(config.walkability.provider.walking_speed, 1.2);
        assert_eq!(
            config.walkability.catalog.as_deref(),
            Some(Path::new("pois.json"))
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert!(config.walkability.catalog.is_none());
    }
}
