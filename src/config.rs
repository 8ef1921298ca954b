//! Server configuration
//!
//! Layered with figment: defaults, then `floorviz.toml` (or the file given
//! on the command line), then `FLOORVIZ_*` environment variables, then the
//! conventional `OPENROUTER_API_KEY`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::openrouter::ProviderConfig;

/// Config file read when none is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "floorviz.toml";

/// Environment variable prefix; nested keys use `__`
pub const ENV_PREFIX: &str = "FLOORVIZ_";

/// Environment variable holding the OpenRouter key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Upper bound for request bodies; images arrive inline as base64
    pub max_body_bytes: usize,
    /// Allow cross-origin browser clients
    pub cors_permissive: bool,
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_body_bytes: 32 * 1024 * 1024, // 32MB
            cors_permissive: false,
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// The layered configuration sources
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[API_KEY_ENV])
                    .map(|_| "provider.api_key".into()),
            )
    }

    /// Load configuration from all sources
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load(None)?;
            assert_eq!(config.bind_addr.port(), 3000);
            assert!(!config.cors_permissive);
            assert_eq!(config.provider.model, "bytedance-seed/seedream-4.5");
            Ok(())
        });
    }

    #[test]
    fn test_api_key_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("OPENROUTER_API_KEY", "sk-or-test");
            let config = Config::load(None)?;
            assert_eq!(config.provider.api_key.as_deref(), Some("sk-or-test"));
            Ok(())
        });
    }

    #[test]
    fn test_empty_api_key_env_is_unset() {
        Jail::expect_with(|jail| {
            jail.set_env("OPENROUTER_API_KEY", "");
            let config = Config::load(None)?;
            assert_eq!(config.provider.api_key(), None);
            Ok(())
        });
    }

    #[test]
    fn test_file_and_prefixed_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "floorviz.toml",
                r#"
                bind_addr = "0.0.0.0:8080"
                cors_permissive = true

                [provider]
                model = "from-file"
                "#,
            )?;
            jail.set_env("FLOORVIZ_PROVIDER__BASE_URL", "http://127.0.0.1:9999/v1");

            let config = Config::load(None)?;
            assert_eq!(config.bind_addr.port(), 8080);
            assert!(config.cors_permissive);
            assert_eq!(config.provider.model, "from-file");
            assert_eq!(config.provider.base_url, "http://127.0.0.1:9999/v1");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "max_body_bytes = 1024")?;
            let config = Config::load(Some(Path::new("custom.toml")))?;
            assert_eq!(config.max_body_bytes, 1024);
            Ok(())
        });
    }
}
