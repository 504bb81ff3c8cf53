//! # configs
//!
//! Layered settings for the blog binaries: built-in defaults, then an
//! optional `blog.toml`, then `BLOG__*` environment variables
//! (e.g. `BLOG__LISTING__PAGE_SIZE=20`). A `.env` file is loaded first if present.

use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "BLOG";
pub const DEFAULT_FILE: &str = "blog";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub log: LogSettings,
    pub listing: ListingSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ListingSettings {
    /// Posts per page returned by list queries
    pub page_size: usize,
}

impl Settings {
    /// Loads `.env`, then `blog.toml` (optional) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let env = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true);
        Self::from_sources(Some(DEFAULT_FILE), env)
    }

    fn from_sources(
        file: Option<&str>,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("log.level", "info")?
            .set_default("log.json", false)?
            .set_default("listing.page_size", 10)?;

        if let Some(name) = file {
            builder = builder.add_source(config::File::with_name(name).required(false));
        }

        let settings: Settings = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(?settings, "configuration loaded");
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.page_size == 0 {
            return Err(ConfigError::Invalid("listing.page_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_sources(None, env(&[])).unwrap();

        assert_eq!(settings.log.level, "info");
        assert!(!settings.log.json);
        assert_eq!(settings.listing.page_size, 10);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_sources(
            None,
            env(&[("BLOG__LISTING__PAGE_SIZE", "25"), ("BLOG__LOG__JSON", "true")]),
        )
        .unwrap();

        assert_eq!(settings.listing.page_size, 25);
        assert!(settings.log.json);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = Settings::from_sources(None, env(&[("BLOG__LISTING__PAGE_SIZE", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
