use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Prefix for environment overrides, e.g. `TRADEMIND_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "TRADEMIND_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by layering built-in defaults,
    /// `config/Config.toml` and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration from a specific TOML file.
    ///
    /// A missing file is not an error: defaults and environment overrides
    /// still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if an
    /// override has the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::base()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        tracing::debug!(path = %path.as_ref().display(), "configuration loaded");
        Ok(config)
    }

    /// Loads application configuration with a specific profile layered on top
    /// of `config/Config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base()
            .merge(Toml::file("config/Config.toml"))
            .merge(Toml::file(format!("config/Config.{profile}.toml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
    }
}
