use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{countries::DEFAULT_COUNTRIES_URL, provider::ProviderId};

/// Overrides the stored key of the default provider when set.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Configuration for a single weather provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "openweather" or "weatherapi".
    pub default_provider: Option<String>,

    /// Base URL of the restcountries service; the public instance when absent.
    pub countries_url: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Value of [`API_KEY_ENV`], picked up by [`Config::load`].
    #[serde(skip)]
    pub(crate) env_api_key: Option<String>,
}

/// Provider used when only [`API_KEY_ENV`] is set.
pub const ENV_ONLY_PROVIDER: ProviderId = ProviderId::OpenWeather;

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    ///
    /// With nothing stored, a key in [`API_KEY_ENV`] selects [`ENV_ONLY_PROVIDER`].
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match &self.default_provider {
            Some(s) => Ok(ProviderId::try_from(s.as_str())?),
            None if self.env_api_key.is_some() => Ok(ENV_ONLY_PROVIDER),
            None => Err(anyhow!(
                "No default provider configured.\n\
                 Hint: run `countries configure <provider>` \
                 (e.g. `countries configure openweather`) or set {API_KEY_ENV}."
            )),
        }
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn countries_url(&self) -> &str {
        self.countries_url.as_deref().unwrap_or(DEFAULT_COUNTRIES_URL)
    }

    /// Load config from the platform config dir and pick up the env key override.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from(&Self::config_file_path()?)?;
        cfg.env_api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "country-explorer", "countries-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key; the first configured provider becomes the default.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns the stored API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.as_str())
    }

    /// Key to use for requests: the env override wins for the default provider.
    pub fn resolved_api_key(&self, provider_id: ProviderId) -> Option<String> {
        let is_default = self
            .default_provider_id()
            .is_ok_and(|id| id == provider_id);
        match (&self.env_api_key, is_default) {
            (Some(key), true) => Some(key.clone()),
            _ => self.provider_api_key(provider_id).map(str::to_owned),
        }
    }
}
