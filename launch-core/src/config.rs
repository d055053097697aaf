use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, env, fs, path::PathBuf};

use crate::provider::ProviderId;

/// Configuration for a single provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the provider's public endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [providers.visualcrossing]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Configured endpoint for a provider, falling back to its public default.
    pub fn base_url(&self, id: ProviderId) -> &str {
        self.provider_config(id)
            .and_then(|cfg| cfg.base_url.as_deref())
            .unwrap_or_else(|| id.default_base_url())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "launch-advisor", "launch-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace a provider API key, keeping any base URL override.
    pub fn upsert_provider_api_key(&mut self, id: ProviderId, api_key: String) {
        self.providers.entry(id.as_str().to_string()).or_default().api_key = Some(api_key);
    }

    pub fn set_base_url(&mut self, id: ProviderId, base_url: Option<String>) {
        self.providers.entry(id.as_str().to_string()).or_default().base_url = base_url;
    }

    pub fn is_provider_configured(&self, id: ProviderId) -> bool {
        SecretProvider::api_key(self, id).is_some()
    }
}

/// Source of provider credentials. Keys never live in source code.
pub trait SecretProvider {
    fn api_key(&self, id: ProviderId) -> Option<String>;
}

impl SecretProvider for Config {
    fn api_key(&self, id: ProviderId) -> Option<String> {
        self.provider_config(id)
            .and_then(|cfg| cfg.api_key.clone())
            .filter(|key| !key.is_empty())
    }
}

/// Reads `<PROVIDER>_API_KEY` from the process environment,
/// e.g. `VISUALCROSSING_API_KEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl EnvSecrets {
    pub fn var_name(id: ProviderId) -> String {
        format!("{}_API_KEY", id.as_str().to_uppercase())
    }
}

impl SecretProvider for EnvSecrets {
    fn api_key(&self, id: ProviderId) -> Option<String> {
        env::var(Self::var_name(id)).ok().filter(|key| !key.is_empty())
    }
}

/// Environment first, then the config file.
impl<A: SecretProvider, B: SecretProvider> SecretProvider for (A, B) {
    fn api_key(&self, id: ProviderId) -> Option<String> {
        self.0.api_key(id).or_else(|| self.1.api_key(id))
    }
}
