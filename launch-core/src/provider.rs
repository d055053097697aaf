use crate::{
    Config, LaunchError, WeatherData, WeatherRequest,
    config::SecretProvider,
    model::Article,
    provider::{snapi::SnapiProvider, visualcrossing::VisualCrossingProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod snapi;
pub mod visualcrossing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    VisualCrossing,
    Snapi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::VisualCrossing => "visualcrossing",
            ProviderId::Snapi => "snapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::VisualCrossing, ProviderId::Snapi]
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::VisualCrossing => visualcrossing::DEFAULT_BASE_URL,
            ProviderId::Snapi => snapi::DEFAULT_BASE_URL,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::VisualCrossing)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "visualcrossing" => Ok(ProviderId::VisualCrossing),
            "snapi" => Ok(ProviderId::Snapi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: visualcrossing, snapi."
            )),
        }
    }
}

/// Daily forecast source.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_forecast(&self, request: &WeatherRequest) -> Result<WeatherData, LaunchError>;
}

/// Spaceflight news source. An empty list means the provider had no
/// articles; it is not an error.
#[async_trait]
pub trait NewsProvider: Send + Sync + Debug {
    async fn latest_articles(&self, query: Option<&str>) -> Result<Vec<Article>, LaunchError>;
}

/// Construct the weather provider, resolving its API key through `secrets`.
pub fn weather_provider_from_config(
    config: &Config,
    secrets: &dyn SecretProvider,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = ProviderId::VisualCrossing;
    let api_key = secrets.api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `launch configure {id}` or set {}.",
            crate::config::EnvSecrets::var_name(id)
        )
    })?;

    Ok(Box::new(VisualCrossingProvider::new(api_key, config.base_url(id))))
}

pub fn news_provider_from_config(config: &Config) -> Box<dyn NewsProvider> {
    Box::new(SnapiProvider::new(config.base_url(ProviderId::Snapi)))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
