use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{LaunchError, model::Article, provider::truncate_body};

use super::NewsProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.spaceflightnewsapi.net/v4";

pub const ARTICLE_LIMIT: usize = 10;

/// Spaceflight News API (v4) article listing.
#[derive(Debug, Clone)]
pub struct SnapiProvider {
    base_url: String,
    http: Client,
}

impl SnapiProvider {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), http: Client::new() }
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SnapiPage {
    #[serde(default)]
    results: Vec<Article>,
}

#[async_trait]
impl NewsProvider for SnapiProvider {
    async fn latest_articles(&self, query: Option<&str>) -> Result<Vec<Article>, LaunchError> {
        let url = format!("{}/articles", self.base_url);
        let limit = ARTICLE_LIMIT.to_string();

        let mut params = vec![("limit", limit.as_str()), ("ordering", "-published_at")];
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            params.push(("search", query));
        }

        debug!(?query, "requesting spaceflight news");

        let res = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(LaunchError::upstream)?;

        let status = res.status();
        let body = res.text().await.map_err(LaunchError::upstream)?;

        if !status.is_success() {
            warn!(%status, "spaceflight news request failed");
            return Err(LaunchError::Upstream(format!(
                "Spaceflight News request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let page: SnapiPage = serde_json::from_str(&body).map_err(|e| {
            LaunchError::Upstream(format!("Failed to parse Spaceflight News JSON: {e}"))
        })?;

        debug!(count = page.results.len(), "received articles");
        Ok(page.results)
    }
}
