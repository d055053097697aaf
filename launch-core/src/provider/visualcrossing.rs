use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    LaunchError,
    model::{WeatherData, WeatherRequest},
    provider::truncate_body,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Visual Crossing timeline API, one day per request.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self { api_key, base_url: base_url.to_string(), http: Client::new() }
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// `{base}/{city}/{date}` with both segments percent-encoded.
    fn timeline_url(&self, request: &WeatherRequest) -> Result<Url, LaunchError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            LaunchError::InvalidInput(format!("Invalid weather base URL '{}': {e}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                LaunchError::InvalidInput(format!(
                    "Weather base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(&request.city)
            .push(&request.date_str());

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct VcDay {
    tempmin: Option<f64>,
    tempmax: Option<f64>,
    windspeed: Option<f64>,
    cloudcover: Option<f64>,
    precip: Option<f64>,
    visibility: Option<f64>,
    conditions: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VcTimelineResponse {
    #[serde(default)]
    days: Vec<VcDay>,
}

impl From<VcDay> for WeatherData {
    fn from(day: VcDay) -> Self {
        WeatherData {
            temp_min: day.tempmin,
            temp_max: day.tempmax,
            wind_speed: day.windspeed,
            cloud_cover: day.cloudcover,
            precip: day.precip,
            visibility: day.visibility,
            conditions: day.conditions.unwrap_or_default(),
        }
    }
}

fn parse_timeline(body: &str) -> Result<WeatherData, LaunchError> {
    let parsed: VcTimelineResponse = serde_json::from_str(body).map_err(|e| {
        LaunchError::Upstream(format!("Failed to parse Visual Crossing JSON: {e}"))
    })?;

    let day = parsed.days.into_iter().next().ok_or_else(|| {
        LaunchError::Upstream("Visual Crossing response contained no day records".to_string())
    })?;

    Ok(day.into())
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn get_forecast(&self, request: &WeatherRequest) -> Result<WeatherData, LaunchError> {
        let url = self.timeline_url(request)?;
        debug!(city = %request.city, date = %request.date, "requesting Visual Crossing timeline");

        let res = self
            .http
            .get(url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("unitGroup", "metric"),
                ("include", "days"),
                ("contentType", "json"),
            ])
            .send()
            .await
            .map_err(LaunchError::upstream)?;

        let status = res.status();
        let body = res.text().await.map_err(LaunchError::upstream)?;

        if !status.is_success() {
            warn!(%status, "Visual Crossing request failed");
            return Err(LaunchError::Upstream(format!(
                "Visual Crossing request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_timeline(&body)
    }
}
