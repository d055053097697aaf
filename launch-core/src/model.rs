use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, LaunchError};

/// A validated forecast lookup. Constructing one is the only way to reach a
/// weather provider, so a malformed date never produces a network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
    pub date: NaiveDate,
}

impl WeatherRequest {
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(city: &str, date: &str) -> Result<Self, LaunchError> {
        if city.trim().is_empty() || date.trim().is_empty() {
            return Err(LaunchError::InvalidInput(
                "Missing required parameters: city and date".to_string(),
            ));
        }

        let date = NaiveDate::parse_from_str(date.trim(), Self::DATE_FORMAT).map_err(|_| {
            LaunchError::InvalidInput("Invalid date format. Use YYYY-MM-DD.".to_string())
        })?;

        Ok(Self { city: city.trim().to_string(), date })
    }

    pub fn date_str(&self) -> String {
        self.date.format(Self::DATE_FORMAT).to_string()
    }
}

/// Normalized daily forecast. Fields the provider omitted stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    /// °C
    pub temp_min: Option<f64>,
    /// °C
    pub temp_max: Option<f64>,
    /// km/h
    pub wind_speed: Option<f64>,
    /// percent
    pub cloud_cover: Option<f64>,
    /// mm
    pub precip: Option<f64>,
    /// km
    pub visibility: Option<f64>,
    pub conditions: String,
}

impl WeatherData {
    /// Provider field names of the numeric readings that are absent.
    pub fn missing_readings(&self) -> Vec<&'static str> {
        [
            ("tempmin", self.temp_min),
            ("tempmax", self.temp_max),
            ("windspeed", self.wind_speed),
            ("cloudcover", self.cloud_cover),
            ("precip", self.precip),
            ("visibility", self.visibility),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect()
    }

    /// A forecast can only be assessed when every reading is present.
    pub fn ensure_complete(&self) -> Result<(), LaunchError> {
        let missing = self.missing_readings();
        if missing.is_empty() {
            return Ok(());
        }

        Err(LaunchError::Upstream(format!(
            "Forecast is missing required readings: {}",
            missing.join(", ")
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_issue_count(count: usize) -> Self {
        match count {
            0 => RiskLevel::Low,
            1 | 2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
    pub launch_advisable: bool,
}

/// One news article as returned by the news provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub url: String,
}

/// Launch sites recognised in article text, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaunchSite {
    #[serde(rename = "Cape Canaveral")]
    CapeCanaveral,
    #[serde(rename = "Kennedy Space Center")]
    KennedySpaceCenter,
    Vandenberg,
    Starbase,
    #[serde(rename = "Boca Chica")]
    BocaChica,
}

impl LaunchSite {
    pub const fn all() -> &'static [LaunchSite] {
        &[
            LaunchSite::CapeCanaveral,
            LaunchSite::KennedySpaceCenter,
            LaunchSite::Vandenberg,
            LaunchSite::Starbase,
            LaunchSite::BocaChica,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchSite::CapeCanaveral => "Cape Canaveral",
            LaunchSite::KennedySpaceCenter => "Kennedy Space Center",
            LaunchSite::Vandenberg => "Vandenberg",
            LaunchSite::Starbase => "Starbase",
            LaunchSite::BocaChica => "Boca Chica",
        }
    }

    /// Location string handed to the weather provider for this site.
    pub fn forecast_location(&self) -> &'static str {
        match self {
            LaunchSite::CapeCanaveral => "Cape Canaveral, FL",
            LaunchSite::KennedySpaceCenter => "Kennedy Space Center, FL",
            LaunchSite::Vandenberg => "Vandenberg Space Force Base, CA",
            LaunchSite::Starbase => "Starbase, TX",
            LaunchSite::BocaChica => "Boca Chica, TX",
        }
    }
}

impl std::fmt::Display for LaunchSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchInfo {
    pub mission: String,
    /// Calendar date taken verbatim from the article timestamp.
    pub date: String,
    pub location: LaunchSite,
    pub summary: String,
    pub article_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<LaunchError> for ToolError {
    fn from(err: LaunchError) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }
}

/// Tagged outcome of every tool-style entry point. Serializes with a
/// `status` discriminator of `"success"` or `"error"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult<T> {
    Success(T),
    Error(ToolError),
}

impl<T> ToolResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ToolResult::Success(payload) => Some(payload),
            ToolResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match self {
            ToolResult::Success(_) => None,
            ToolResult::Error(err) => Some(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ToolResult<U> {
        match self {
            ToolResult::Success(payload) => ToolResult::Success(f(payload)),
            ToolResult::Error(err) => ToolResult::Error(err),
        }
    }
}

impl<T> From<Result<T, LaunchError>> for ToolResult<T> {
    fn from(result: Result<T, LaunchError>) -> Self {
        match result {
            Ok(payload) => ToolResult::Success(payload),
            Err(err) => ToolResult::Error(err.into()),
        }
    }
}
