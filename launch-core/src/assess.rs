//! Fixed-threshold launch weather rules.
//!
//! Rules are evaluated in a fixed order (temperature, wind, cloud cover,
//! precipitation, visibility) and each rule group contributes at most one
//! issue. A rule whose input field is absent is skipped; the tool layer
//! rejects incomplete forecasts with [`crate::WeatherData::ensure_complete`]
//! before they get here.

use crate::model::{Assessment, RiskLevel, WeatherData};

pub const MIN_TEMP_C: f64 = 4.0;
pub const MAX_TEMP_C: f64 = 37.0;
pub const MAX_WIND_KMH: f64 = 56.0;
pub const ELEVATED_WIND_KMH: f64 = 30.0;
pub const MAX_CLOUD_COVER_PCT: f64 = 50.0;
pub const MAX_PRECIP_MM: f64 = 0.0;
pub const MIN_VISIBILITY_KM: f64 = 8.0;

#[derive(Default)]
struct Findings {
    issues: Vec<String>,
    recommendations: Vec<String>,
}

impl Findings {
    fn flag(&mut self, issue: &str, recommendation: &str) {
        self.issues.push(issue.to_string());
        self.recommendations.push(recommendation.to_string());
    }
}

fn above(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v > limit)
}

fn below(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v < limit)
}

/// Map a forecast to issues, recommendations and a go/no-go flag.
pub fn assess_launch_conditions(data: &WeatherData) -> Assessment {
    let mut findings = Findings::default();

    if below(data.temp_min, MIN_TEMP_C) {
        findings.flag(
            "Temperature too low for launch",
            "Consider delaying until temperatures rise",
        );
    } else if above(data.temp_max, MAX_TEMP_C) {
        findings.flag(
            "Temperature too high for launch",
            "Consider early morning or evening launch",
        );
    }

    if above(data.wind_speed, MAX_WIND_KMH) {
        findings.flag("Wind speed too high for launch", "Wait for wind conditions to improve");
    } else if above(data.wind_speed, ELEVATED_WIND_KMH) {
        findings.flag("Elevated wind speeds", "Monitor wind conditions closely");
    }

    if above(data.cloud_cover, MAX_CLOUD_COVER_PCT) {
        findings.flag("High cloud cover", "Consider visibility impact on launch");
    }

    if above(data.precip, MAX_PRECIP_MM) {
        findings.flag("Precipitation expected", "Delay launch until precipitation clears");
    }

    if below(data.visibility, MIN_VISIBILITY_KM) {
        findings.flag("Low visibility conditions", "Wait for visibility to improve");
    }

    let Findings { issues, recommendations } = findings;

    Assessment {
        risk_level: RiskLevel::from_issue_count(issues.len()),
        launch_advisable: issues.is_empty(),
        issues,
        recommendations,
    }
}
