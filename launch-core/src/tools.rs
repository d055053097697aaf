//! Tool-style entry points.
//!
//! Each function here is a boundary: internal failures are turned into a
//! [`ToolResult::Error`] instead of being propagated, so callers always
//! check the status before reading the payload.

use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, warn};

use crate::{
    LaunchError,
    assess::assess_launch_conditions,
    extract::extract_launch_info,
    model::{Article, Assessment, LaunchInfo, ToolResult, WeatherData, WeatherRequest},
    provider::{NewsProvider, WeatherProvider},
};

const RELATED_ARTICLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchReport {
    pub launch_info: LaunchInfo,
    pub summary: String,
    pub related_articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherAnalysis {
    pub city: String,
    pub date: String,
    pub forecast: WeatherData,
    pub assessment: Assessment,
    pub summary: String,
}

/// Fetch recent news and pull out the first launch at a known site.
pub async fn get_spacex_launch_info(
    news: &dyn NewsProvider,
    query: Option<&str>,
) -> ToolResult<LaunchReport> {
    launch_report(news, query).await.into()
}

async fn launch_report(
    news: &dyn NewsProvider,
    query: Option<&str>,
) -> Result<LaunchReport, LaunchError> {
    let articles = news.latest_articles(query).await.inspect_err(|e| {
        warn!(error = %e, "news lookup failed");
    })?;

    if articles.is_empty() {
        return Err(LaunchError::NotFound("No articles found".to_string()));
    }

    let launch_info = extract_launch_info(&articles).ok_or_else(|| {
        LaunchError::NotFound("No launch information found in articles".to_string())
    })?;
    debug!(mission = %launch_info.mission, location = %launch_info.location, "launch found");

    Ok(LaunchReport {
        summary: format_launch_summary(&launch_info),
        related_articles: articles.into_iter().take(RELATED_ARTICLES).collect(),
        launch_info,
    })
}

/// Fetch the forecast for `city` on `date` (YYYY-MM-DD) and assess it.
pub async fn analyze_weather(
    weather: &dyn WeatherProvider,
    city: &str,
    date: &str,
) -> ToolResult<WeatherAnalysis> {
    weather_analysis(weather, city, date).await.into()
}

async fn weather_analysis(
    weather: &dyn WeatherProvider,
    city: &str,
    date: &str,
) -> Result<WeatherAnalysis, LaunchError> {
    let request = WeatherRequest::new(city, date)?;

    let forecast = weather.get_forecast(&request).await.inspect_err(|e| {
        warn!(error = %e, city = %request.city, "forecast lookup failed");
    })?;
    forecast.ensure_complete()?;
    let assessment = assess_launch_conditions(&forecast);

    let date = request.date_str();
    Ok(WeatherAnalysis {
        summary: format_weather_summary(&request.city, &date, &forecast, &assessment),
        city: request.city,
        date,
        forecast,
        assessment,
    })
}

pub fn format_launch_summary(info: &LaunchInfo) -> String {
    format!(
        "Launch Information:\n\
         Mission: {}\n\
         Date: {}\n\
         Location: {}\n\
         \n\
         Mission Summary:\n\
         {}\n\
         \n\
         For more details, visit: {}",
        info.mission, info.date, info.location, info.summary, info.article_url
    )
}

/// Forecast value for display; absent readings render as `n/a`.
pub fn fmt_reading(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

pub fn format_weather_summary(
    city: &str,
    date: &str,
    forecast: &WeatherData,
    assessment: &Assessment,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Weather Analysis for {city} on {date}:");
    let _ = writeln!(out);
    let _ = writeln!(out, "Current Conditions:");
    let _ = writeln!(
        out,
        "- Temperature Range: {}°C to {}°C",
        fmt_reading(forecast.temp_min),
        fmt_reading(forecast.temp_max)
    );
    let _ = writeln!(out, "- Wind Speed: {} km/h", fmt_reading(forecast.wind_speed));
    let _ = writeln!(out, "- Cloud Cover: {}%", fmt_reading(forecast.cloud_cover));
    let _ = writeln!(out, "- Precipitation: {} mm", fmt_reading(forecast.precip));
    let _ = writeln!(out, "- Visibility: {} km", fmt_reading(forecast.visibility));
    let _ = writeln!(out, "- Conditions: {}", forecast.conditions);
    let _ = writeln!(out);
    let _ = writeln!(out, "Launch Assessment:");
    let _ = writeln!(out, "- Risk Level: {}", assessment.risk_level.as_str().to_uppercase());
    let _ = writeln!(
        out,
        "- Launch Advisable: {}",
        if assessment.launch_advisable { "Yes" } else { "No" }
    );

    if !assessment.issues.is_empty() {
        let _ = writeln!(out, "\nIssues Identified:");
        for issue in &assessment.issues {
            let _ = writeln!(out, "- {issue}");
        }
    }

    if !assessment.recommendations.is_empty() {
        let _ = writeln!(out, "\nRecommendations:");
        for rec in &assessment.recommendations {
            let _ = writeln!(out, "- {rec}");
        }
    }

    out.trim().to_string()
}


#[cfg(test)]
mod tests {
    use super::stubs::*;
    use super::*;
    use crate::{error::ErrorKind, model::LaunchSite};

    fn plain(title: &str) -> Article {
        Article { title: title.into(), ..Article::default() }
    }

    #[tokio::test]
    async fn launch_report_includes_summary_and_related() {
        let news = StubNews(Ok(vec![
            plain("Crew rotation"),
            launch_article(),
            plain("Starship"),
            plain("Budget"),
        ]));

        let result = get_spacex_launch_info(&news, Some("SpaceX")).await;
        let report = result.success().expect("success");

        assert_eq!(report.launch_info.location, LaunchSite::CapeCanaveral);
        assert_eq!(report.related_articles.len(), 3);
        assert_eq!(
            report.summary,
            "Launch Information:\n\
             Mission: Falcon 9 launch from Cape Canaveral\n\
             Date: 2024-05-01\n\
             Location: Cape Canaveral\n\
             \n\
             Mission Summary:\n\
             Starlink satellites head to orbit\n\
             \n\
             For more details, visit: https://news.example/falcon"
        );
    }

    #[tokio::test]
    async fn empty_feed_is_not_found() {
        let result = get_spacex_launch_info(&StubNews(Ok(vec![])), None).await;
        let err = result.error().expect("error");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "No articles found");
    }

    #[tokio::test]
    async fn feed_without_launch_is_not_found() {
        let result = get_spacex_launch_info(&StubNews(Ok(vec![plain("Crew rotation")])), None).await;
        let err = result.error().expect("error");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "No launch information found in articles");
    }

    #[tokio::test]
    async fn upstream_failure_becomes_error_result() {
        let news = StubNews(Err(LaunchError::Upstream("connection refused".into())));
        let result = get_spacex_launch_info(&news, None).await;
        assert_eq!(result.error().unwrap().kind, ErrorKind::Upstream);
    }

    #[tokio::test]
    async fn invalid_date_never_reaches_provider() {
        let weather = StubWeather::new(Ok(clear_day()));

        let result = analyze_weather(&weather, "Starbase, TX", "tomorrow").await;
        let err = result.error().expect("error");
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.message, "Invalid date format. Use YYYY-MM-DD.");

        let result = analyze_weather(&weather, "", "2024-05-01").await;
        assert_eq!(result.error().unwrap().message, "Missing required parameters: city and date");

        assert_eq!(weather.calls(), 0);
    }

    #[tokio::test]
    async fn clear_day_analysis() {
        let weather = StubWeather::new(Ok(clear_day()));

        let result = analyze_weather(&weather, "Cape Canaveral, FL", "2024-05-01").await;
        let analysis = result.success().expect("success");

        assert!(analysis.assessment.launch_advisable);
        assert_eq!(analysis.date, "2024-05-01");
        assert!(analysis.summary.starts_with("Weather Analysis for Cape Canaveral, FL on 2024-05-01:"));
        assert!(analysis.summary.contains("- Temperature Range: 22°C to 29°C"));
        assert!(analysis.summary.contains("- Risk Level: LOW"));
        assert!(analysis.summary.ends_with("- Launch Advisable: Yes"));
        assert!(!analysis.summary.contains("Issues Identified"));
        assert_eq!(weather.calls(), 1);
    }

    #[tokio::test]
    async fn stormy_day_lists_issues() {
        let stormy = WeatherData { wind_speed: Some(60.0), precip: Some(3.5), ..clear_day() };
        let weather = StubWeather::new(Ok(stormy));

        let result = analyze_weather(&weather, "Starbase, TX", "2024-05-01").await;
        let analysis = result.success().unwrap();

        assert_eq!(analysis.assessment.issues.len(), 2);
        assert!(analysis.summary.contains("- Risk Level: MEDIUM"));
        assert!(analysis.summary.contains("- Launch Advisable: No"));
        assert!(analysis.summary.contains(
            "Issues Identified:\n- Wind speed too high for launch\n- Precipitation expected"
        ));
        assert!(analysis.summary.ends_with("- Delay launch until precipitation clears"));
    }

    #[tokio::test]
    async fn empty_forecast_is_never_advisable() {
        let weather = StubWeather::new(Ok(WeatherData::default()));

        let result = analyze_weather(&weather, "Cape Canaveral, FL", "2024-05-01").await;
        let err = result.error().expect("error");
        assert_eq!(err.kind, ErrorKind::Upstream);
        assert!(err.message.starts_with("Forecast is missing required readings: tempmin"));
    }

    #[tokio::test]
    async fn single_missing_reading_is_an_error() {
        let weather = StubWeather::new(Ok(WeatherData { visibility: None, ..clear_day() }));

        let result = analyze_weather(&weather, "Starbase, TX", "2024-05-01").await;
        assert_eq!(
            result.error().unwrap().message,
            "Forecast is missing required readings: visibility"
        );
    }

    #[test]
    fn absent_reading_renders_placeholder() {
        assert_eq!(fmt_reading(None), "n/a");
        assert_eq!(fmt_reading(Some(12.5)), "12.5");
    }

    #[tokio::test]
    async fn forecast_failure_becomes_error_result() {
        let weather = StubWeather::new(Err(LaunchError::Upstream("status 500".into())));
        let result = analyze_weather(&weather, "Starbase, TX", "2024-05-01").await;
        assert_eq!(result.error().unwrap().kind, ErrorKind::Upstream);
    }
}
