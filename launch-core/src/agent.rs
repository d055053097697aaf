//! Agents are the units a [`crate::Plan`] dispatches to.
//!
//! The executor only knows the [`Agent`] trait; concrete agents wrap the
//! tool entry points and read earlier step results from the context.

use async_trait::async_trait;
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    sync::Arc,
};

use crate::{
    LaunchError,
    model::{RiskLevel, ToolResult},
    plan::AgentName,
    provider::{NewsProvider, WeatherProvider},
    tools::{self, LaunchReport, WeatherAnalysis},
};

/// Payload produced by one of the known agents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentOutput {
    Launch(LaunchReport),
    Weather(WeatherAnalysis),
    Summary(LaunchSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchSummary {
    pub text: String,
    pub risk_level: RiskLevel,
    pub launch_advisable: bool,
}

pub type StepResult = ToolResult<AgentOutput>;

/// Results recorded so far, keyed by the agent that produced them.
pub type StepResults = BTreeMap<AgentName, StepResult>;

#[async_trait]
pub trait Agent: Send + Sync + Debug {
    fn name(&self) -> AgentName;

    async fn execute(&self, action: &str, context: &StepResults) -> StepResult;
}

fn unknown_action(agent: AgentName, action: &str) -> StepResult {
    let err = LaunchError::InvalidInput(format!("Unknown action '{action}' for {agent}"));
    ToolResult::Error(err.into())
}

fn launch_report(context: &StepResults) -> Option<&LaunchReport> {
    match context.get(&AgentName::Spacex)?.success()? {
        AgentOutput::Launch(report) => Some(report),
        _ => None,
    }
}

fn weather_analysis(context: &StepResults) -> Option<&WeatherAnalysis> {
    match context.get(&AgentName::Weather)?.success()? {
        AgentOutput::Weather(analysis) => Some(analysis),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct SpacexAgent {
    news: Arc<dyn NewsProvider>,
    query: Option<String>,
}

impl SpacexAgent {
    pub fn new(news: Arc<dyn NewsProvider>, query: Option<String>) -> Self {
        Self { news, query }
    }
}

#[async_trait]
impl Agent for SpacexAgent {
    fn name(&self) -> AgentName {
        AgentName::Spacex
    }

    async fn execute(&self, action: &str, _context: &StepResults) -> StepResult {
        if action != self.name().action() {
            return unknown_action(self.name(), action);
        }

        tools::get_spacex_launch_info(self.news.as_ref(), self.query.as_deref())
            .await
            .map(AgentOutput::Launch)
    }
}

/// Forecasts the launch site found by the spacex step, on the launch date.
#[derive(Debug, Clone)]
pub struct WeatherAgent {
    weather: Arc<dyn WeatherProvider>,
}

impl WeatherAgent {
    pub fn new(weather: Arc<dyn WeatherProvider>) -> Self {
        Self { weather }
    }
}

#[async_trait]
impl Agent for WeatherAgent {
    fn name(&self) -> AgentName {
        AgentName::Weather
    }

    async fn execute(&self, action: &str, context: &StepResults) -> StepResult {
        if action != self.name().action() {
            return unknown_action(self.name(), action);
        }

        let Some(report) = launch_report(context) else {
            return ToolResult::Error(LaunchError::MissingDependency(AgentName::Spacex).into());
        };

        let info = &report.launch_info;
        tools::analyze_weather(self.weather.as_ref(), info.location.forecast_location(), &info.date)
            .await
            .map(AgentOutput::Weather)
    }
}

/// Combines launch and weather reports into a GO / NO-GO summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummarizeAgent;

#[async_trait]
impl Agent for SummarizeAgent {
    fn name(&self) -> AgentName {
        AgentName::Summarize
    }

    async fn execute(&self, action: &str, context: &StepResults) -> StepResult {
        if action != self.name().action() {
            return unknown_action(self.name(), action);
        }

        let Some(report) = launch_report(context) else {
            return ToolResult::Error(LaunchError::MissingDependency(AgentName::Spacex).into());
        };
        let Some(analysis) = weather_analysis(context) else {
            return ToolResult::Error(LaunchError::MissingDependency(AgentName::Weather).into());
        };

        let assessment = &analysis.assessment;
        let verdict = if assessment.launch_advisable { "GO" } else { "NO-GO" };

        ToolResult::Success(AgentOutput::Summary(LaunchSummary {
            text: format!(
                "{}\n\n{}\n\nVerdict: {verdict} for \"{}\" ({} risk)",
                report.summary,
                analysis.summary,
                report.launch_info.mission,
                assessment.risk_level,
            ),
            risk_level: assessment.risk_level,
            launch_advisable: assessment.launch_advisable,
        }))
    }
}

/// Name-indexed set of agents available to the plan executor.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: HashMap<AgentName, Box<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three standard agents wired to the given providers.
    pub fn standard(
        news: Arc<dyn NewsProvider>,
        weather: Arc<dyn WeatherProvider>,
        query: Option<String>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SpacexAgent::new(news, query)));
        registry.register(Box::new(WeatherAgent::new(weather)));
        registry.register(Box::new(SummarizeAgent));
        registry
    }

    /// Registers `agent` under its own name, replacing any previous one.
    pub fn register(&mut self, agent: Box<dyn Agent>) {
        self.agents.insert(agent.name(), agent);
    }

    pub fn get(&self, name: AgentName) -> Option<&dyn Agent> {
        self.agents.get(&name).map(|agent| agent.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Plan, PlanStatus,
        error::ErrorKind,
        model::{LaunchSite, WeatherData},
        tools::stubs::{StubNews, StubWeather, clear_day, launch_article},
    };

    fn standard(weather: WeatherData) -> (AgentRegistry, Arc<StubWeather>) {
        let news = Arc::new(StubNews(Ok(vec![launch_article()])));
        let weather = Arc::new(StubWeather::new(Ok(weather)));
        let registry = AgentRegistry::standard(news, weather.clone(), Some("SpaceX".into()));
        (registry, weather)
    }

    #[tokio::test]
    async fn spacex_agent_reports_launch() {
        let (agents, _) = standard(clear_day());
        let agent = agents.get(AgentName::Spacex).unwrap();

        let result = agent.execute("get_spacex_launch_info", &StepResults::new()).await;
        match result.success() {
            Some(AgentOutput::Launch(report)) => {
                assert_eq!(report.launch_info.location, LaunchSite::CapeCanaveral)
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_action_is_invalid_input() {
        let (agents, _) = standard(clear_day());
        let agent = agents.get(AgentName::Weather).unwrap();

        let result = agent.execute("launch_rocket", &StepResults::new()).await;
        let err = result.error().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(err.message.contains("launch_rocket"));
    }

    #[tokio::test]
    async fn weather_agent_needs_launch_report() {
        let (agents, weather) = standard(clear_day());
        let agent = agents.get(AgentName::Weather).unwrap();

        let result = agent.execute("get_forecast", &StepResults::new()).await;
        assert_eq!(result.error().unwrap().kind, ErrorKind::MissingDependency);
        assert_eq!(weather.calls(), 0);
    }

    #[tokio::test]
    async fn full_plan_produces_go_verdict() {
        let (agents, weather) = standard(clear_day());
        let mut plan = Plan::new("Find the next SpaceX launch and check the weather");

        plan.execute(&agents).await.unwrap();

        assert_eq!(plan.status, PlanStatus::Success);
        assert_eq!(weather.calls(), 1);

        match plan.results[&AgentName::Weather].success() {
            Some(AgentOutput::Weather(analysis)) => {
                assert_eq!(analysis.city, "Cape Canaveral, FL");
                assert_eq!(analysis.date, "2024-05-01");
            }
            other => panic!("unexpected output: {other:?}"),
        }

        match plan.results[&AgentName::Summarize].success() {
            Some(AgentOutput::Summary(summary)) => {
                assert!(summary.launch_advisable);
                assert_eq!(summary.risk_level, RiskLevel::Low);
                assert!(summary.text.starts_with("Launch Information:"));
                assert!(summary.text.contains("Weather Analysis for Cape Canaveral, FL"));
                assert!(summary.text.ends_with(
                    "Verdict: GO for \"Falcon 9 launch from Cape Canaveral\" (low risk)"
                ));
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_weather_produces_no_go() {
        let storm = WeatherData { wind_speed: Some(70.0), ..clear_day() };
        let (agents, _) = standard(storm);
        let mut plan = Plan::new("launch weather");

        plan.execute(&agents).await.unwrap();

        match plan.results[&AgentName::Summarize].success() {
            Some(AgentOutput::Summary(summary)) => {
                assert!(!summary.launch_advisable);
                assert!(summary.text.contains("Verdict: NO-GO"));
                assert!(summary.text.ends_with("(medium risk)"));
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn news_failure_stops_plan_before_weather() {
        let news = Arc::new(StubNews(Ok(vec![])));
        let weather = Arc::new(StubWeather::new(Ok(clear_day())));
        let agents = AgentRegistry::standard(news, weather.clone(), None);
        let mut plan = Plan::new("spacex weather");

        let err = plan.execute(&agents).await.unwrap_err();

        assert_eq!(err.to_string(), "Error in spacex_agent: No articles found");
        assert_eq!(plan.results.len(), 1);
        assert_eq!(weather.calls(), 0);
    }
}
