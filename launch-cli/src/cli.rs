use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use serde::Serialize;
use tracing::debug;

use launch_core::{
    AgentName, AgentOutput, AgentRegistry, Config, EnvSecrets, NewsProvider, Plan, ProviderId,
    SecretProvider, StepResult, ToolError, ToolResult, WeatherProvider, WeatherRequest,
    agent::{SpacexAgent, SummarizeAgent},
    analyze_weather, assess_launch_conditions, get_spacex_launch_info,
    provider::{news_provider_from_config, weather_provider_from_config},
    tools::fmt_reading,
};

const DEMO_CITY: &str = "Cape Canaveral, FL";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "launch", version, about = "SpaceX launch news and launch weather advisor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials or endpoint for a provider.
    Configure {
        /// Provider short name: "visualcrossing" or "snapi".
        provider: String,
    },

    /// Find the latest launch mentioned in spaceflight news.
    News {
        /// Optional search term, e.g. "Starship".
        #[arg(long)]
        query: Option<String>,

        /// Print the tagged result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Assess launch weather for a location.
    Weather {
        /// City or location name, e.g. "Cape Canaveral, FL".
        city: String,

        /// Date as YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Print the tagged result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Build and run a plan from a free-text goal.
    Plan {
        /// Goal, e.g. "Find the next SpaceX launch and check the weather".
        goal: String,

        /// Search term handed to the news lookup.
        #[arg(long)]
        query: Option<String>,

        /// Print the executed plan as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show today's forecast and assessment for Cape Canaveral.
    Demo,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;
        debug!(command = ?self.command, "running command");

        match self.command {
            Command::Configure { provider } => configure(config, &provider),
            Command::News { query, json } => {
                let news = news_provider_from_config(&config);
                let result = get_spacex_launch_info(news.as_ref(), query.as_deref()).await;
                report(&result, json, |r| r.summary.clone())
            }
            Command::Weather { city, date, json } => {
                let weather =
                    weather_provider_from_config(&config, &(EnvSecrets, config.clone()))?;
                let date = date.unwrap_or_else(today);
                let result = analyze_weather(weather.as_ref(), &city, &date).await;
                report(&result, json, |a| a.summary.clone())
            }
            Command::Plan { goal, query, json } => run_plan(&config, &goal, query, json).await,
            Command::Demo => demo(&config).await,
        }
    }
}

fn today() -> String {
    Local::now().date_naive().format(WeatherRequest::DATE_FORMAT).to_string()
}

fn configure(mut config: Config, provider: &str) -> anyhow::Result<ExitCode> {
    let id = ProviderId::try_from(provider)?;

    if id.requires_api_key() {
        let message = format!("API key for {id}:");
        let mut prompt = Password::new(&message)
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation();
        if config.is_provider_configured(id) {
            prompt = prompt.with_help_message("A key is already stored; entering one replaces it");
        }
        let api_key = prompt.prompt().context("Failed to read API key")?;

        if api_key.trim().is_empty() {
            bail!("API key must not be empty");
        }
        config.upsert_provider_api_key(id, api_key.trim().to_string());
    }

    let base_url = Text::new(&format!("Base URL for {id} (empty for default):"))
        .with_default(config.base_url(id))
        .prompt()
        .context("Failed to read base URL")?;
    let base_url = base_url.trim();
    let override_url = (!base_url.is_empty() && base_url != id.default_base_url())
        .then(|| base_url.to_string());
    config.set_base_url(id, override_url);

    let path = config.save()?;
    println!("Saved {id} configuration to {}", path.display());

    Ok(ExitCode::SUCCESS)
}

fn report<T: Serialize>(
    result: &ToolResult<T>,
    json: bool,
    summary: impl Fn(&T) -> String,
) -> anyhow::Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        match result {
            ToolResult::Success(payload) => println!("{}", summary(payload)),
            ToolResult::Error(err) => eprintln!("Error: {}", err.message),
        }
    }

    Ok(if result.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn step_text(result: &StepResult) -> String {
    match result {
        ToolResult::Success(AgentOutput::Launch(r)) => r.summary.clone(),
        ToolResult::Success(AgentOutput::Weather(a)) => a.summary.clone(),
        ToolResult::Success(AgentOutput::Summary(s)) => s.text.clone(),
        ToolResult::Error(err) => format!("Error: {}", err.message),
    }
}

/// Executed plan plus the abort reason, if any.
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    #[serde(flatten)]
    plan: &'a Plan,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ToolError>,
}

/// Agents for `plan`. The weather provider, and with it the API key, is
/// only required when the plan has a weather step.
fn plan_agents(
    config: &Config,
    secrets: &dyn SecretProvider,
    plan: &Plan,
    query: Option<String>,
) -> anyhow::Result<AgentRegistry> {
    let news: Arc<dyn NewsProvider> = Arc::from(news_provider_from_config(config));

    if !plan.uses(AgentName::Weather) {
        let mut agents = AgentRegistry::new();
        agents.register(Box::new(SpacexAgent::new(news, query)));
        agents.register(Box::new(SummarizeAgent));
        return Ok(agents);
    }

    let weather: Arc<dyn WeatherProvider> = Arc::from(weather_provider_from_config(config, secrets)?);
    Ok(AgentRegistry::standard(news, weather, query))
}

async fn run_plan(
    config: &Config,
    goal: &str,
    query: Option<String>,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let mut plan = Plan::new(goal);
    if plan.steps.is_empty() && !json {
        println!("Nothing to do for goal: {goal}");
        return Ok(ExitCode::SUCCESS);
    }

    let agents = plan_agents(config, &(EnvSecrets, config.clone()), &plan, query)?;

    if !json {
        println!("Plan for \"{goal}\":");
        for (index, step) in plan.steps.iter().enumerate() {
            println!("  {}. {} ({}): {}", index + 1, step.agent, step.action, step.description);
        }
        println!();
    }

    let outcome = plan.execute(&agents).await;

    if json {
        let report = PlanReport {
            plan: &plan,
            error: outcome.as_ref().err().cloned().map(ToolError::from),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (agent, result) in &plan.results {
            println!("== {agent}");
            println!("{}\n", step_text(result));
        }

        match &outcome {
            Ok(()) => println!("Status: {}", plan.status),
            Err(err) => eprintln!("Status: {} ({err})", plan.status),
        }
    }

    Ok(if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn demo(config: &Config) -> anyhow::Result<ExitCode> {
    let weather = weather_provider_from_config(config, &(EnvSecrets, config.clone()))?;
    let date = today();

    let forecast = match WeatherRequest::new(DEMO_CITY, &date) {
        Ok(request) => weather.get_forecast(&request).await,
        Err(err) => Err(err),
    };
    let forecast = forecast.and_then(|f| f.ensure_complete().map(|()| f));

    let forecast = match forecast {
        Ok(forecast) => forecast,
        Err(err) => {
            eprintln!("❌ Error: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("🌤️ Weather Forecast for {DEMO_CITY} on {date}:");
    println!("- Min Temp: {}°C", fmt_reading(forecast.temp_min));
    println!("- Max Temp: {}°C", fmt_reading(forecast.temp_max));
    println!("- Wind Speed: {} km/h", fmt_reading(forecast.wind_speed));
    println!("- Cloud Cover: {}%", fmt_reading(forecast.cloud_cover));
    println!("- Precipitation: {} mm", fmt_reading(forecast.precip));
    println!("- Visibility: {} km", fmt_reading(forecast.visibility));
    if !forecast.conditions.is_empty() {
        println!("Conditions: {}", forecast.conditions);
    }

    let assessment = assess_launch_conditions(&forecast);
    if assessment.launch_advisable {
        println!("✅ Weather is suitable for a launch.");
    } else {
        println!("🚫 Launch not advised due to:");
        for issue in &assessment.issues {
            println!(" - {issue}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_weather_command() {
        let cli = Cli::try_parse_from(["launch", "weather", "Starbase, TX", "--date", "2024-05-01"])
            .unwrap();

        match cli.command {
            Command::Weather { city, date, json } => {
                assert_eq!(city, "Starbase, TX");
                assert_eq!(date.as_deref(), Some("2024-05-01"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_plan_command_with_query() {
        let cli = Cli::try_parse_from(["launch", "plan", "spacex weather", "--query", "Falcon"])
            .unwrap();

        match cli.command {
            Command::Plan { goal, query, json } => {
                assert_eq!(goal, "spacex weather");
                assert_eq!(query.as_deref(), Some("Falcon"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn news_only_plan_needs_no_weather_key() {
        let config = Config::default();
        let plan = Plan::new("latest SpaceX launch");

        let agents = plan_agents(&config, &config, &plan, None).unwrap();
        assert!(agents.get(AgentName::Spacex).is_some());
        assert!(agents.get(AgentName::Weather).is_none());
    }

    #[test]
    fn weather_plan_requires_weather_key() {
        let config = Config::default();
        let plan = Plan::new("SpaceX launch weather");

        let err = plan_agents(&config, &config, &plan, None).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider 'visualcrossing'"));

        let mut keyed = Config::default();
        keyed.upsert_provider_api_key(ProviderId::VisualCrossing, "KEY".into());
        let agents = plan_agents(&keyed, &keyed, &plan, None).unwrap();
        assert!(agents.get(AgentName::Weather).is_some());
    }

    #[test]
    fn plan_report_carries_status_and_error() {
        let plan = Plan::new("launch weather");
        let report = PlanReport {
            plan: &plan,
            error: Some(launch_core::LaunchError::AgentNotFound(AgentName::Spacex).into()),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["goal"], "launch weather");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["steps"][1]["agent"], "weather_agent");
        assert_eq!(json["error"]["kind"], "agent_not_found");

        let clean = serde_json::to_value(PlanReport { plan: &plan, error: None }).unwrap();
        assert!(clean.get("error").is_none());
    }

    #[test]
    fn parses_plan_json_flag() {
        let cli = Cli::try_parse_from(["launch", "plan", "spacex", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Plan { json: true, .. }));
    }

    #[test]
    fn today_is_iso_formatted() {
        let date = today();
        assert!(WeatherRequest::new(DEMO_CITY, &date).is_ok(), "{date}");
    }

    #[test]
    fn verifies_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
