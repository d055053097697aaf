//! Core library for the `launch` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the news and weather providers
//! - Launch weather assessment and launch extraction from news
//! - Tool-style entry points returning tagged results
//! - Agents and the goal-driven plan executor
//!
//! It is used by `launch-cli`, but can also be reused by other binaries or services.

pub mod agent;
pub mod assess;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod plan;
pub mod provider;
pub mod tools;

pub use agent::{Agent, AgentOutput, AgentRegistry, LaunchSummary, StepResult, StepResults};
pub use assess::assess_launch_conditions;
pub use config::{Config, EnvSecrets, ProviderConfig, SecretProvider};
pub use error::{ErrorKind, LaunchError};
pub use extract::extract_launch_info;
pub use model::{
    Article, Assessment, LaunchInfo, LaunchSite, RiskLevel, ToolError, ToolResult, WeatherData,
    WeatherRequest,
};
pub use plan::{AgentName, Plan, PlanStatus, Step};
pub use provider::{NewsProvider, ProviderId, WeatherProvider};
pub use tools::{LaunchReport, WeatherAnalysis, analyze_weather, get_spacex_launch_info};
