//! Goal-driven plans over the known agents.
//!
//! A plan is built by keyword matching on the goal and executed strictly in
//! step order. Each step's declared dependencies must already have recorded
//! results; there is no reordering, retry or rollback.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    LaunchError,
    agent::{AgentRegistry, StepResults},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentName {
    #[serde(rename = "spacex_agent")]
    Spacex,
    #[serde(rename = "weather_agent")]
    Weather,
    #[serde(rename = "summarize_agent")]
    Summarize,
}

impl AgentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentName::Spacex => "spacex_agent",
            AgentName::Weather => "weather_agent",
            AgentName::Summarize => "summarize_agent",
        }
    }

    /// Action a planned step asks this agent to run.
    pub fn action(&self) -> &'static str {
        match self {
            AgentName::Spacex => "get_spacex_launch_info",
            AgentName::Weather => "get_forecast",
            AgentName::Summarize => "create_launch_summary",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            AgentName::Spacex => "Get information about the next SpaceX launch",
            AgentName::Weather => "Get weather forecast for launch location",
            AgentName::Summarize => "Create comprehensive summary of launch and conditions",
        }
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub agent: AgentName,
    pub action: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<AgentName>,
}

impl Step {
    fn new(agent: AgentName, depends_on: &[AgentName]) -> Self {
        Self {
            agent,
            action: agent.action().to_string(),
            description: agent.description().to_string(),
            depends_on: depends_on.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Pending,
    Success,
    Error,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::Success => "success",
            PlanStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub goal: String,
    pub steps: Vec<Step>,
    pub current_step: usize,
    pub status: PlanStatus,
    pub results: StepResults,
}

/// Linearize a goal into steps. Order is always spacex, weather, summarize.
///
/// The weather step depends on `spacex_agent` even when the goal did not
/// ask for launch news, so a weather-only plan fails at execution with a
/// missing dependency.
pub fn parse_goal(goal: &str) -> Vec<Step> {
    let goal = goal.to_lowercase();
    let mut steps = Vec::new();

    if goal.contains("spacex") || goal.contains("launch") {
        steps.push(Step::new(AgentName::Spacex, &[]));
    }

    if goal.contains("weather") {
        steps.push(Step::new(AgentName::Weather, &[AgentName::Spacex]));
    }

    if steps.len() > 1 {
        steps.push(Step::new(AgentName::Summarize, &[AgentName::Spacex, AgentName::Weather]));
    }

    steps
}

impl Plan {
    pub fn new(goal: &str) -> Self {
        let steps = parse_goal(goal);
        info!(goal, steps = steps.len(), "plan created");

        Self {
            goal: goal.to_string(),
            steps,
            current_step: 0,
            status: PlanStatus::Pending,
            results: StepResults::new(),
        }
    }

    /// Whether any step dispatches to `agent`.
    pub fn uses(&self, agent: AgentName) -> bool {
        self.steps.iter().any(|step| step.agent == agent)
    }

    /// Run every step in order against `agents`.
    ///
    /// On failure the plan keeps the results recorded so far, its status is
    /// set to [`PlanStatus::Error`] and `current_step` points at the step
    /// that failed.
    pub async fn execute(&mut self, agents: &AgentRegistry) -> Result<(), LaunchError> {
        for (index, step) in self.steps.iter().enumerate() {
            self.current_step = index;

            let missing = step.depends_on.iter().find(|dep| !self.results.contains_key(*dep));
            if let Some(missing) = missing {
                warn!(step = %step.agent, dependency = %missing, "plan aborted");
                self.status = PlanStatus::Error;
                return Err(LaunchError::MissingDependency(*missing));
            }

            let Some(agent) = agents.get(step.agent) else {
                warn!(step = %step.agent, "plan aborted: agent not registered");
                self.status = PlanStatus::Error;
                return Err(LaunchError::AgentNotFound(step.agent));
            };

            info!(step = index, agent = %step.agent, action = %step.action, "executing step");
            let result = agent.execute(&step.action, &self.results).await;
            let failure = result.error().map(|err| err.message.clone());
            self.results.insert(step.agent, result);

            if let Some(message) = failure {
                warn!(agent = %step.agent, %message, "plan aborted: step failed");
                self.status = PlanStatus::Error;
                return Err(LaunchError::StepFailed { agent: step.agent, message });
            }
        }

        self.current_step = self.steps.len();
        self.status = PlanStatus::Success;
        Ok(())
    }
}
