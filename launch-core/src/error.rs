use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::AgentName;

/// Failures raised inside the library. Tool entry points convert these into
/// [`crate::ToolResult::Error`] before handing them to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("{0}")]
    InvalidInput(String),

    /// Transport failure or non-2xx response from a provider.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(AgentName),

    #[error("Agent not found: {0}")]
    AgentNotFound(AgentName),

    #[error("Error in {agent}: {message}")]
    StepFailed { agent: AgentName, message: String },
}

impl LaunchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LaunchError::InvalidInput(_) => ErrorKind::InvalidInput,
            LaunchError::Upstream(_) => ErrorKind::Upstream,
            LaunchError::NotFound(_) => ErrorKind::NotFound,
            LaunchError::MissingDependency(_) => ErrorKind::MissingDependency,
            LaunchError::AgentNotFound(_) => ErrorKind::AgentNotFound,
            LaunchError::StepFailed { .. } => ErrorKind::StepFailed,
        }
    }

    pub(crate) fn upstream(err: reqwest::Error) -> Self {
        LaunchError::Upstream(err.to_string())
    }
}

/// Serializable discriminator carried by error results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Upstream,
    NotFound,
    MissingDependency,
    AgentNotFound,
    StepFailed,
}
