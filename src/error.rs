//! Error types for tools and agent wiring

use thiserror::Error;

use crate::agents::AgentId;

/// Failures raised inside a tool before they are turned into a payload
#[derive(Debug, Error)]
pub enum ToolError {
    /// Network failure or a non-2xx response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response did not have the expected shape
    #[error("unexpected response format: {0}")]
    DataFormat(String),

    /// Every attempt failed with a transport error
    #[error("failed to fetch data after {attempts} attempts")]
    FetchExhausted { attempts: u32 },

    /// Anything else that went wrong inside a tool
    #[error("{0}")]
    Tool(String),
}

impl ToolError {
    /// Short machine-readable tag, surfaced in error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::DataFormat(_) => "data_format",
            Self::FetchExhausted { .. } => "fetch_exhausted",
            Self::Tool(_) => "tool",
        }
    }
}

/// Problems detected while assembling tool sets and the agent registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool name must not be empty")]
    EmptyToolName,

    #[error("tool '{0}' has no description")]
    MissingDescription(String),

    #[error("tool '{0}' must declare an object parameter schema")]
    InvalidSchema(String),

    #[error("tool '{0}' registered twice")]
    DuplicateTool(String),

    #[error("agent {0:?} registered twice")]
    DuplicateAgent(AgentId),

    #[error("registry has no {0:?} agent")]
    MissingAgent(AgentId),

    #[error("tool '{tool}' on {from:?} transfers to unregistered agent {target:?}")]
    DanglingTransfer {
        from: AgentId,
        tool: String,
        target: AgentId,
    },
}
