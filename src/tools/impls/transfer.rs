//! Handoff tools
//!
//! A transfer takes no arguments and produces no data: executing it yields
//! [`ToolOutcome::Transfer`] with the target agent, and the dispatcher moves
//! the conversation there.

use async_trait::async_trait;
use serde_json::Value;

use crate::agents::{Agent, AgentId};
use crate::tools::schema::no_params;
use crate::tools::{Tool, ToolOutcome};

pub struct TransferTool {
    name: String,
    description: String,
    target: AgentId,
}

impl TransferTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, target: AgentId) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            target,
        }
    }

    /// Transfer named after the target, e.g. `transfer_to_financial_analyst`
    pub fn to(target: &Agent) -> Self {
        Self::new(
            format!("transfer_to_{}", target.id().slug()),
            format!("Transfer the conversation to the {}.", target.name()),
            target.id(),
        )
    }

    /// The return path every specialist gets
    pub fn back_to(target: &Agent) -> Self {
        Self::new(
            format!("transfer_back_to_{}", target.id().slug()),
            format!(
                "Call this function if the user request needs to be handled by the {}.",
                target.name()
            ),
            target.id(),
        )
    }
}

#[async_trait]
impl Tool for TransferTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value) -> ToolOutcome {
        ToolOutcome::Transfer(self.target)
    }

    fn transfer_target(&self) -> Option<AgentId> {
        Some(self.target)
    }
}
