//! Mock on-chain operations
//!
//! Nothing is submitted to a chain. These stand in for operations that, once
//! real, must be confirmed by the user before anything mutating happens.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::parse_params;
use crate::tools::schema::{no_params, object_schema, string_prop};
use crate::tools::{Tool, ToolOutcome};

pub struct ProcessOnchainRequestTool;

#[derive(Debug, Deserialize)]
struct OnchainParams {
    request_id: String,
    #[serde(default = "default_request_type")]
    request_type: String,
}

fn default_request_type() -> String {
    "NOT SPECIFIED".to_string()
}

impl ProcessOnchainRequestTool {
    pub const NAME: &'static str = "process_onchain_request";
}

#[async_trait]
impl Tool for ProcessOnchainRequestTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Process on-chain requests (e.g., token transfers, staking operations). \
         Ask for user confirmation before proceeding."
    }

    fn schema(&self) -> Value {
        object_schema()
            .property("request_id", string_prop("Identifier of the request"), true)
            .property(
                "request_type",
                string_prop("Kind of operation, e.g. transfer or stake"),
                false,
            )
            .build()
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: OnchainParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        info!(
            "[mock] Processing on-chain request {} of type {}",
            params.request_id, params.request_type
        );
        ToolOutcome::Data(json!("Request processed!"))
    }
}

/// Broadcast an update to the other network agents
pub struct NotifyAgentsTool;

impl NotifyAgentsTool {
    pub const NAME: &'static str = "notify_rivalz_agents";
}

#[async_trait]
impl Tool for NotifyAgentsTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Notify relevant Rivalz agents about network updates or user actions."
    }

    fn schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value) -> ToolOutcome {
        info!("[mock] Notifying Rivalz agents about updates");
        ToolOutcome::Data(json!("Agents notified!"))
    }
}
