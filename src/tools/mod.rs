//! Tool system
//!
//! A tool is an explicit capability descriptor: name, description, parameter
//! schema and an async handler. Handlers never fail past their own boundary;
//! errors come back as a `Data` payload carrying an `"error"` key so the model
//! can talk about them. Transfer tools return [`ToolOutcome::Transfer`]
//! instead of data.

mod http;
mod impls;
pub mod schema;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agents::AgentId;
use crate::config::Config;
use crate::error::{RegistryError, ToolError};

pub use http::{http_client, RetryPolicy};
pub use impls::{
    fetch_network_tvl, fetch_price, search_network_info, BraveSearch, ChainTvl,
    FetchNetworkTvlTool, FetchPriceTool, NotifyAgentsTool, PriceLookup, ProcessOnchainRequestTool,
    SearchHit, SearchNetworkInfoTool, SearchOutcome, SearchProvider, SearchSettings, TransferTool,
};

/// What a tool invocation produced
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Payload handed back to the model
    Data(Value),
    /// Switch the conversation to another agent
    Transfer(AgentId),
}

impl ToolOutcome {
    /// Error payload for a typed tool failure
    pub fn from_error(err: &ToolError) -> Self {
        Self::Data(json!({ "error": err.to_string(), "kind": err.kind() }))
    }

    /// Text placed in the tool message; strings are passed through as-is
    pub fn render(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A callable capability exposed to an agent
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> Value;

    async fn execute(&self, params: Value) -> ToolOutcome;

    /// Agent this tool hands off to, if it is a transfer
    fn transfer_target(&self) -> Option<AgentId> {
        None
    }
}

/// Ordered, validated set of tools owned by one agent
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate the descriptor and append it
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyToolName);
        }
        if tool.description().trim().is_empty() {
            return Err(RegistryError::MissingDescription(name.to_string()));
        }
        if !schema::is_object_schema(&tool.schema()) {
            return Err(RegistryError::InvalidSchema(name.to_string()));
        }
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateTool(name.to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn transfer_targets(&self) -> HashSet<AgentId> {
        self.tools.iter().filter_map(|t| t.transfer_target()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Shared collaborators the data tools are built from
#[derive(Clone)]
pub struct ToolEnv {
    pub http: reqwest::Client,
    pub tvl_url: String,
    pub price_url: String,
    pub retry: RetryPolicy,
    pub search: Arc<dyn SearchProvider>,
    pub search_settings: SearchSettings,
}

impl ToolEnv {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = http_client(config.tools.http_timeout()).context("Failed to create HTTP client")?;
        let search = BraveSearch::new(http.clone(), config.endpoints.search_url.clone());

        Ok(Self {
            http,
            tvl_url: config.endpoints.tvl_url.clone(),
            price_url: config.endpoints.price_url.clone(),
            retry: RetryPolicy::from_config(&config.tools),
            search: Arc::new(search),
            search_settings: SearchSettings::from_config(&config.tools),
        })
    }
}
