//! Agent definitions and the registry the dispatcher routes between
//!
//! An agent is configuration only: a name, instructions for the model, and
//! the ordered set of tools it may call. Agents are built once at startup and
//! never change afterwards. The only wiring step appends transfer tools so
//! that agents can hand the conversation to each other.

pub mod prompts;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::tools::{
    FetchNetworkTvlTool, FetchPriceTool, NotifyAgentsTool, ProcessOnchainRequestTool,
    SearchNetworkInfoTool, Tool, ToolEnv, ToolSet, TransferTool,
};

/// Identity of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    Triage,
    OnChainOps,
    FinancialAnalyst,
}

impl AgentId {
    pub const ALL: [AgentId; 3] = [AgentId::Triage, AgentId::OnChainOps, AgentId::FinancialAnalyst];

    /// Used to derive transfer tool names
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Triage => "triage",
            Self::OnChainOps => "onchain_operations",
            Self::FinancialAnalyst => "financial_analyst",
        }
    }
}

/// A named behavioral configuration
#[derive(Clone)]
pub struct Agent {
    id: AgentId,
    name: String,
    instructions: String,
    tools: ToolSet,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            instructions: instructions.into(),
            tools: ToolSet::empty(),
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, RegistryError> {
        self.tools.register(tool)?;
        Ok(self)
    }

    pub fn with_transfer_to(self, target: &Agent) -> Result<Self, RegistryError> {
        self.with_tool(Arc::new(TransferTool::to(target)))
    }

    pub fn with_transfer_back_to(self, target: &Agent) -> Result<Self, RegistryError> {
        self.with_tool(Arc::new(TransferTool::back_to(target)))
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tools", &self.tools.names())
            .finish()
    }
}

/// Fixed set of agents, validated so that every transfer lands somewhere
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    /// The agent every conversation starts with
    pub const INITIAL: AgentId = AgentId::Triage;

    pub fn new(agents: Vec<Agent>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for agent in &agents {
            if !seen.insert(agent.id()) {
                return Err(RegistryError::DuplicateAgent(agent.id()));
            }
        }

        if !seen.contains(&Self::INITIAL) {
            return Err(RegistryError::MissingAgent(Self::INITIAL));
        }

        for agent in &agents {
            for tool in agent.tools().iter() {
                if let Some(target) = tool.transfer_target() {
                    if !seen.contains(&target) {
                        return Err(RegistryError::DanglingTransfer {
                            from: agent.id(),
                            tool: tool.name().to_string(),
                            target,
                        });
                    }
                }
            }
        }

        Ok(Self { agents })
    }

    /// Triage, On-Chain Operations and Financial Analyst, wired together
    pub fn standard(env: &ToolEnv) -> Result<Self, RegistryError> {
        let onchain = Agent::new(
            AgentId::OnChainOps,
            "On-Chain Operations Agent",
            prompts::ONCHAIN_OPERATIONS,
        )
        .with_tool(Arc::new(ProcessOnchainRequestTool))?
        .with_tool(Arc::new(NotifyAgentsTool))?;

        let analyst = Agent::new(
            AgentId::FinancialAnalyst,
            "Financial Analyst Agent",
            prompts::FINANCIAL_ANALYST,
        )
        .with_tool(Arc::new(FetchNetworkTvlTool::new(env)))?
        .with_tool(Arc::new(FetchPriceTool::new(env)))?
        .with_tool(Arc::new(SearchNetworkInfoTool::new(env)))?;

        let triage = Agent::new(AgentId::Triage, "Rivalz Triage Agent", prompts::TRIAGE)
            .with_transfer_to(&onchain)?
            .with_transfer_to(&analyst)?;

        let onchain = onchain.with_transfer_back_to(&triage)?;
        let analyst = analyst.with_transfer_back_to(&triage)?;

        Self::new(vec![triage, onchain, analyst])
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;

    fn standard() -> AgentRegistry {
        let env = ToolEnv::from_config(&Config::default()).unwrap();
        AgentRegistry::standard(&env).unwrap()
    }

    #[test]
    fn test_standard_registry_tools() {
        let registry = standard();
        assert_eq!(registry.len(), 3);

        let names = |id| registry.get(id).unwrap().tools().names();
        assert_eq!(
            names(AgentId::Triage),
            vec!["transfer_to_onchain_operations", "transfer_to_financial_analyst"]
        );
        assert_eq!(
            names(AgentId::OnChainOps),
            vec!["process_onchain_request", "notify_rivalz_agents", "transfer_back_to_triage"]
        );
        assert_eq!(
            names(AgentId::FinancialAnalyst),
            vec![
                "fetch_network_tvl",
                "fetch_price",
                "search_network_info",
                "transfer_back_to_triage"
            ]
        );
    }

    #[test]
    fn test_every_transfer_target_is_registered() {
        let registry = standard();
        for agent in registry.iter() {
            for target in agent.tools().transfer_targets() {
                assert!(registry.get(target).is_some());
            }
        }
    }

    #[test]
    fn test_rejects_duplicate_agents() {
        let triage = Agent::new(AgentId::Triage, "A", "a");
        let again = Agent::new(AgentId::Triage, "B", "b");
        assert_eq!(
            AgentRegistry::new(vec![triage, again]).unwrap_err(),
            RegistryError::DuplicateAgent(AgentId::Triage)
        );
    }

    #[test]
    fn test_requires_triage() {
        let analyst = Agent::new(AgentId::FinancialAnalyst, "Analyst", "analyze");
        assert_eq!(
            AgentRegistry::new(vec![analyst]).unwrap_err(),
            RegistryError::MissingAgent(AgentId::Triage)
        );
    }

    #[test]
    fn test_rejects_dangling_transfer() {
        let analyst = Agent::new(AgentId::FinancialAnalyst, "Analyst", "analyze");
        let triage = Agent::new(AgentId::Triage, "Triage", "route")
            .with_transfer_to(&analyst)
            .unwrap();

        assert_eq!(
            AgentRegistry::new(vec![triage]).unwrap_err(),
            RegistryError::DanglingTransfer {
                from: AgentId::Triage,
                tool: "transfer_to_financial_analyst".to_string(),
                target: AgentId::FinancialAnalyst,
            }
        );
    }
}
