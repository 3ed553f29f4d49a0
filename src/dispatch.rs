//! Agent handoff dispatch loop
//!
//! [`Dispatcher::run`] is the resolution step: it asks the model for the
//! current agent's next move, executes any tool calls, and repeats until the
//! model answers without calling tools. Transfers only move the agent
//! pointer, and only once every tool message of the batch has been recorded.
//!
//! [`Dispatcher::turn`] is the controller around it. It takes the
//! [`ConversationState`] by value and hands back the updated one.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agents::{Agent, AgentId, AgentRegistry};
use crate::llm::ChatModel;
use crate::message::{Message, ToolCall};
use crate::tools::ToolOutcome;

/// Output of one resolution step
#[derive(Debug, Clone)]
pub struct Response {
    /// Messages produced during the step, in order
    pub messages: Vec<Message>,
    /// Agent active at the end of the step
    pub agent: AgentId,
}

/// History plus the current agent, owned by the dispatch controller
#[derive(Debug, Clone)]
pub struct ConversationState {
    id: Uuid,
    messages: Vec<Message>,
    active: AgentId,
}

impl ConversationState {
    pub fn new(active: AgentId) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            active,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn active(&self) -> AgentId {
        self.active
    }
}

pub struct Dispatcher<M> {
    model: M,
    registry: AgentRegistry,
    max_turns: usize,
}

impl<M: ChatModel> Dispatcher<M> {
    pub fn new(model: M, registry: AgentRegistry, max_turns: usize) -> Self {
        Self {
            model,
            registry,
            max_turns: max_turns.max(1),
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Fresh conversation pointed at the triage agent
    pub fn start(&self) -> ConversationState {
        ConversationState::new(AgentRegistry::INITIAL)
    }

    fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.registry
            .get(id)
            .with_context(|| format!("Agent {:?} is not registered", id))
    }

    /// Handle one line of user input.
    ///
    /// On success the user message and the produced batch are appended and
    /// the agent pointer moves to the response's agent. On failure the state
    /// comes back exactly as it was passed in.
    pub async fn turn(
        &self,
        mut state: ConversationState,
        input: &str,
    ) -> (ConversationState, Result<Response>) {
        let before = state.messages.len();
        state.messages.push(Message::user(input));

        match self.run(state.active, &state.messages).await {
            Ok(response) => {
                state.messages.extend(response.messages.iter().cloned());
                if response.agent != state.active {
                    info!(
                        "Conversation {}: {:?} -> {:?}",
                        state.id, state.active, response.agent
                    );
                }
                state.active = response.agent;
                (state, Ok(response))
            }
            Err(e) => {
                state.messages.truncate(before);
                (state, Err(e))
            }
        }
    }

    /// Resolve the conversation until the active agent answers without tools
    pub async fn run(&self, agent: AgentId, history: &[Message]) -> Result<Response> {
        let mut active = agent;
        let mut context = history.to_vec();
        let start = context.len();

        for step in 1..=self.max_turns {
            let agent = self.agent(active)?;
            debug!("Step {}: asking {}", step, agent.name());

            let completion = self.model.complete(agent, &context).await?;
            let calls = completion.tool_calls.clone();
            context.push(Message::assistant(agent.name(), completion.content, completion.tool_calls));

            if calls.is_empty() {
                break;
            }

            let mut handoff = None;
            for call in &calls {
                let (message, target) = self.execute(agent, call).await;
                context.push(message);
                if target.is_some() {
                    handoff = target;
                }
            }

            if let Some(target) = handoff {
                debug!("Handoff: {:?} -> {:?}", active, target);
                active = target;
            }

            if step == self.max_turns {
                warn!("Stopped after {} model calls with tool calls pending", self.max_turns);
            }
        }

        Ok(Response {
            messages: context.split_off(start),
            agent: active,
        })
    }

    /// Run one tool call, returning its message and any handoff target
    async fn execute(&self, agent: &Agent, call: &ToolCall) -> (Message, Option<AgentId>) {
        let Some(tool) = agent.tools().get(&call.name) else {
            warn!("{} called unknown tool {}", agent.name(), call.name);
            return (
                Message::tool(call, format!("Error: Tool {} not found.", call.name)),
                None,
            );
        };

        debug!("{} -> {}({})", agent.name(), call.name, call.arguments);
        match tool.execute(call.arguments.clone()).await {
            ToolOutcome::Data(value) => (Message::tool(call, ToolOutcome::render(&value)), None),
            ToolOutcome::Transfer(target) => match self.registry.get(target) {
                Some(next) => (Message::handoff(call, target, next.name()), Some(target)),
                None => {
                    warn!("{} transfers to unregistered {:?}", call.name, target);
                    (
                        Message::tool(call, format!("Error: Agent {:?} is not available.", target)),
                        None,
                    )
                }
            },
        }
    }
}
