//! Model resolution step
//!
//! The dispatcher asks a [`ChatModel`] what the current agent says next given
//! the full history. The answer is text, tool calls, or both.

mod client;
mod types;

use anyhow::Result;
use async_trait::async_trait;

use crate::agents::Agent;
use crate::message::{Message, ToolCall};

pub use client::{ApiStatusError, ChatCompletionsClient};

/// One model response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce the next completion for `agent`, seeing the whole history
    async fn complete(&self, agent: &Agent, history: &[Message]) -> Result<Completion>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for std::sync::Arc<T> {
    async fn complete(&self, agent: &Agent, history: &[Message]) -> Result<Completion> {
        (**self).complete(agent, history).await
    }
}
