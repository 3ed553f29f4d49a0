//! Conversation records
//!
//! A conversation is an append-only list of [`Message`]s. Assistant messages
//! remember which agent produced them, tool messages remember which tool call
//! they answer.

use serde::{Deserialize, Serialize};

use crate::agents::AgentId;

/// Role of the message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A single entry in the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Agent name, for assistant messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Set on the tool message answering a transfer call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff: Option<AgentId>,
}

impl Message {
    fn empty(role: Role) -> Self {
        Self {
            role,
            content: None,
            sender: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
            handoff: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Self::empty(Role::User)
        }
    }

    /// Assistant message; empty text is stored as no content
    pub fn assistant(
        sender: impl Into<String>,
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            content: content.filter(|c| !c.is_empty()),
            sender: Some(sender.into()),
            tool_calls,
            ..Self::empty(Role::Assistant)
        }
    }

    /// Result of a tool call
    pub fn tool(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_call_id: Some(call.id.clone()),
            tool_name: Some(call.name.clone()),
            ..Self::empty(Role::Tool)
        }
    }

    /// Answer to a transfer call; carries the new agent out of band
    pub fn handoff(call: &ToolCall, target: AgentId, target_name: &str) -> Self {
        Self {
            handoff: Some(target),
            ..Self::tool(call, serde_json::json!({ "assistant": target_name }).to_string())
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_handoff(&self) -> bool {
        self.handoff.is_some()
    }
}
