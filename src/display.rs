//! Terminal output for a response batch
//!
//! Assistant text is shown under the agent's name. Results of allow-listed
//! tools are shown as system notices. Everything else stays in the history
//! without being printed.

use std::fmt;

use crossterm::style::Stylize;

use crate::message::{Message, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Agent { sender: &'a str, content: &'a str },
    System { content: &'a str },
}

/// Select what the user gets to see from `messages`
pub fn notices<'a>(messages: &'a [Message], system_tools: &[String]) -> Vec<Notice<'a>> {
    messages
        .iter()
        .filter_map(|msg| match msg.role {
            Role::Assistant => Some(Notice::Agent {
                sender: msg.sender.as_deref().unwrap_or("Assistant"),
                content: msg.text()?,
            }),
            Role::Tool if !msg.is_handoff() => {
                let tool = msg.tool_name.as_deref()?;
                if system_tools.iter().any(|t| t == tool) {
                    Some(Notice::System {
                        content: msg.text()?,
                    })
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect()
}

/// A notice ready to print, with or without color
pub struct Styled<'a> {
    pub notice: Notice<'a>,
    pub color: bool,
}

impl fmt::Display for Styled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, content) = match self.notice {
            Notice::Agent { sender, content } => (sender, content),
            Notice::System { content } => ("System", content),
        };
        if !self.color {
            return write!(f, "{}: {}", label, content);
        }
        match self.notice {
            Notice::Agent { .. } => write!(f, "{}: {}", label.blue(), content),
            Notice::System { .. } => write!(f, "{}: {}", label.yellow(), content),
        }
    }
}

/// The input prompt
pub fn user_prompt(color: bool) -> String {
    if color {
        format!("{}: ", "User".dark_grey())
    } else {
        "User: ".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentId;
    use crate::message::ToolCall;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn allow_list() -> Vec<String> {
        vec!["process_onchain_request".to_string(), "fetch_network_tvl".to_string()]
    }

    #[test]
    fn test_notices_filter_batch() {
        let onchain = ToolCall::new("1", "process_onchain_request", json!({"request_id": "r1"}));
        let price = ToolCall::new("2", "fetch_price", json!({"symbol": "eth"}));
        let back = ToolCall::new("3", "transfer_back_to_triage", json!({}));
        let batch = vec![
            Message::assistant("On-Chain Operations Agent", None, vec![onchain.clone()]),
            Message::tool(&onchain, "Request processed!"),
            Message::tool(&price, "{\"usd\":1.0}"),
            Message::handoff(&back, AgentId::Triage, "Rivalz Triage Agent"),
            Message::assistant("On-Chain Operations Agent", Some("Done.".to_string()), vec![]),
        ];

        assert_eq!(
            notices(&batch, &allow_list()),
            vec![
                Notice::System {
                    content: "Request processed!"
                },
                Notice::Agent {
                    sender: "On-Chain Operations Agent",
                    content: "Done."
                },
            ]
        );
    }

    #[test]
    fn test_handoff_never_shown_even_if_allow_listed() {
        let back = ToolCall::new("3", "transfer_back_to_triage", json!({}));
        let batch = vec![Message::handoff(&back, AgentId::Triage, "Rivalz Triage Agent")];
        let allow = vec!["transfer_back_to_triage".to_string()];
        assert!(notices(&batch, &allow).is_empty());
    }

    #[test]
    fn test_plain_rendering() {
        let line = Styled {
            notice: Notice::System {
                content: "Request processed!",
            },
            color: false,
        }
        .to_string();
        insta::assert_snapshot!(line, @"System: Request processed!");

        let line = Styled {
            notice: Notice::Agent {
                sender: "Financial Analyst Agent",
                content: "ETH is at $3000.00",
            },
            color: false,
        }
        .to_string();
        insta::assert_snapshot!(line, @"Financial Analyst Agent: ETH is at $3000.00");
        assert_eq!(user_prompt(false), "User: ");
    }
}
