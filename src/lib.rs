//! Rivalz Agents - a terminal multi-agent router
//!
//! A triage agent reads what the user wants and hands the conversation to a
//! specialist: on-chain operations or financial analysis. Specialists call
//! tools (TVL, prices, search, mocked on-chain actions) and can hand the
//! conversation back.
//!
//! # Example
//!
//! ```no_run
//! use rivalz_agents::{AgentRegistry, ChatCompletionsClient, Config, Dispatcher, ToolEnv};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let registry = AgentRegistry::standard(&ToolEnv::from_config(&config)?)?;
//!     let model = ChatCompletionsClient::from_env(&config.llm)?;
//!     let dispatcher = Dispatcher::new(model, registry, config.llm.max_turns);
//!
//!     let state = dispatcher.start();
//!     let (state, response) = dispatcher.turn(state, "What is the TVL of Ethereum?").await;
//!     for message in response?.messages {
//!         println!("{:?}", message);
//!     }
//!     println!("Now talking to {:?}", state.active());
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod message;
pub mod tools;

#[cfg(feature = "cli")]
pub mod display;

pub use agents::{Agent, AgentId, AgentRegistry};
pub use config::Config;
pub use dispatch::{ConversationState, Dispatcher, Response};
pub use error::{RegistryError, ToolError};
pub use llm::{ChatCompletionsClient, ChatModel, Completion};
pub use message::{Message, Role, ToolCall};
pub use tools::{Tool, ToolEnv, ToolOutcome, ToolSet};
