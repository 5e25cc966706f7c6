//! Chat module: answers questions by letting an LLM plan tool calls
//!
//! The planner is an injected strategy (`ToolPlanner`); the default one
//! speaks the OpenAI Chat Completions protocol.

pub mod config;
pub mod manager;
pub mod openai;
pub mod planner;
pub mod prompt;

pub use config::{ChatConfig, ChatYamlConfig};
pub use manager::ChatManager;
pub use openai::ChatCompletionsPlanner;
pub use planner::ToolPlanner;
pub use prompt::{FALLBACK_ANSWER, GOAL, SYSTEM_PROMPT};
