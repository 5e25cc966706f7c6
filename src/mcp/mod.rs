//! MCP (Model Context Protocol) server implementation
//!
//! Exposes the Q&A graph tools to MCP clients, and provides the same
//! registry and dispatcher to the in-process chat planner.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use handlers::{ToolError, ToolHandler, NO_ACCEPTED_ANSWER, NO_PARENT};
pub use protocol::*;
pub use server::McpServer;
pub use tools::all_tools;
