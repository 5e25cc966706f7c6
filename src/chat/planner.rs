//! ToolPlanner trait definition
//!
//! A planner decides which tools to call for a question and composes the
//! final answer from their results. Same pattern as `GraphStore`:
//! async trait + Send + Sync for `Arc<dyn ToolPlanner>` usage.

use crate::mcp::ToolHandler;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ToolPlanner: Send + Sync {
    /// Answer `question`, calling tools through `tools` as often as needed.
    ///
    /// Returns the fallback phrase when the evidence is insufficient. Errors
    /// are reserved for failures talking to the model itself.
    async fn answer(
        &self,
        system_prompt: &str,
        question: &str,
        tools: &ToolHandler,
    ) -> Result<String>;

    fn name(&self) -> &str;
}
