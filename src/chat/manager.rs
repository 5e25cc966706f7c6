//! ChatManager: answers user questions from the Q&A graph
//!
//! Owns the tool registry and the system prompt, and hands each question to
//! the injected `ToolPlanner`. One question, one independent planning run:
//! nothing is shared between calls.

use super::planner::ToolPlanner;
use super::prompt::build_system_prompt;
use crate::mcp::ToolHandler;
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct ChatManager {
    planner: Arc<dyn ToolPlanner>,
    tools: ToolHandler,
    system_prompt: String,
}

impl ChatManager {
    pub fn new(planner: Arc<dyn ToolPlanner>, tools: ToolHandler) -> Self {
        Self {
            planner,
            tools,
            system_prompt: build_system_prompt(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &ToolHandler {
        &self.tools
    }

    /// Answer a natural-language question
    pub async fn answer(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            bail!("Question must not be empty");
        }

        let started = Instant::now();
        info!(planner = self.planner.name(), "Answering question: {}", question);

        let answer = self
            .planner
            .answer(&self.system_prompt, question, &self.tools)
            .await?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Answer ready"
        );
        Ok(answer)
    }
}
