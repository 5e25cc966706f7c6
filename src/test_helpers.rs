//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating graph records with sensible
//! defaults, and a seeded in-memory store shared by the module tests.
#![allow(dead_code)]

use crate::mcp::handlers::ToolHandler;
use crate::neo4j::mock::MockGraphStore;
use crate::neo4j::models::*;
use std::sync::Arc;

// ============================================================================
// Record factories
// ============================================================================

/// Create a post; `kind` is "question" or "answer"
pub fn test_post(id: &str, kind: &str) -> PostRecord {
    let is_question = kind == "question";
    PostRecord {
        id: id.to_string(),
        title: is_question.then(|| format!("Title of {}", id)),
        body: Some(format!("Body of {}", id)),
        score: Some(0),
        post_type: Some(kind.to_string()),
        created: Some("2024-01-01T00:00:00Z".to_string()),
    }
}

/// Create a post with a specific creation time and score
pub fn test_post_at(id: &str, kind: &str, created: &str, score: i64) -> PostRecord {
    PostRecord {
        created: Some(created.to_string()),
        score: Some(score),
        ..test_post(id, kind)
    }
}

/// Create a comment; its post is assigned when seeded with `with_comment`
pub fn test_comment(id: &str) -> CommentRecord {
    CommentRecord {
        id: id.to_string(),
        text: Some(format!("Comment {}", id)),
        created: Some("2024-01-03T00:00:00Z".to_string()),
        post_id: None,
    }
}

pub fn test_user(id: &str, name: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        name: Some(name.to_string()),
        reputation: Some(100),
        bronze_badges: Some(1),
        silver_badges: Some(0),
        gold_badges: Some(0),
        created: Some("2023-06-01T00:00:00Z".to_string()),
    }
}

// ============================================================================
// Seeded stores
// ============================================================================

/// Two threads:
///
/// - Q1 (by U1) answered by A1 (accepted) and A2, both by U2; C1 by U1 on A1
/// - Q2 (by U1) with no answers
///
/// Vector indexes are left empty so tests choose their own hits.
pub async fn scenario_store() -> MockGraphStore {
    MockGraphStore::new()
        .with_user(test_user("U1", "alice"))
        .await
        .with_user(test_user("U2", "bob"))
        .await
        .with_question(
            test_post_at("Q1", "question", "2024-01-01T09:00:00Z", 5),
            "U1",
        )
        .await
        .with_answer(
            test_post_at("A1", "answer", "2024-01-01T10:00:00Z", 7),
            "Q1",
            "U2",
        )
        .await
        .with_answer(
            test_post_at("A2", "answer", "2024-01-02T08:00:00Z", 1),
            "Q1",
            "U2",
        )
        .await
        .with_accepted_answer("Q1", "A1")
        .await
        .with_comment(test_comment("C1"), "A1", "U1")
        .await
        .with_question(
            test_post_at("Q2", "question", "2024-02-01T09:00:00Z", 0),
            "U1",
        )
        .await
}

/// Tool handler over the seeded scenario
pub async fn scenario_tool_handler() -> ToolHandler {
    ToolHandler::new(Arc::new(scenario_store().await))
}
