//! Projections of the Stack Overflow for Teams graph
//!
//! Each record mirrors the Cypher map projection returned by the queries in
//! `client.rs`, so rows deserialize straight into these types and serialize
//! back out as plain JSON objects for the tool layer.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ============================================================================
// Post (question or answer)
// ============================================================================

/// A question or answer post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Neo4j element id
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,
    /// Creation timestamp as rendered by Cypher `toString()`
    #[serde(default)]
    pub created: Option<String>,
}

impl PostRecord {
    /// Parsed creation timestamp, if the stored value is RFC 3339
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }
}

// ============================================================================
// Comment
// ============================================================================

/// A comment attached to a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    /// Element id of the post this comment is `ON_POST`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
}

// ============================================================================
// User
// ============================================================================

/// The author of posts and comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    /// `displayName` in the graph
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub reputation: Option<i64>,
    #[serde(default)]
    pub bronze_badges: Option<i64>,
    #[serde(default)]
    pub silver_badges: Option<i64>,
    #[serde(default)]
    pub gold_badges: Option<i64>,
    #[serde(default)]
    pub created: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Sort a thread chronologically (oldest first).
///
/// Timestamps that parse as RFC 3339 are compared as instants; anything else
/// falls back to comparing the raw strings. Posts without a timestamp go last.
pub fn sort_by_created(posts: &mut [PostRecord]) {
    posts.sort_by(|a, b| match (&a.created, &b.created) {
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
        (Some(ca), Some(cb)) => match (a.created_at(), b.created_at()) {
            (Some(ta), Some(tb)) => ta.cmp(&tb),
            _ => ca.cmp(cb),
        },
    });
}
