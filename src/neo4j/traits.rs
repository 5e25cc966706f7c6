//! GraphStore trait definition
//!
//! Defines the abstract read interface over the Q&A graph.
//! This trait mirrors the public query methods of `Neo4jClient`,
//! enabling testing with mock implementations and future backend swaps.

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for all graph read operations.
///
/// Every method runs one read-only query. Absent optional relations are
/// `None`; only data-access faults are errors.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Candidate questions for a free-text question, most relevant first.
    ///
    /// Runs vector search over post bodies and titles, lifts body hits to
    /// their root question and returns the deduplicated union.
    async fn find_relevant_questions(&self, question: &str) -> Result<Vec<PostRecord>>;

    /// The question plus every post reaching it through `PARENT` (unsorted)
    async fn get_thread(&self, question_id: &str) -> Result<Vec<PostRecord>>;

    /// The accepted answer of a question
    async fn get_accepted_answer(&self, question_id: &str) -> Result<Option<PostRecord>>;

    /// All comments `ON_POST` the given post
    async fn get_comments(&self, post_id: &str) -> Result<Vec<CommentRecord>>;

    /// The author of a post or comment
    async fn get_user(&self, entity_id: &str) -> Result<Option<UserRecord>>;

    /// Posts written by a user
    async fn get_user_posts(&self, user_id: &str) -> Result<Vec<PostRecord>>;

    /// Comments written by a user
    async fn get_user_comments(&self, user_id: &str) -> Result<Vec<CommentRecord>>;

    /// The post an answer or comment hangs off
    async fn get_parent_post(&self, entity_id: &str) -> Result<Option<PostRecord>>;
}
