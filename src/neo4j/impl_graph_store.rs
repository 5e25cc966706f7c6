//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn find_relevant_questions(&self, question: &str) -> anyhow::Result<Vec<PostRecord>> {
        self.find_relevant_questions(question).await
    }

    async fn get_thread(&self, question_id: &str) -> anyhow::Result<Vec<PostRecord>> {
        self.get_thread(question_id).await
    }

    async fn get_accepted_answer(&self, question_id: &str) -> anyhow::Result<Option<PostRecord>> {
        self.get_accepted_answer(question_id).await
    }

    async fn get_comments(&self, post_id: &str) -> anyhow::Result<Vec<CommentRecord>> {
        self.get_comments(post_id).await
    }

    async fn get_user(&self, entity_id: &str) -> anyhow::Result<Option<UserRecord>> {
        self.get_user(entity_id).await
    }

    async fn get_user_posts(&self, user_id: &str) -> anyhow::Result<Vec<PostRecord>> {
        self.get_user_posts(user_id).await
    }

    async fn get_user_comments(&self, user_id: &str) -> anyhow::Result<Vec<CommentRecord>> {
        self.get_user_comments(user_id).await
    }

    async fn get_parent_post(&self, entity_id: &str) -> anyhow::Result<Option<PostRecord>> {
        self.get_parent_post(entity_id).await
    }
}
