//! In-memory mock implementation of GraphStore for testing.
//!
//! Holds the Q&A graph in `tokio::sync::RwLock<HashMap<K, V>>` collections and
//! answers every query with the same semantics as the Cypher in `client.rs`.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::embeddings::{EmbeddingProvider, MockEmbeddingProvider};
use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    // Entity stores
    pub posts: RwLock<HashMap<String, PostRecord>>,
    pub comments: RwLock<HashMap<String, CommentRecord>>,
    pub users: RwLock<HashMap<String, UserRecord>>,

    // Relationships
    /// answer -> post it replies to (`PARENT`)
    pub parents: RwLock<HashMap<String, String>>,
    /// question -> answer (`ACCEPTED_ANSWER`)
    pub accepted: RwLock<HashMap<String, String>>,
    /// post or comment -> user (`POSTED_BY` / `COMMENTED_BY`)
    pub authors: RwLock<HashMap<String, String>>,

    // Vector indexes
    pub body_index: RwLock<Vec<(String, Vec<f32>)>>,
    pub title_index: RwLock<Vec<(String, Vec<f32>)>>,

    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    /// When set, every query fails with this message
    failure: RwLock<Option<String>>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            comments: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            parents: RwLock::new(HashMap::new()),
            accepted: RwLock::new(HashMap::new()),
            authors: RwLock::new(HashMap::new()),
            body_index: RwLock::new(Vec::new()),
            title_index: RwLock::new(Vec::new()),
            embedder: Arc::new(MockEmbeddingProvider::new(16)),
            top_k: 2,
            failure: RwLock::new(None),
        }
    }

    /// The embedder questions are encoded with
    pub fn embedder(&self) -> Arc<dyn EmbeddingProvider> {
        self.embedder.clone()
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a user.
    pub async fn with_user(self, user: UserRecord) -> Self {
        self.users.write().await.insert(user.id.clone(), user);
        self
    }

    /// Seed a top-level question written by `author`.
    pub async fn with_question(self, post: PostRecord, author: &str) -> Self {
        self.authors
            .write()
            .await
            .insert(post.id.clone(), author.to_string());
        self.posts.write().await.insert(post.id.clone(), post);
        self
    }

    /// Seed an answer with a `PARENT` edge to `parent_id`.
    pub async fn with_answer(self, post: PostRecord, parent_id: &str, author: &str) -> Self {
        self.parents
            .write()
            .await
            .insert(post.id.clone(), parent_id.to_string());
        self.with_question(post, author).await
    }

    /// Mark `answer_id` as the accepted answer of `question_id`.
    pub async fn with_accepted_answer(self, question_id: &str, answer_id: &str) -> Self {
        self.accepted
            .write()
            .await
            .insert(question_id.to_string(), answer_id.to_string());
        self
    }

    /// Seed a comment `ON_POST` `post_id`.
    pub async fn with_comment(self, mut comment: CommentRecord, post_id: &str, author: &str) -> Self {
        comment.post_id = Some(post_id.to_string());
        self.authors
            .write()
            .await
            .insert(comment.id.clone(), author.to_string());
        self.comments
            .write()
            .await
            .insert(comment.id.clone(), comment);
        self
    }

    /// Put a post into the body vector index.
    pub async fn with_body_embedding(self, post_id: &str, embedding: Vec<f32>) -> Self {
        self.body_index
            .write()
            .await
            .push((post_id.to_string(), embedding));
        self
    }

    /// Put a question into the title vector index.
    pub async fn with_title_embedding(self, post_id: &str, embedding: Vec<f32>) -> Self {
        self.title_index
            .write()
            .await
            .push((post_id.to_string(), embedding));
        self
    }

    /// Make every subsequent query fail, as if the database were unreachable.
    pub async fn with_failure(self, message: &str) -> Self {
        *self.failure.write().await = Some(message.to_string());
        self
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn check_available(&self) -> Result<()> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    /// Follow `PARENT` edges up to the question that started the thread
    fn root_of(parents: &HashMap<String, String>, post_id: &str) -> String {
        let mut current = post_id.to_string();
        let mut visited = HashSet::new();
        while let Some(parent) = parents.get(&current) {
            if !visited.insert(current.clone()) {
                break;
            }
            current = parent.clone();
        }
        current
    }

    /// Neo4j-style cosine score in [0, 1]
    fn similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if na == 0.0 || nb == 0.0 {
            return 0.0;
        }
        (1.0 + dot / (na * nb)) / 2.0
    }

    fn nearest(index: &[(String, Vec<f32>)], query: &[f32], k: usize) -> Vec<(String, f32)> {
        let mut scored: Vec<(String, f32)> = index
            .iter()
            .map(|(id, emb)| (id.clone(), Self::similarity(query, emb)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
    }

    fn sorted_by_id<T: Clone>(items: Vec<(&String, &T)>) -> Vec<T> {
        let mut items = items;
        items.sort_by(|a, b| a.0.cmp(b.0));
        items.into_iter().map(|(_, v)| v.clone()).collect()
    }
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn find_relevant_questions(&self, question: &str) -> Result<Vec<PostRecord>> {
        self.check_available().await?;
        let embedding = self.embedder.embed_text(question).await?;

        let parents = self.parents.read().await;
        let mut candidates: Vec<(String, f32)> = Vec::new();
        for (hit, score) in Self::nearest(&self.body_index.read().await, &embedding, self.top_k) {
            candidates.push((Self::root_of(&parents, &hit), score));
        }
        candidates.extend(Self::nearest(
            &self.title_index.read().await,
            &embedding,
            self.top_k,
        ));

        // Group by question, keep best score, first-seen order breaks ties
        let mut best: Vec<(String, f32)> = Vec::new();
        for (id, score) in candidates {
            match best.iter_mut().find(|(seen, _)| *seen == id) {
                Some(entry) => entry.1 = entry.1.max(score),
                None => best.push((id, score)),
            }
        }
        best.sort_by(|a, b| b.1.total_cmp(&a.1));

        let posts = self.posts.read().await;
        Ok(best
            .into_iter()
            .filter_map(|(id, _)| posts.get(&id).cloned())
            .collect())
    }

    async fn get_thread(&self, question_id: &str) -> Result<Vec<PostRecord>> {
        self.check_available().await?;
        let posts = self.posts.read().await;
        if !posts.contains_key(question_id) {
            return Ok(vec![]);
        }

        let parents = self.parents.read().await;
        let mut thread = Vec::new();
        for (id, post) in posts.iter() {
            let mut current = Some(id.clone());
            let mut visited = HashSet::new();
            while let Some(node) = current {
                if node == question_id {
                    thread.push((id, post));
                    break;
                }
                if !visited.insert(node.clone()) {
                    break;
                }
                current = parents.get(&node).cloned();
            }
        }
        Ok(Self::sorted_by_id(thread))
    }

    async fn get_accepted_answer(&self, question_id: &str) -> Result<Option<PostRecord>> {
        self.check_available().await?;
        let accepted = self.accepted.read().await;
        let posts = self.posts.read().await;
        Ok(accepted
            .get(question_id)
            .and_then(|answer_id| posts.get(answer_id))
            .cloned())
    }

    async fn get_comments(&self, post_id: &str) -> Result<Vec<CommentRecord>> {
        self.check_available().await?;
        let comments = self.comments.read().await;
        Ok(Self::sorted_by_id(
            comments
                .iter()
                .filter(|(_, c)| c.post_id.as_deref() == Some(post_id))
                .collect(),
        ))
    }

    async fn get_user(&self, entity_id: &str) -> Result<Option<UserRecord>> {
        self.check_available().await?;
        let authors = self.authors.read().await;
        let users = self.users.read().await;
        Ok(authors
            .get(entity_id)
            .and_then(|user_id| users.get(user_id))
            .cloned())
    }

    async fn get_user_posts(&self, user_id: &str) -> Result<Vec<PostRecord>> {
        self.check_available().await?;
        let authors = self.authors.read().await;
        let posts = self.posts.read().await;
        Ok(Self::sorted_by_id(
            posts
                .iter()
                .filter(|(id, _)| authors.get(*id).map(String::as_str) == Some(user_id))
                .collect(),
        ))
    }

    async fn get_user_comments(&self, user_id: &str) -> Result<Vec<CommentRecord>> {
        self.check_available().await?;
        let authors = self.authors.read().await;
        let comments = self.comments.read().await;
        Ok(Self::sorted_by_id(
            comments
                .iter()
                .filter(|(id, _)| authors.get(*id).map(String::as_str) == Some(user_id))
                .collect(),
        ))
    }

    async fn get_parent_post(&self, entity_id: &str) -> Result<Option<PostRecord>> {
        self.check_available().await?;
        let posts = self.posts.read().await;
        let parent_id = match self.parents.read().await.get(entity_id) {
            Some(parent) => Some(parent.clone()),
            None => self
                .comments
                .read()
                .await
                .get(entity_id)
                .and_then(|c| c.post_id.clone()),
        };
        Ok(parent_id.and_then(|id| posts.get(&id)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn ids(posts: &[PostRecord]) -> Vec<&str> {
        let mut ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_thread_scenario() {
        let store = scenario_store().await;

        let thread = store.get_thread("Q1").await.unwrap();
        assert_eq!(ids(&thread), vec!["A1", "A2", "Q1"]);

        let accepted = store.get_accepted_answer("Q1").await.unwrap().unwrap();
        assert_eq!(accepted.id, "A1");

        let comments = store.get_comments("A1").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, "C1");

        let parent = store.get_parent_post("A1").await.unwrap().unwrap();
        assert_eq!(parent.id, "Q1");

        assert!(store.get_parent_post("Q1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_thread_excludes_other_threads() {
        let store = scenario_store().await;
        let thread = store.get_thread("Q2").await.unwrap();
        assert_eq!(ids(&thread), vec!["Q2"]);
    }

    #[tokio::test]
    async fn test_thread_follows_nested_parent_chain() {
        let store = scenario_store()
            .await
            .with_answer(test_post("A1a", "answer"), "A1", "U2")
            .await;
        let thread = store.get_thread("Q1").await.unwrap();
        assert_eq!(ids(&thread), vec!["A1", "A1a", "A2", "Q1"]);

        // A sub-thread starting at A1 does not climb back to Q1
        let sub = store.get_thread("A1").await.unwrap();
        assert_eq!(ids(&sub), vec!["A1", "A1a"]);
    }

    #[tokio::test]
    async fn test_unknown_question_has_empty_thread() {
        let store = scenario_store().await;
        assert!(store.get_thread("nope").await.unwrap().is_empty());
        assert!(store.get_accepted_answer("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_accepted_answer_is_none() {
        let store = scenario_store().await;
        assert!(store.get_accepted_answer("Q2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_comments_belong_to_requested_post() {
        let store = scenario_store()
            .await
            .with_comment(test_comment("C2"), "Q1", "U1")
            .await;
        for post_id in ["Q1", "A1", "A2"] {
            for comment in store.get_comments(post_id).await.unwrap() {
                assert_eq!(comment.post_id.as_deref(), Some(post_id));
            }
        }
        assert!(store.get_comments("A2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parent_of_comment_is_its_post() {
        let store = scenario_store().await;
        let parent = store.get_parent_post("C1").await.unwrap().unwrap();
        assert_eq!(parent.id, "A1");
    }

    #[tokio::test]
    async fn test_authors_and_their_content() {
        let store = scenario_store().await;

        let asker = store.get_user("Q1").await.unwrap().unwrap();
        assert_eq!(asker.id, "U1");
        let commenter = store.get_user("C1").await.unwrap().unwrap();
        assert_eq!(commenter.id, "U1");
        assert!(store.get_user("missing").await.unwrap().is_none());

        let posts = store.get_user_posts("U2").await.unwrap();
        assert_eq!(ids(&posts), vec!["A1", "A2"]);

        let comments = store.get_user_comments("U1").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].post_id.as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn test_title_and_body_hit_on_same_thread_dedupe() {
        let store = scenario_store().await;
        let q = store.embedder().embed_text("docker error").await.unwrap();
        let store = store
            .with_body_embedding("A1", q.clone())
            .await
            .with_title_embedding("Q1", q)
            .await;

        let found = store.find_relevant_questions("docker error").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "Q1");
    }

    #[tokio::test]
    async fn test_relevance_orders_best_match_first() {
        let store = scenario_store().await;
        let embedder = store.embedder();
        let exact = embedder.embed_text("docker error").await.unwrap();
        let other = embedder.embed_text("kubernetes ingress").await.unwrap();
        let store = store
            .with_title_embedding("Q1", other)
            .await
            .with_body_embedding("A1", exact)
            .await;

        let found = store.find_relevant_questions("docker error").await.unwrap();
        assert!(!found.is_empty());
        // A1's exact body match lifts Q1 to the top
        assert_eq!(found[0].id, "Q1");
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_top_k_limits_each_index() {
        let mut store = scenario_store().await;
        let embedder = store.embedder();
        for i in 0..5 {
            let id = format!("T{}", i);
            let emb = embedder.embed_text(&format!("topic {}", i)).await.unwrap();
            store = store
                .with_question(test_post(&id, "question"), "U1")
                .await
                .with_title_embedding(&id, emb)
                .await;
        }
        let found = store.find_relevant_questions("anything").await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let store = scenario_store().await;
        assert_eq!(
            store.get_thread("Q1").await.unwrap(),
            store.get_thread("Q1").await.unwrap()
        );
        assert_eq!(
            store.get_user_posts("U2").await.unwrap(),
            store.get_user_posts("U2").await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let store = scenario_store().await.with_failure("connection refused").await;
        let err = store.get_thread("Q1").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(store.get_accepted_answer("Q1").await.is_err());
    }
}
