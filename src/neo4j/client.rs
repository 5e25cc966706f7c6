//! Neo4j client for reading the Q&A graph

use super::models::*;
use crate::embeddings::EmbeddingProvider;
use anyhow::{Context, Result};
use neo4rs::{query, ConfigBuilder, Graph, Query, Row, Txn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

/// Database the import lands in unless told otherwise
pub const DEFAULT_DATABASE: &str = "neo4j";

// ============================================================================
// Cypher
// ============================================================================

const ENCODE_IN_DATABASE: &str = r#"
    WITH genai.vector.encode($question, $provider, {token: $api_key}) AS embedding
"#;

const ENCODE_PASSED_IN: &str = r#"
    WITH $embedding AS embedding
"#;

/// Body hits are lifted to their root question; title hits already are
/// questions. A question reached both ways keeps its best score.
const RELEVANT_QUESTIONS: &str = r#"
    CALL {
        WITH embedding
        CALL db.index.vector.queryNodes($body_index, $k, embedding) YIELD node AS hit, score
        MATCH (hit)((:Post)-[:PARENT]->(:Post))*(root:Post)
        WHERE NOT EXISTS { (root)-[:PARENT]->(:Post) }
        RETURN collect({node: root, score: score}) AS roots
    }
    CALL {
        WITH embedding
        CALL db.index.vector.queryNodes($title_index, $k, embedding) YIELD node AS titled, score
        RETURN collect({node: titled, score: score}) AS titles
    }
    UNWIND roots + titles AS candidate
    WITH candidate.node AS question, max(candidate.score) AS relevance
    ORDER BY relevance DESC
    RETURN question {.score, .title, .body, .postType, id: elementId(question), created: toString(question.created)} AS question
"#;

const THREAD: &str = r#"
    MATCH (q:Post) WHERE elementId(q) = $question
    MATCH (q)((:Post)<-[:PARENT]-(:Post))*(post:Post)
    WITH DISTINCT post
    RETURN post {.score, .title, .body, .postType, id: elementId(post), created: toString(post.created)} AS post
"#;

const ACCEPTED_ANSWER: &str = r#"
    MATCH (q:Post) WHERE elementId(q) = $question
    OPTIONAL MATCH (q)-[:ACCEPTED_ANSWER]->(post:Post)
    RETURN post {.score, .body, .postType, id: elementId(post), created: toString(post.created)} AS post
"#;

const COMMENTS: &str = r#"
    MATCH (p:Post) WHERE elementId(p) = $post
    MATCH (p)<-[:ON_POST]-(comment:Comment)
    RETURN comment {.text, id: elementId(comment), created: toString(comment.created), postId: elementId(p)} AS comment
"#;

const AUTHOR: &str = r#"
    MATCH (e) WHERE elementId(e) = $entity
    MATCH (e)-[:POSTED_BY|COMMENTED_BY]->(user:User)
    RETURN user {.reputation, .bronzeBadges, .silverBadges, .goldBadges, name: user.displayName, id: elementId(user), created: toString(user.created)} AS user
    LIMIT 1
"#;

const USER_POSTS: &str = r#"
    MATCH (u:User) WHERE elementId(u) = $user
    MATCH (post:Post)-[:POSTED_BY]->(u)
    RETURN post {.score, .title, .body, .postType, id: elementId(post), created: toString(post.created)} AS post
"#;

const USER_COMMENTS: &str = r#"
    MATCH (u:User) WHERE elementId(u) = $user
    MATCH (comment:Comment)-[:COMMENTED_BY]->(u)
    RETURN comment {.text, id: elementId(comment), created: toString(comment.created),
                    postId: head([(comment)-[:ON_POST]->(p:Post) | elementId(p)])} AS comment
"#;

const PARENT_POST: &str = r#"
    MATCH (e) WHERE elementId(e) = $entity
    OPTIONAL MATCH (e)-[:PARENT|ON_POST]->(post:Post)
    RETURN post {.score, .title, .body, .postType, id: elementId(post), created: toString(post.created)} AS post
    LIMIT 1
"#;

// ============================================================================
// Search configuration
// ============================================================================

/// Vector search settings for `find_relevant_questions`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Vector index over post bodies
    pub body_index: String,
    /// Vector index over question titles
    pub title_index: String,
    /// Nearest neighbours fetched from each index
    pub top_k: usize,
    /// Embedding provider name understood by `genai.vector.encode`
    pub genai_provider: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            body_index: "post_embeddings".into(),
            title_index: "title_embeddings".into(),
            top_k: 2,
            genai_provider: "OpenAI".into(),
        }
    }
}

/// Where the question embedding gets computed
#[derive(Clone)]
pub enum QuestionEncoder {
    /// Inside Neo4j through the GenAI plugin; the credential travels as a query parameter
    InDatabase { api_key: Option<String> },
    /// Locally, through an embedding endpoint
    Provider(Arc<dyn EmbeddingProvider>),
}

// ============================================================================
// Client
// ============================================================================

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
    search: SearchConfig,
    encoder: QuestionEncoder,
}

impl Neo4jClient {
    /// Connect to `database` on the server at `uri`
    pub async fn new(
        uri: &str,
        user: &str,
        password: &str,
        database: &str,
        search: SearchConfig,
        encoder: QuestionEncoder,
    ) -> Result<Self> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(user)
            .password(password)
            .db(database)
            .build()
            .context("Invalid Neo4j configuration")?;

        let graph = Graph::connect(config)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
            search,
            encoder,
        };

        client.check_indexes().await;

        Ok(client)
    }

    /// Warn when the vector indexes the search relies on are missing.
    ///
    /// The import owns the schema; this client never creates anything.
    async fn check_indexes(&self) {
        let q = query("SHOW INDEXES YIELD name, type WHERE type = 'VECTOR' RETURN name");

        let mut names: Vec<String> = Vec::new();
        match self.graph.execute(q).await {
            Ok(mut result) => loop {
                match result.next().await {
                    Ok(Some(row)) => {
                        if let Ok(name) = row.get::<String>("name") {
                            names.push(name);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Could not list vector indexes: {}", e);
                        return;
                    }
                }
            },
            Err(e) => {
                tracing::warn!("Could not list vector indexes: {}", e);
                return;
            }
        }

        for wanted in [&self.search.body_index, &self.search.title_index] {
            if !names.iter().any(|n| n == wanted) {
                tracing::warn!(
                    "Vector index '{}' not found; relevance search will fail until it exists",
                    wanted
                );
            }
        }
    }

    /// Run one statement inside a read transaction and collect every row.
    ///
    /// The transaction is rolled back on every path, including when the
    /// statement itself failed.
    async fn read_rows(&self, q: Query) -> Result<Vec<Row>> {
        let mut txn = self
            .graph
            .start_txn()
            .await
            .context("Failed to open read transaction")?;

        let rows = Self::collect_rows(&mut txn, q).await;
        let closed = txn.rollback().await;

        let rows = rows?;
        closed.context("Failed to close read transaction")?;
        Ok(rows)
    }

    async fn collect_rows(txn: &mut Txn, q: Query) -> Result<Vec<Row>> {
        let mut stream = txn.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Project one column of every row
    async fn read_all<T: DeserializeOwned>(&self, q: Query, column: &str) -> Result<Vec<T>> {
        let rows = self.read_rows(q).await?;
        rows.iter()
            .map(|row| {
                row.get::<T>(column)
                    .with_context(|| format!("Unexpected shape for column '{}'", column))
            })
            .collect()
    }

    /// Project one nullable column of the first row
    async fn read_optional<T: DeserializeOwned>(
        &self,
        q: Query,
        column: &str,
    ) -> Result<Option<T>> {
        let rows = self.read_rows(q).await?;
        match rows.first() {
            Some(row) => row
                .get::<Option<T>>(column)
                .with_context(|| format!("Unexpected shape for column '{}'", column)),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Semantic search
    // ========================================================================

    /// Find candidate questions for a free-text question
    pub async fn find_relevant_questions(&self, question: &str) -> Result<Vec<PostRecord>> {
        let q = match &self.encoder {
            QuestionEncoder::InDatabase { api_key } => {
                let api_key = api_key
                    .as_deref()
                    .context("No embedding credential configured (set OPENAI_API_KEY)")?;
                query(&format!("{}{}", ENCODE_IN_DATABASE, RELEVANT_QUESTIONS))
                    .param("question", question)
                    .param("provider", self.search.genai_provider.as_str())
                    .param("api_key", api_key)
            }
            QuestionEncoder::Provider(provider) => {
                let embedding = provider
                    .embed_text(question)
                    .await
                    .context("Failed to embed question")?;
                // neo4rs binds floats as f64
                let embedding: Vec<f64> = embedding.into_iter().map(f64::from).collect();
                query(&format!("{}{}", ENCODE_PASSED_IN, RELEVANT_QUESTIONS))
                    .param("embedding", embedding)
            }
        }
        .param("body_index", self.search.body_index.as_str())
        .param("title_index", self.search.title_index.as_str())
        .param("k", self.search.top_k as i64);

        let questions: Vec<PostRecord> = self.read_all(q, "question").await?;
        tracing::debug!("Relevance search returned {} questions", questions.len());
        Ok(questions)
    }

    // ========================================================================
    // Thread traversal
    // ========================================================================

    /// Get a question and all of its answers
    pub async fn get_thread(&self, question_id: &str) -> Result<Vec<PostRecord>> {
        let q = query(THREAD).param("question", question_id);
        let posts: Vec<PostRecord> = self.read_all(q, "post").await?;
        tracing::debug!("Thread {} has {} posts", question_id, posts.len());
        Ok(posts)
    }

    /// Get the accepted answer of a question
    pub async fn get_accepted_answer(&self, question_id: &str) -> Result<Option<PostRecord>> {
        let q = query(ACCEPTED_ANSWER).param("question", question_id);
        self.read_optional(q, "post").await
    }

    /// Get the comments on a post
    pub async fn get_comments(&self, post_id: &str) -> Result<Vec<CommentRecord>> {
        let q = query(COMMENTS).param("post", post_id);
        self.read_all(q, "comment").await
    }

    /// Get the parent of an answer or comment
    pub async fn get_parent_post(&self, entity_id: &str) -> Result<Option<PostRecord>> {
        let q = query(PARENT_POST).param("entity", entity_id);
        self.read_optional(q, "post").await
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Get the author of a post or comment
    pub async fn get_user(&self, entity_id: &str) -> Result<Option<UserRecord>> {
        let q = query(AUTHOR).param("entity", entity_id);
        self.read_optional(q, "user").await
    }

    /// Get all posts written by a user
    pub async fn get_user_posts(&self, user_id: &str) -> Result<Vec<PostRecord>> {
        let q = query(USER_POSTS).param("user", user_id);
        self.read_all(q, "post").await
    }

    /// Get all comments written by a user
    pub async fn get_user_comments(&self, user_id: &str) -> Result<Vec<CommentRecord>> {
        let q = query(USER_COMMENTS).param("user", user_id);
        self.read_all(q, "comment").await
    }
}
