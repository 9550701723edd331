//! Query engine
//!
//! Answers free-text queries against the vector index: embed the query
//! in the same space the index was built in, retrieve the top-K most
//! similar chunks, then synthesize a natural-language answer from them
//! via the backend. Zero retrieved chunks degrade gracefully to a
//! context-free generation rather than an error.

use crate::backend::{GenerateRequest, RetryPolicy, TextBackend};
use crate::errors::{CommsError, Result};
use crate::index::store::{ScoredChunk, VectorIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// System instruction for answer synthesis over retrieved chunks
const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a precise research assistant. \
Answer the query using only the provided context passages. \
If the context does not cover the query, say what is known and note the gap. \
Do not invent figures or specifications.";

/// A synthesized answer with the chunks that supported it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<ScoredChunk>,
}

/// Retrieval + synthesis over an immutable index
pub struct QueryEngine {
    index: Arc<VectorIndex>,
    backend: Arc<dyn TextBackend>,
    retry: RetryPolicy,
    top_k: usize,
}

impl QueryEngine {
    /// The backend here must be the same one (same embedding model)
    /// used to build the index; mixed embedding spaces silently break
    /// retrieval quality.
    pub fn new(
        index: Arc<VectorIndex>,
        backend: Arc<dyn TextBackend>,
        retry: RetryPolicy,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            backend,
            retry,
            top_k,
        }
    }

    /// Answer a free-text query with retrieved context
    pub async fn query(&self, text: &str) -> Result<QueryResult> {
        let backend = self.backend.clone();
        let query_text = text.to_string();
        let query_embedding = self
            .retry
            .execute(|| {
                let backend = backend.clone();
                let query_text = query_text.clone();
                async move { backend.embed(&query_text).await }
            })
            .await
            .map_err(|e| CommsError::Retrieval(format!("query embedding failed: {}", e)))?;

        let sources = self.index.search(&query_embedding, self.top_k);
        let context = Self::assemble_context(&sources);

        let request = GenerateRequest::new(SYNTHESIS_SYSTEM_PROMPT, context, text);
        let backend = self.backend.clone();
        let answer = self
            .retry
            .execute(|| {
                let backend = backend.clone();
                let request = request.clone();
                async move { backend.generate(&request).await }
            })
            .await
            .map_err(|e| CommsError::Retrieval(format!("answer synthesis failed: {}", e)))?;

        Ok(QueryResult { answer, sources })
    }

    /// Retrieve without synthesis, for inspection and tests
    pub async fn retrieve(&self, text: &str) -> Result<Vec<ScoredChunk>> {
        let backend = self.backend.clone();
        let query_text = text.to_string();
        let query_embedding = self
            .retry
            .execute(|| {
                let backend = backend.clone();
                let query_text = query_text.clone();
                async move { backend.embed(&query_text).await }
            })
            .await
            .map_err(|e| CommsError::Retrieval(format!("query embedding failed: {}", e)))?;

        Ok(self.index.search(&query_embedding, self.top_k))
    }

    /// Format retrieved chunks as numbered context passages
    fn assemble_context(sources: &[ScoredChunk]) -> String {
        if sources.is_empty() {
            return String::new();
        }

        sources
            .iter()
            .enumerate()
            .map(|(i, s)| format!("[Passage {} | {}]\n{}", i + 1, s.chunk.source, s.chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
