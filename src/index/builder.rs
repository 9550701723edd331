//! Index builder
//!
//! Turns loaded documents into a queryable vector index: chunk every
//! document, embed every chunk through the backend, assemble the store.
//! Builds are all-or-nothing; a failed embedding aborts the whole build.

use crate::backend::{RetryPolicy, TextBackend};
use crate::config::RetrievalConfig;
use crate::errors::{CommsError, Result};
use crate::index::chunker::Chunker;
use crate::index::store::VectorIndex;
use crate::loader::Document;
use std::sync::Arc;

/// Builds a [`VectorIndex`] from documents
pub struct IndexBuilder {
    backend: Arc<dyn TextBackend>,
    chunker: Chunker,
    retry: RetryPolicy,
}

impl IndexBuilder {
    pub fn new(
        backend: Arc<dyn TextBackend>,
        config: &RetrievalConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            chunker: Chunker::from_config(config),
            retry,
        }
    }

    /// Chunk and embed all documents into an index.
    ///
    /// An empty document set produces a valid empty index. Any chunk
    /// that fails to embed, or whose embedding disagrees in dimension
    /// with the rest, fails the build.
    pub async fn build(&self, documents: &[Document]) -> Result<VectorIndex> {
        let mut pairs = Vec::new();
        let mut dim = None;

        for doc in documents {
            for chunk in self.chunker.chunk_document(doc) {
                let text = chunk.text.clone();
                let backend = self.backend.clone();
                let embedding = self
                    .retry
                    .execute(|| {
                        let backend = backend.clone();
                        let text = text.clone();
                        async move { backend.embed(&text).await }
                    })
                    .await
                    .map_err(|e| {
                        CommsError::IndexBuild(format!(
                            "embedding failed for chunk {} of '{}': {}",
                            chunk.seq, chunk.source, e
                        ))
                    })?;

                match dim {
                    None => dim = Some(embedding.len()),
                    Some(expected) if expected != embedding.len() => {
                        return Err(CommsError::IndexBuild(format!(
                            "embedding dimension mismatch: expected {}, got {} for chunk {} of '{}'",
                            expected,
                            embedding.len(),
                            chunk.seq,
                            chunk.source
                        )));
                    }
                    Some(_) => {}
                }

                pairs.push((chunk, embedding));
            }
        }

        Ok(VectorIndex::new(pairs))
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }
}
