//! In-memory vector index
//!
//! Holds (chunk, embedding) pairs and answers exact top-K nearest
//! neighbor queries by cosine similarity. Built once per process and
//! read-only afterwards; an empty index is valid and returns no results.

use crate::index::chunker::Chunk;
use serde::{Deserialize, Serialize};

/// A chunk paired with its similarity score for a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Immutable in-memory vector index
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dim: usize,
}

impl VectorIndex {
    /// Build an index from (chunk, embedding) pairs.
    ///
    /// All embeddings must share one dimension; the builder guarantees
    /// this before construction.
    pub fn new(pairs: Vec<(Chunk, Vec<f32>)>) -> Self {
        let dim = pairs.first().map(|(_, v)| v.len()).unwrap_or(0);
        let entries = pairs
            .into_iter()
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();
        Self { entries, dim }
    }

    /// Exact top-K search by cosine similarity.
    ///
    /// Ties break by insertion order, so results are deterministic for
    /// a fixed index and query vector.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        if self.entries.is_empty() || query.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect()
    }

    /// Embedding dimension, 0 for an empty index
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity between two vectors of equal length.
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
