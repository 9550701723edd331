//! Document chunker
//!
//! Splits document text at sentence boundaries into chunks of bounded
//! size, with configurable overlap between adjacent chunks. Output is
//! deterministic for the same input and configuration.

use crate::config::RetrievalConfig;
use crate::loader::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded slice of a source document, the unit of retrieval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub id: Uuid,
    /// Source document this chunk was cut from
    pub doc_id: Uuid,
    /// Source file path, carried through for attribution
    pub source: String,
    pub text: String,
    /// Position of this chunk within its document
    pub seq: usize,
}

/// Sentence-boundary-aware chunker
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        // Overlap must leave forward progress or chunking never terminates
        let overlap = overlap.min(chunk_size.saturating_sub(1));
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split one document into chunks carrying its back-reference
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        self.split(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(seq, text)| Chunk {
                id: Uuid::new_v4(),
                doc_id: doc.id,
                source: doc.path.display().to_string(),
                text,
                seq,
            })
            .collect()
    }

    /// Split raw text into pieces of at most `chunk_size` characters,
    /// preferring sentence boundaries, with `overlap` characters of
    /// trailing context prepended to each subsequent piece.
    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = trimmed.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let hard_end = (start + self.chunk_size).min(chars.len());

            // Prefer the last sentence boundary inside the window
            let end = if hard_end < chars.len() {
                match Self::last_boundary(&chars[start..hard_end]) {
                    Some(rel) if rel > 0 => start + rel,
                    _ => hard_end,
                }
            } else {
                hard_end
            };

            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim().to_string();
            if !piece.is_empty() {
                pieces.push(piece);
            }

            if end >= chars.len() {
                break;
            }
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        pieces
    }

    /// Index just past the last sentence-ending character in the window
    fn last_boundary(window: &[char]) -> Option<usize> {
        window
            .iter()
            .rposition(|c| matches!(c, '.' | '?' | '!' | '\n'))
            .map(|i| i + 1)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }
}
