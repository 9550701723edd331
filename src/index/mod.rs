//! Vector index construction and storage
//!
//! Documents are split into bounded chunks, each chunk is embedded via
//! the backend, and the (chunk, vector) pairs are held in an in-memory
//! index supporting exact top-K cosine search. The index is built once
//! at startup and is read-only afterwards.

pub mod builder;
pub mod chunker;
pub mod store;

pub use builder::IndexBuilder;
pub use chunker::{Chunk, Chunker};
pub use store::{ScoredChunk, VectorIndex};
