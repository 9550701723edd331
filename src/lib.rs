//! commsflow - RAG-backed communications generator
//!
//! Generates launch communications (a social media post and an FAQ
//! answer) for SynapseFlow product features. Product documents are
//! loaded from a directory, chunked and embedded into an in-memory
//! vector index, and each feature request retrieves context from that
//! index to ground two independent copy-generation calls against a
//! local Ollama backend.
//!
//! # Pipeline
//!
//! orchestrator -> retrieval tool -> query engine -> vector index
//! (built once at startup from loaded documents) -> Ollama backend

pub mod errors;
pub mod config;
pub mod backend;
pub mod loader;
pub mod index;
pub mod query;
pub mod tool;
pub mod workflow;
pub mod cli;

// Re-export commonly used types
pub use errors::{CommsError, Result};
pub use workflow::{CommsOrchestrator, WorkflowResult};
