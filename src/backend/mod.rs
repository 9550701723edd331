//! Text-generation and embedding backend
//!
//! The workflow talks to the model service through the [`TextBackend`]
//! trait: one generation call and one embedding call, both synchronous
//! request/response. The production implementation is Ollama over HTTP;
//! tests substitute a deterministic mock.

pub mod ollama;
pub mod retry;

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single generation request: fixed system instruction, retrieved
/// context, and the feature-specific human instruction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    /// System instruction establishing role and constraints
    pub system: String,
    /// Retrieved product context (may be empty)
    pub context: String,
    /// The human instruction for this call
    pub input: String,
}

impl GenerateRequest {
    pub fn new(system: impl Into<String>, context: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            context: context.into(),
            input: input.into(),
        }
    }
}

/// Backend contract: generation and embedding against the same service.
///
/// Index-time and query-time embeddings must come from the same
/// implementation and model, or retrieval similarity is meaningless.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Generate a completion for the given request
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Produce an embedding vector for the given text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

pub use ollama::OllamaBackend;
pub use retry::RetryPolicy;
