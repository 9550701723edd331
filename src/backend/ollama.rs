//! Ollama HTTP backend
//!
//! Non-streaming client for the two Ollama endpoints the workflow needs:
//! - POST /api/generate for synthesis and copy generation
//! - POST /api/embeddings for chunk and query vectors

use crate::backend::{GenerateRequest, TextBackend};
use crate::config::BackendConfig;
use crate::errors::{CommsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// HTTP client for the Ollama API
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    llm_model: String,
    embed_model: String,
    temperature: f32,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    system: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaBackend {
    /// Create a new Ollama backend from connection settings
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CommsError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            llm_model: config.llm_model.clone(),
            embed_model: config.embed_model.clone(),
            temperature: config.temperature,
            timeout,
        })
    }

    /// Timed-out requests carry the configured deadline; everything
    /// else stays a plain HTTP error.
    fn classify_send_error(&self, err: reqwest::Error) -> CommsError {
        if err.is_timeout() {
            CommsError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            CommsError::Http(err)
        }
    }

    /// Check if the Ollama server is reachable
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        self.client
            .get(&url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .is_ok()
    }

    /// Assemble the prompt sent alongside the system instruction.
    /// Context precedes the instruction so the model reads the facts
    /// before the ask; an empty context collapses to the bare input.
    fn assemble_prompt(request: &GenerateRequest) -> String {
        if request.context.is_empty() {
            request.input.clone()
        } else {
            format!(
                "Use the following product context to inform your writing:\n\n{}\n\n{}",
                request.context, request.input
            )
        }
    }
}

#[async_trait]
impl TextBackend for OllamaBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let body = OllamaGenerateRequest {
            model: self.llm_model.clone(),
            prompt: Self::assemble_prompt(request),
            system: request.system.clone(),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        if !response.status().is_success() {
            return Err(CommsError::Backend(format!(
                "generate returned status {}",
                response.status()
            )));
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| CommsError::Backend(format!("failed to parse generate response: {}", e)))?;

        Ok(parsed.response)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "model": self.embed_model,
                "prompt": text,
            }))
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        if !response.status().is_success() {
            return Err(CommsError::Backend(format!(
                "embeddings returned status {}",
                response.status()
            )));
        }

        let parsed: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| CommsError::Backend(format!("failed to parse embedding response: {}", e)))?;

        if parsed.embedding.is_empty() {
            return Err(CommsError::Backend(
                "embeddings returned an empty vector".to_string(),
            ));
        }

        Ok(parsed.embedding)
    }
}
