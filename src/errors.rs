//! Error types for the commsflow workflow
//!
//! Every stage of the pipeline fails with its own variant so the
//! top-level caller can tell which stage aborted the run.

use thiserror::Error;

/// Main error type for the communications workflow
#[derive(Error, Debug)]
pub enum CommsError {
    /// Data source missing or unreadable
    #[error("Document load error: {0}")]
    Load(String),

    /// Chunking or embedding failure during index construction.
    /// Index builds are all-or-nothing; a partial index is never returned.
    #[error("Index build error: {0}")]
    IndexBuild(String),

    /// Query-engine or backend failure while retrieving product context
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Backend failure during a copy-generation call
    #[error("Generation error: {0}")]
    Generation(String),

    /// Ollama API errors (non-2xx status, malformed body)
    #[error("Backend API error: {0}")]
    Backend(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic errors with context
    #[error("Workflow error: {0}")]
    Generic(String),
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, CommsError>;

/// Convert anyhow errors to CommsError
impl From<anyhow::Error> for CommsError {
    fn from(err: anyhow::Error) -> Self {
        CommsError::Generic(err.to_string())
    }
}

impl CommsError {
    /// Human-readable name of the failed stage, for console reporting
    pub fn stage(&self) -> &'static str {
        match self {
            CommsError::Load(_) => "load",
            CommsError::IndexBuild(_) => "index-build",
            CommsError::Retrieval(_) => "retrieval",
            CommsError::Generation(_) => "generation",
            CommsError::Backend(_) | CommsError::Http(_) => "backend",
            CommsError::Json(_) => "serialization",
            CommsError::Io(_) => "io",
            CommsError::Config(_) => "config",
            CommsError::Timeout { .. } => "timeout",
            CommsError::Generic(_) => "workflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommsError::Load("directory 'product_data' not found".to_string());
        assert!(err.to_string().contains("product_data"));
    }

    #[test]
    fn test_stage_tags() {
        assert_eq!(CommsError::Load("x".into()).stage(), "load");
        assert_eq!(CommsError::IndexBuild("x".into()).stage(), "index-build");
        assert_eq!(CommsError::Retrieval("x".into()).stage(), "retrieval");
        assert_eq!(CommsError::Generation("x".into()).stage(), "generation");
    }

    #[test]
    fn test_timeout_display() {
        let err = CommsError::Timeout { duration_ms: 120000 };
        assert!(err.to_string().contains("120000"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: CommsError = anyhow::anyhow!("something went sideways").into();
        assert!(matches!(err, CommsError::Generic(_)));
    }
}
