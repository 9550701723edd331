use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Directory of product documents indexed at startup
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("product_data")
}

/// Ollama connection and model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
    /// Model used for synthesis and copy generation
    pub llm_model: String,
    /// Model used for chunk and query embeddings.
    /// Must match between index build and query time.
    pub embed_model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            llm_model: "llama3".to_string(),
            embed_model: "llama3".to_string(),
            temperature: 0.5,
            request_timeout_secs: 120,
        }
    }
}

impl BackendConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Chunking and nearest-neighbor search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per query
    pub top_k: usize,
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Character overlap between adjacent chunks
    pub chunk_overlap: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            chunk_size: 1024,
            chunk_overlap: 128,
        }
    }
}

/// Bounded-retry settings for backend calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if !config_path.exists() {
            let config = Config::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".commsflow").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: BackendConfig::default(),
            retrieval: RetrievalConfig::default(),
            retry: RetryConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend.llm_model, "llama3");
        assert_eq!(config.backend.port, 11434);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.data_dir, PathBuf::from("product_data"));
    }

    #[test]
    fn test_base_url() {
        let backend = BackendConfig::default();
        assert_eq!(backend.base_url(), "http://127.0.0.1:11434");
    }

    #[test]
    fn test_embed_model_matches_llm_by_default() {
        // Same model serves both roles by default, as Ollama can
        // produce embeddings from the chat model.
        let config = Config::default();
        assert_eq!(config.backend.llm_model, config.backend.embed_model);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.backend.llm_model = "mistral".to_string();
        config.retrieval.top_k = 8;

        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("mistral"));

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(deserialized.backend.llm_model, "mistral");
        assert_eq!(deserialized.retrieval.top_k, 8);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[backend]\nhost = \"10.0.0.5\"\nport = 11434\nllm_model = \"llama3\"\nembed_model = \"llama3\"\ntemperature = 0.5\nrequest_timeout_secs = 120\n").unwrap();
        assert_eq!(config.backend.host, "10.0.0.5");
        assert_eq!(config.retrieval.chunk_size, 1024);
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(config.retrieval.top_k, 4);
    }
}
