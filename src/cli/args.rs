//! Command-line argument parsing
//!
//! Flags override values from the config file; anything not given on
//! the command line falls back to `~/.commsflow/config.toml`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Example feature used when no feature name is given
pub const EXAMPLE_FEATURE: &str = "Adaptive Noise Cancellation 2.0 (ANC 2.0)";

/// commsflow - Generate launch communications for a product feature
#[derive(Parser, Debug)]
#[command(name = "commsflow")]
#[command(version = "0.1.0")]
#[command(about = "RAG-backed communications generator for SynapseFlow product features", long_about = None)]
pub struct Args {
    /// Product feature to generate communications for
    #[arg(value_name = "FEATURE")]
    pub feature: Option<String>,

    /// Directory of product documents to index
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Ollama model for generation
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama model for embeddings
    #[arg(long)]
    pub embed_model: Option<String>,

    /// Ollama host
    #[arg(long)]
    pub host: Option<String>,

    /// Ollama port
    #[arg(long)]
    pub port: Option<u16>,

    /// Number of chunks retrieved per query
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Quiet mode (suppress progress and context output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a raw query against the index and print the answer
    Query {
        /// Query text
        text: String,
    },

    /// Display the effective configuration
    Config,
}

impl Args {
    /// Feature to run when no subcommand is given
    pub fn feature_or_example(&self) -> &str {
        self.feature.as_deref().unwrap_or(EXAMPLE_FEATURE)
    }
}
