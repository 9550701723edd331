//! commsflow - Main CLI entry point

use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use commsflow::backend::{OllamaBackend, RetryPolicy};
use commsflow::cli::{Args, Commands};
use commsflow::config::Config;
use commsflow::index::IndexBuilder;
use commsflow::loader::DocumentLoader;
use commsflow::query::QueryEngine;
use commsflow::tool::RetrievalTool;
use commsflow::workflow::CommsOrchestrator;
use commsflow::CommsError;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match args.config.clone() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, &args);

    if let Some(Commands::Config) = args.command {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let backend = Arc::new(OllamaBackend::new(&config.backend)?);

    if !backend.is_available().await {
        eprintln!(
            "{}",
            format!(
                "Ollama is not reachable at {}. Start it with: ollama serve",
                config.backend.base_url()
            )
            .red()
        );
        return Err(anyhow!("Ollama not running"));
    }

    let retry = RetryPolicy::from_config(&config.retry);

    // Build the index once at startup
    let spinner = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    spinner.set_message(format!(
        "Loading documents from '{}'",
        config.data_dir.display()
    ));
    let documents = DocumentLoader::new(&config.data_dir)
        .load()
        .map_err(report_stage)?;

    spinner.set_message(format!(
        "Indexing {} documents (chunking and embedding)",
        documents.len()
    ));
    let builder = IndexBuilder::new(backend.clone(), &config.retrieval, retry.clone());
    let index = Arc::new(builder.build(&documents).await.map_err(report_stage)?);
    spinner.finish_and_clear();

    if !args.quiet {
        println!(
            "{}",
            format!(
                "Indexed {} chunks from {} documents",
                index.len(),
                documents.len()
            )
            .dimmed()
        );
    }

    let engine = QueryEngine::new(index, backend.clone(), retry.clone(), config.retrieval.top_k);

    if let Some(Commands::Query { text }) = &args.command {
        let result = engine.query(text).await.map_err(report_stage)?;
        println!("\n{}", "Query answer:".bold());
        println!("{}", result.answer);
        if !args.quiet {
            for source in &result.sources {
                println!(
                    "{}",
                    format!("  [{:.2}] {}", source.score, source.chunk.source).dimmed()
                );
            }
        }
        return Ok(());
    }

    let tool = RetrievalTool::new(engine);
    let orchestrator = CommsOrchestrator::new(tool, backend, retry);

    let feature = args.feature_or_example();
    let results = if args.quiet {
        orchestrator.run(feature).await.map_err(report_stage)?
    } else {
        println!("\n{}", "=".repeat(50));
        println!("{}", format!("RUNNING WORKFLOW FOR FEATURE: {}", feature).bold());
        println!("{}", "=".repeat(50));

        let context = orchestrator
            .retrieve_product_context(feature)
            .await
            .map_err(report_stage)?;
        println!("\n{}", "--- Retrieved Product Context ---".dimmed());
        println!("{}", context);

        orchestrator
            .generate_from_context(feature, &context)
            .await
            .map_err(report_stage)?
    };

    println!("\n{}", "*".repeat(60));
    println!(
        "{}",
        format!("COMMUNICATIONS MATERIALS GENERATED FOR: {}", results.feature_name).bold()
    );
    println!("{}\n", "*".repeat(60));

    println!("{}", ">>> TWITTER POST:".green().bold());
    println!("{}", results.social_media_post);
    println!("\n{}\n", "-".repeat(30));

    println!("{}", ">>> USER DOCUMENTATION:".blue().bold());
    println!("Q: How does the new {} work?", results.feature_name);
    println!("A: {}", results.faq_answer);

    Ok(())
}

/// Apply command-line overrides onto the loaded configuration
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(model) = &args.model {
        config.backend.llm_model = model.clone();
    }
    if let Some(model) = &args.embed_model {
        config.backend.embed_model = model.clone();
    }
    if let Some(host) = &args.host {
        config.backend.host = host.clone();
    }
    if let Some(port) = args.port {
        config.backend.port = port;
    }
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }
}

/// Surface a stage-tagged error with its stage name on stderr
fn report_stage(err: CommsError) -> anyhow::Error {
    eprintln!("{}", format!("[{}] {}", err.stage(), err).red());
    anyhow!(err)
}
