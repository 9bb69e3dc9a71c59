//! Beatline CLI
//!
//! Entry points around the retrieval subsystem: the offline indexer, an
//! ask command that plays the chat route's role, and store statistics.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, IndexCommand, StatsCommand};
use beatline_core::{config::RagConfig, logging, AppResult};
use std::path::PathBuf;

/// Beatline - DJ website backend with RAG-grounded chat
#[derive(Parser, Debug)]
#[command(name = "beatline")]
#[command(about = "Index website content and answer questions grounded in it", long_about = None)]
#[command(version)]
struct Cli {
    /// Store directory holding index.bin and meta.json
    #[arg(short, long, global = true, env = "BEATLINE_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the vector store from configured content roots (full rebuild)
    Index(IndexCommand),

    /// Ask a question, grounded in retrieved site content
    Ask(AskCommand),

    /// Show store statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = RagConfig::load()?.with_overrides(
        cli.store_dir,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::debug!("Store directory: {:?}", config.store_dir);
    tracing::debug!(
        "Embedding: {} ({}, {}-dim)",
        config.embedding.provider,
        config.embedding.model,
        config.embedding.dimensions
    );

    let result = match cli.command {
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }

    result
}
