//! `chunkvault` — add pre-embedded documents to a file-backed vector store
//! and query it by embedding.

mod config;
mod ingest;

use anyhow::Context;
use chunkvault_memory::{FileVectorStore, VectorStore};
use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chunkvault", about = "chunkvault — file-backed vector store")]
struct Cli {
    /// Path to config file (default: chunkvault.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store directory (overrides config)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Maximum number of search results (overrides config)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append documents from a JSON Lines file ("-" for stdin)
    Add {
        /// File with one document per line
        input: PathBuf,
    },
    /// Rank stored documents against a query embedding
    Search {
        /// Comma-separated embedding, e.g. "0.1,0.2,0.3"
        #[arg(allow_hyphen_values = true)]
        embedding: String,
    },
    /// Count records and report embedding dimensions
    Stats,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        use tokio::io::AsyncReadExt;
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read '{}'", input.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = CliConfig::load(cli.config.as_deref()).await?;
    let store_config = config.store_config(cli.dir, cli.top_k);
    let store = FileVectorStore::new(store_config)?;

    match cli.command {
        Commands::Add { input } => {
            let text = read_input(&input).await?;
            let source_name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "stdin".to_string());
            let documents = ingest::parse_documents(&text, &source_name)?;

            tokio::fs::create_dir_all(&store.config().directory)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create store directory '{}'",
                        store.config().directory.display()
                    )
                })?;
            store.add_documents(&documents).await?;
            info!(
                count = documents.len(),
                path = %store.path().display(),
                "Documents added"
            );
        }
        Commands::Search { embedding } => {
            let embedding = ingest::parse_embedding(&embedding).map_err(anyhow::Error::msg)?;
            let report = store.search(&embedding).await?;
            for hit in &report.hits {
                let line = serde_json::json!({
                    "score": hit.score,
                    "id": hit.document.id,
                    "chunk_number": hit.document.chunk_number,
                    "source_name": hit.document.source_name,
                    "source_type": hit.document.source_type,
                    "content": hit.document.content,
                });
                println!("{line}");
            }
            if !report.skipped.is_empty() {
                eprintln!("{} record(s) skipped", report.skipped.len());
            }
        }
        Commands::Stats => {
            let stats = store.stats().await?;
            println!("path:       {}", store.path().display());
            println!("records:    {}", stats.records);
            println!("corrupt:    {}", stats.corrupt);
            let dims: Vec<String> = stats.dimensions.iter().map(ToString::to_string).collect();
            println!("dimensions: {}", dims.join(", "));
            if stats.dimensions.len() > 1 {
                eprintln!("warning: stored embeddings have mixed dimensions");
            }
        }
    }

    Ok(())
}
