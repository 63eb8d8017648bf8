//! ipfs-store binary entry point.
//!
//! Thin command line front end over `StorageDao`: every command is one DAO call.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ipfs_store::{backend_from_config, StorageDao, StoreConfig};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

/// ipfs-store CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ipfs-store")]
#[command(about = "Store and retrieve content in an IPFS node")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// IPFS RPC API URL, overrides the configuration file.
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a file (stdin when omitted or "-") and print its content identifier.
    Add { file: Option<PathBuf> },
    /// Write the content stored under an identifier to stdout or a file.
    Cat {
        id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ask the node to retain content.
    Pin { id: String },
    /// Release the retention hint on content.
    Unpin { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => StoreConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(api_url) = args.api_url {
        config.ipfs.api_url = api_url;
    }

    tracing::debug!("Backend: {:?}, API: {}", config.backend, config.ipfs.api_url);

    let backend = backend_from_config(&config).context("Failed to create storage backend")?;
    let dao = StorageDao::new(backend);

    match args.command {
        Command::Add { file } => {
            let content = read_input(file).await?;
            let id = dao
                .create_content(&content)
                .await
                .context("Failed to store content")?;
            println!("{id}");
        }
        Command::Cat { id, output } => {
            let content = dao
                .get_content(&id)
                .await
                .with_context(|| format!("Failed to fetch {id}"))?;
            match output {
                Some(path) => tokio::fs::write(&path, &content)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&content).await?;
                    stdout.flush().await?;
                }
            }
        }
        Command::Pin { id } => {
            dao.pin(&id)
                .await
                .with_context(|| format!("Failed to pin {id}"))?;
            println!("pinned {id}");
        }
        Command::Unpin { id } => {
            dao.unpin(&id)
                .await
                .with_context(|| format!("Failed to unpin {id}"))?;
            println!("unpinned {id}");
        }
    }

    Ok(())
}

async fn read_input(file: Option<PathBuf>) -> Result<Vec<u8>> {
    match file {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut content = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut content)
                .await
                .context("Failed to read stdin")?;
            Ok(content)
        }
    }
}
