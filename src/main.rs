//! drive-watch: navigate a seeded document store and print state snapshots.
//!
//! Wires configuration, logging, the in-memory gateway and the folder
//! navigator together. Every published navigation state is printed to
//! stdout as JSON until the state has been quiet for `--settle-ms`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use drive_core::config::AppConfig;
use drive_core::error::AppError;
use drive_core::types::{FolderId, UserId};
use drive_gateway::{MemoryDocumentStore, Seed};
use drive_sync::{FolderStateStore, NavigationState, Navigator};

/// Watch a folder's live listings in a seeded document store.
#[derive(Debug, Parser)]
#[command(name = "drive-watch", version, about)]
struct Cli {
    /// JSON seed file with `folders` and `files` documents.
    #[arg(long)]
    seed: PathBuf,

    /// Owner whose documents are listed.
    #[arg(long)]
    user: Option<String>,

    /// Folder to open; the root when omitted.
    #[arg(long)]
    folder: Option<String>,

    /// Configuration environment overlay (`config/<env>.toml`).
    #[arg(long, default_value = "development")]
    env: String,

    /// Stop after no state change for this many milliseconds.
    #[arg(long, default_value_t = 200)]
    settle_ms: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("drive-watch failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr so stdout carries only snapshots.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting drive-watch v{}", env!("CARGO_PKG_VERSION"));

    let seed = Seed::from_file(&cli.seed).await?;
    tracing::info!(
        folders = seed.folders.len(),
        files = seed.files.len(),
        "Seed loaded from '{}'",
        cli.seed.display()
    );
    let gateway = Arc::new(MemoryDocumentStore::from_seed(seed));

    let (_identity_tx, identity_rx) = watch::channel(cli.user.map(UserId::from));
    let store = FolderStateStore::new(gateway, None, &config.sync);
    let navigator = Navigator::spawn(store, identity_rx, config.sync.command_buffer_size);
    let mut states = navigator.state();

    navigator.select(cli.folder.map(FolderId::from), None).await?;

    let settle = Duration::from_millis(cli.settle_ms);
    let mut last: Option<Arc<NavigationState>> = None;
    loop {
        let current = Arc::clone(&states.borrow_and_update());
        if last.as_deref() != Some(current.as_ref()) {
            print_state(&current)?;
            last = Some(current);
        }

        match tokio::time::timeout(settle, states.changed()).await {
            Ok(Ok(())) => continue,
            Ok(Err(_)) => {
                tracing::warn!("Navigator stopped publishing");
                break;
            }
            Err(_) => break,
        }
    }

    navigator.shutdown().await?;
    tracing::info!("drive-watch finished");
    Ok(())
}

fn print_state(state: &NavigationState) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}
