//! Command-line front end over the command layer

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::commands::{self, AppState};
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "ipfs-desktop", version, about = "Manage the repository of a local IPFS daemon")]
pub struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Daemon API address (multiaddr or http URL). Overrides the config file.
    #[arg(long, global = true)]
    api: Option<String>,

    /// Seconds a connect or a read may stall before the request fails.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Cap on concurrent object stats while building the storage list.
    #[arg(long, global = true)]
    max_concurrent_stats: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report whether the daemon connection could be bound
    Status,
    /// Pinned objects (indirect pins excluded) with their stats
    Storage,
    /// Raw pin list
    Pins,
    /// Stat a single object
    Stat { hash: String },
    /// Repository size and object count
    Repo,
    /// Connected swarm peers
    Peers,
    /// Identity of the local node
    Id,
    /// Peers providing an object
    Providers { hash: String },
    /// Add a file or directory
    Add { path: PathBuf },
    /// Pin an object by hash, recursively
    Import { hash: String },
    /// Remove a recursive pin
    Unpin { hash: String },
    /// Download an object's content tree into a directory
    Get { hash: String, dest: PathBuf },
    /// Run the repository garbage collector
    Gc,
}

impl Cli {
    fn app_config(&self) -> Result<AppConfig, String> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(api) = &self.api {
            config.api_multiaddr = api.clone();
        }
        if self.timeout.is_some() {
            config.request_timeout_secs = self.timeout;
        }
        if self.max_concurrent_stats.is_some() {
            config.max_concurrent_stats = self.max_concurrent_stats;
        }
        Ok(config)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to render output: {}", e))?;
    println!("{}", rendered);
    Ok(())
}

async fn dispatch(state: &AppState, command: Command) -> Result<(), String> {
    if let Command::Status = command {
        let bound = commands::start_daemon_connection(state).await;
        return print_json(&serde_json::json!({
            "endpoint": state.config().api_multiaddr,
            "available": bound.is_ok() && commands::daemon_available(state).await,
        }));
    }

    commands::start_daemon_connection(state).await?;

    match command {
        Command::Status => Ok(()),
        Command::Storage => print_json(&commands::storage_list(state).await?),
        Command::Pins => print_json(&commands::list_pins(state).await?),
        Command::Stat { hash } => print_json(&commands::object_stat(state, hash).await?),
        Command::Repo => print_json(&commands::repo_info(state).await?),
        Command::Peers => print_json(&commands::swarm_peers(state).await?),
        Command::Id => print_json(&commands::node_identity(state).await?),
        Command::Providers { hash } => print_json(&commands::find_providers(state, hash).await?),
        Command::Add { path } => {
            let hash = commands::add_path(state, path.to_string_lossy().into_owned()).await?;
            print_json(&serde_json::json!({ "hash": hash }))
        }
        Command::Import { hash } => print_json(&commands::import_object(state, hash).await?),
        Command::Unpin { hash } => print_json(&commands::unpin_object(state, hash).await?),
        Command::Get { hash, dest } => print_json(
            &commands::download_object(state, hash, dest.to_string_lossy().into_owned()).await?,
        ),
        Command::Gc => print_json(&commands::run_garbage_collector(state).await?),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Installing the subscriber also routes `log` records into it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = match cli.app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    let state = AppState::new(config);
    match runtime.block_on(dispatch(&state, cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
