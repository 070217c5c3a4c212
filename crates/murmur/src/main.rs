//! Murmur CLI binary.
//!
//! Lists and edits posts and resolves protected media against a Murmur
//! service. The session record is read from `MURMUR_SESSION` and held in
//! memory for the life of the process.

use clap::Parser;
use murmur::{
    MemorySessionStore, Murmur, MurmurConfig, MurmurResult, ObservabilityConfig, SessionStore,
    init_observability,
};
use std::sync::Arc;
use tracing::{error, warn};

mod cli;

/// Environment variable carrying the session record JSON.
const SESSION_ENV: &str = "MURMUR_SESSION";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();

    let mut logging = ObservabilityConfig::new().with_json_logs(cli.json_logs);
    if cli.verbose {
        logging = logging.with_log_level("debug");
    }
    if let Err(e) = init_observability(&logging) {
        eprintln!("{}", e);
    }

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli) -> MurmurResult<()> {
    use cli::{Commands, handle_media_command, handle_post_command};

    let config = match &cli.config {
        Some(path) => MurmurConfig::from_file(path)?,
        None => MurmurConfig::load()?,
    };

    let store = Arc::new(MemorySessionStore::new());
    match std::env::var(SESSION_ENV) {
        Ok(record) => store.write(record),
        Err(_) => warn!("{} is not set, requests will be unauthenticated", SESSION_ENV),
    }

    let murmur = Murmur::new(config, store)?;
    let mut events = murmur.subscribe();

    let result = match cli.command {
        Commands::Posts(cmd) => handle_post_command(&murmur, cmd).await,
        Commands::Media(cmd) => handle_media_command(&murmur, cmd).await,
    };

    if let Ok(event) = events.try_recv() {
        eprintln!("{}: sign in again and update {}", event, SESSION_ENV);
    }
    result
}
