// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recall - persistent memory for coding agents.
//!
//! Every subcommand prints one JSON envelope on stdout and exits non-zero
//! when the envelope reports a failure. Logs go to stderr.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod facts;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use clap::{Parser, Subcommand};
use recall_backend::{detect_scope, BackendSelector, RestTransport, TemporalFactClient};
use recall_config::RecallConfig;
use recall_core::{CommandResult, MemoryBackend, ScopeContext, ScopeKind};
use recall_security::{PrivacyGate, RedactingWriter};

use crate::commands::MemoryCommand;
use crate::facts::FactCommand;

/// Recall - persistent memory for coding agents.
#[derive(Parser, Debug)]
#[command(name = "recall", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project directory the scope is derived from (default: current directory).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Memory(MemoryCommand),
    /// Fetch one memory by id.
    Get {
        memory_id: String,
        #[arg(long)]
        scope: Option<ScopeKind>,
    },
    /// Print the block a session's first turn would receive.
    Context {
        query: String,
        #[arg(long, default_value = "cli")]
        session: String,
    },
    /// Bitemporal fact operations.
    #[command(subcommand)]
    Fact(FactCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => recall_config::load_and_validate_path(path),
        None => recall_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            recall_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let dir = cli
        .dir
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let scope = resolve_scope(&dir);

    let result = run(cli.command, config, &scope).await;
    println!("{}", result.to_json());
    if !result.is_success() {
        std::process::exit(1);
    }
}

fn resolve_scope(dir: &Path) -> ScopeContext {
    let scope = detect_scope(dir);
    tracing::debug!(user = %scope.user_id, project = ?scope.project_id, "scope resolved");
    scope
}

async fn run(command: Commands, config: RecallConfig, scope: &ScopeContext) -> CommandResult {
    match command {
        Commands::Fact(command) => match RestTransport::from_config(&config.backend) {
            Ok(transport) => facts::run(&TemporalFactClient::new(transport), command).await,
            Err(e) => e.into(),
        },
        Commands::Memory(command) => {
            let gate = PrivacyGate::new(config.privacy.redact_secrets);
            let memory = config.memory.clone();
            commands::run(command, selector(config), gate, &memory, scope).await
        }
        Commands::Get {
            memory_id,
            scope: kind,
        } => commands::get(selector(config).as_ref(), &memory_id, kind, scope).await,
        Commands::Context { query, session } => {
            let memory = config.memory.clone();
            commands::preview_context(selector(config), &memory, &session, &query, scope).await
        }
    }
}

/// No dispatcher is installed from the command line, so this resolves to REST.
fn selector(config: RecallConfig) -> Arc<dyn MemoryBackend> {
    Arc::new(BackendSelector::new(config))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `logging.level`.
///
/// Output passes through [`RedactingWriter`] with the configured API key
/// registered, so neither it nor any bearer token is ever printed.
fn init_tracing(config: &RecallConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("recall={},warn", config.logging.level)));

    let secrets = Arc::new(RwLock::new(Vec::new()));
    if let Some(key) = &config.backend.api_key {
        RedactingWriter::<std::io::Stderr>::add_secret(&secrets, key.clone());
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), secrets.clone()))
        .init();
}
