//! ascendia-daemon: the Ascendia mission backend.
//!
//! Single OS process running a Tokio async runtime. Clients talk to the
//! daemon via JSON-RPC over a Unix socket; identity is resolved upstream and
//! passed as `user_id` in each call.
//!
//! ```text
//! ascendia-daemon serve    # RPC server + periodic sweep (default)
//! ascendia-daemon sweep    # one sweep, JSON report on stdout
//! ```

mod commands;
mod config;
mod rpc;
mod scheduler;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use ascendia_db::SchemaCaps;
use ascendia_engine::EngineConfig;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

#[derive(Parser, Debug)]
#[command(name = "ascendia-daemon", version, about = "Daily mission and progression backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Serve JSON-RPC and run the periodic sweep.
    Serve,
    /// Reconcile every user once, print the report and exit.
    Sweep,
}

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Database connection.
    pub db: Arc<tokio::sync::Mutex<rusqlite::Connection>>,
    pub config: DaemonConfig,
    /// Engine settings, fixed at startup.
    pub engine: EngineConfig,
    /// Storage capabilities, detected once.
    pub caps: SchemaCaps,
}

impl DaemonState {
    pub fn new(conn: rusqlite::Connection, config: DaemonConfig) -> anyhow::Result<Self> {
        let engine = config.engine_config()?;
        let caps = SchemaCaps::detect(&conn)?;
        if !caps.reconcile_watermark {
            warn!("profiles.last_reconciled_date missing; reconciliation resumes from last success");
        }
        Ok(Self {
            db: Arc::new(tokio::sync::Mutex::new(conn)),
            config,
            engine,
            caps,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Load config
    let config = DaemonConfig::load()?;

    // 2. Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Ascendia daemon starting");

    // 3. Open database
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    let db_path = config.db_path();
    let conn = ascendia_db::open(&db_path)
        .with_context(|| format!("opening {}", db_path.display()))?;

    // 4. Build daemon state
    let state = Arc::new(DaemonState::new(conn, config)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Sweep => run_sweep(&state).await,
        Command::Serve => serve(state).await,
    }
}

async fn run_sweep(state: &Arc<DaemonState>) -> anyhow::Result<ExitCode> {
    let report = scheduler::run_sweep_once(state).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn serve(state: Arc<DaemonState>) -> anyhow::Result<ExitCode> {
    let socket_path = state.config.socket_path();
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());
    info!("Starting JSON-RPC server on {:?}", socket_path);

    let sweeper = if state.config.sweep.enabled {
        Some(tokio::spawn(scheduler::run(state.clone())))
    } else {
        info!("Periodic sweep disabled");
        None
    };

    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Graceful shutdown
    if let Some(handle) = sweeper {
        handle.abort();
    }
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(ExitCode::SUCCESS)
}
