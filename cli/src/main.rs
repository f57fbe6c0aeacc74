//! PortSniper CLI - Inspect listening ports and the processes behind them
//!
//! A command-line tool for listing ports, killing processes by PID,
//! and watching system load.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use portsniper_core::{ConfigStore, PlatformRegistryService, RegistryConfig};
use tracing::warn;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "portsniper")]
#[command(author, version, about = "Inspect listening ports and kill the processes behind them")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all listening ports
    #[command(alias = "ls")]
    List {
        /// Filter by port number
        #[arg(short, long)]
        port: Option<u16>,

        /// Filter by process name, PID or address
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Kill a process by PID
    Kill {
        /// Process ID to terminate
        pid: u32,

        /// Send SIGTERM first and only force after a grace period
        #[arg(short, long)]
        graceful: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show CPU and memory usage
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Periodically print port and load summaries
    Watch {
        /// Seconds between refreshes (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many refreshes
        #[arg(short, long)]
        count: Option<u64>,
    },

    /// Show current configuration
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn load_config() -> RegistryConfig {
    let store = match ConfigStore::new() {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "Using default configuration");
            return RegistryConfig::default();
        }
    };

    match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "Using default configuration");
            RegistryConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config().await;
    let service = PlatformRegistryService::platform_with_config(&config);

    match cli.command {
        Some(Commands::List { port, name, json }) => {
            commands::list::run(&service, port, name, json).await?;
        }
        Some(Commands::Kill { pid, graceful, yes }) => {
            if !commands::kill::run(&service, pid, graceful, yes).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Stats { json }) => {
            commands::stats::run(&service, json).await?;
        }
        Some(Commands::Watch { interval, count }) => {
            let interval = interval.unwrap_or(config.port_refresh_interval_secs);
            commands::watch::run(&service, interval, count).await?;
        }
        Some(Commands::Config { json }) => {
            commands::config::show(&config, json)?;
        }
        None => {
            commands::list::run(&service, None, None, false).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
