//! Pathfinder CLI - Command line interface for constrained path computation

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, path, topology};
use config::{config_file_path, Config};
use output::OutputFormat;
use pathfinder_store::{SnapshotStore, TopologyDocument};

#[derive(Parser)]
#[command(name = "pathfinder")]
#[command(author, version, about = "Constrained shortest paths over network topologies")]
pub struct Cli {
    /// Config file
    #[arg(long, env = "PATHFINDER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Topology document (.json or .toml)
    #[arg(short, long, global = true)]
    pub topology: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// All shortest paths between two elements
    Paths(path::PathsArgs),
    /// Shortest paths over links satisfying every constraint
    Constrained(path::ConstrainedArgs),
    /// Constrained paths, relaxing constraints when none satisfy them all
    Flexible(path::FlexibleArgs),
    /// Inspect the topology document
    Topology(topology::TopologyArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with a loaded topology
pub struct AppContext {
    pub store: SnapshotStore,
    pub format: OutputFormat,
}

impl AppContext {
    pub async fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = cli.config_path();
        let config = Config::load(&config_path);
        tracing::debug!("Using config at: {:?}", config_path);

        let format = cli
            .format
            .as_deref()
            .unwrap_or(&config.format)
            .parse::<OutputFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let Some(topology) = cli.topology.clone().or_else(|| config.topology.clone()) else {
            anyhow::bail!(
                "No topology given. Pass --topology <FILE> or run `pathfinder config set topology <FILE>`"
            );
        };

        let store = SnapshotStore::new(config.topology_options()?, config.query_config()?);
        let document = TopologyDocument::load(&topology)
            .with_context(|| format!("Failed to read topology {}", topology.display()))?;
        let summary = store
            .load_document(&document)
            .with_context(|| format!("Invalid topology {}", topology.display()))?;
        tracing::info!(
            "Loaded topology {:?}: {} switch(es), {} interface(s), {} link(s)",
            topology,
            summary.switches_added,
            summary.interfaces_added,
            summary.links_added
        );

        Ok(Self { store, format })
    }

    /// Print a rendered result unless `--quiet` was given
    pub fn emit(&self, cli: &Cli, rendered: String) {
        if !cli.quiet {
            println!("{}", rendered);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting pathfinder CLI");

    match &cli.command {
        Commands::Config(args) => commands::config::run(args, &cli)?,
        Commands::Completions(args) => completions::run(args)?,
        Commands::Paths(args) => {
            let ctx = AppContext::new(&cli).await?;
            path::run_paths(args, &cli, &ctx).await?
        }
        Commands::Constrained(args) => {
            let ctx = AppContext::new(&cli).await?;
            path::run_constrained(args, &cli, &ctx).await?
        }
        Commands::Flexible(args) => {
            let ctx = AppContext::new(&cli).await?;
            path::run_flexible(args, &cli, &ctx).await?
        }
        Commands::Topology(args) => {
            let ctx = AppContext::new(&cli).await?;
            topology::run(args, &cli, &ctx).await?
        }
    }

    Ok(())
}
