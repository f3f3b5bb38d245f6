//! Topology commands

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::output::{format_stats, to_json, OutputFormat};
use crate::{AppContext, Cli};
use pathfinder_store::PathComputation;

#[derive(Args)]
pub struct TopologyArgs {
    #[command(subcommand)]
    pub command: TopologyCommands,
}

#[derive(Subcommand)]
pub enum TopologyCommands {
    /// Show element counts for the loaded topology
    Show,
    /// Check that the topology loads cleanly
    Validate,
    /// Write the loaded topology back out in normalized form
    Export {
        /// Output file, .json or .toml (stdout as JSON if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(args: &TopologyArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        TopologyCommands::Show => {
            let stats = ctx.store.stats().await?;
            ctx.emit(cli, format_stats(&stats, ctx.format)?);
        }
        TopologyCommands::Validate => {
            // Loading already ran every check
            let stats = ctx.store.stats().await?;
            let rendered = match ctx.format {
                OutputFormat::Json => to_json(&serde_json::json!({
                    "valid": true,
                    "switches": stats.topology.switches,
                    "links": stats.topology.links,
                }))?,
                OutputFormat::Table => format!(
                    "Topology OK: {} switch(es), {} link(s)",
                    stats.topology.switches, stats.topology.links
                ),
            };
            ctx.emit(cli, rendered);
        }
        TopologyCommands::Export { output } => {
            let document = ctx.store.export_document()?;
            match output {
                Some(path) => {
                    document.save(path)?;
                    tracing::info!("Exported topology to {:?}", path);
                    ctx.emit(cli, format!("Exported topology to {}", path.display()));
                }
                None => println!("{}", to_json(&document)?),
            }
        }
    }
    Ok(())
}
