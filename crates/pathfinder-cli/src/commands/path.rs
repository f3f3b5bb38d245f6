//! Path query commands

use clap::Args;

use crate::output::{format_flexible, format_paths};
use crate::{AppContext, Cli};
use pathfinder_core::{parse_constraint_arg, DropOrder, MetadataValue};
use pathfinder_store::PathComputation;

#[derive(Args)]
pub struct Endpoints {
    /// Source switch or interface
    pub source: String,
    /// Destination switch or interface
    pub destination: String,
}

#[derive(Args)]
pub struct PathsArgs {
    #[command(flatten)]
    pub endpoints: Endpoints,
}

#[derive(Args)]
pub struct ConstrainedArgs {
    #[command(flatten)]
    pub endpoints: Endpoints,

    /// Constraint as key=value; numbers are bounds, text must match exactly
    #[arg(short = 'c', long = "constraint", value_name = "KEY=VALUE", value_parser = parse_constraint)]
    pub constraints: Vec<(String, MetadataValue)>,
}

#[derive(Args)]
pub struct FlexibleArgs {
    #[command(flatten)]
    pub endpoints: Endpoints,

    /// Constraint as key=value, most expendable first
    #[arg(short = 'c', long = "constraint", value_name = "KEY=VALUE", value_parser = parse_constraint)]
    pub constraints: Vec<(String, MetadataValue)>,

    /// Most constraints that may be dropped
    #[arg(long)]
    pub max_dropped: Option<usize>,

    /// Report every successful relaxation, not only the shallowest
    #[arg(long)]
    pub exhaustive: bool,

    /// Which constraints to drop first: supplied, reverse, or a key list
    #[arg(long, value_parser = parse_drop_order)]
    pub drop_order: Option<DropOrder>,
}

fn parse_constraint(arg: &str) -> Result<(String, MetadataValue), String> {
    parse_constraint_arg(arg).map_err(|e| e.to_string())
}

fn parse_drop_order(arg: &str) -> Result<DropOrder, String> {
    arg.parse()
}

pub async fn run_paths(args: &PathsArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let Endpoints { source, destination } = &args.endpoints;
    let paths = ctx.store.shortest_paths(source, destination).await?;
    tracing::info!("Found {} path(s) from {} to {}", paths.len(), source, destination);

    ctx.emit(cli, format_paths(source, destination, &paths, ctx.format)?);
    Ok(())
}

pub async fn run_constrained(
    args: &ConstrainedArgs,
    cli: &Cli,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    let Endpoints { source, destination } = &args.endpoints;
    let paths = ctx
        .store
        .constrained_shortest_paths(source, destination, &args.constraints)
        .await?;
    tracing::info!(
        "Found {} constrained path(s) from {} to {}",
        paths.len(),
        source,
        destination
    );

    ctx.emit(cli, format_paths(source, destination, &paths, ctx.format)?);
    Ok(())
}

pub async fn run_flexible(args: &FlexibleArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let Endpoints { source, destination } = &args.endpoints;

    let mut options = ctx.store.config().relaxation.clone();
    if let Some(order) = &args.drop_order {
        options.drop_order = order.clone();
    }
    if let Some(max) = args.max_dropped {
        options.max_dropped = Some(max);
    }
    if args.exhaustive {
        options.exhaustive = true;
    }

    let results = ctx
        .store
        .constrained_flexible(source, destination, &args.constraints, Some(&options))
        .await?;
    tracing::info!(
        "Flexible search from {} to {} produced {} record(s)",
        source,
        destination,
        results.len()
    );

    ctx.emit(cli, format_flexible(source, destination, &results, ctx.format)?);
    Ok(())
}
