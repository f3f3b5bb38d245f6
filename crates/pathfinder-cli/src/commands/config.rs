//! Config command: inspect and edit `~/.pathfinder/config.toml`

use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::Config;
use crate::output::{to_json, OutputFormat};
use crate::Cli;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// Setting name (see `config list`)
        key: String,
    },
    /// Change one setting; the value is checked before saving
    Set {
        key: String,
        value: String,
    },
    /// Reset one setting to its default
    Unset {
        key: String,
    },
    /// Show every setting with what it controls
    List,
    /// Print the config file location
    Path,
    /// Write a default config file, recording --topology if given
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, cli: &Cli) -> anyhow::Result<()> {
    let path = cli.config_path();

    match &args.command {
        ConfigCommands::Get { key } => {
            let config = Config::load(&path);
            let Some(value) = config.get(key) else {
                anyhow::bail!(
                    "Unknown config key: {}. Available keys: {}",
                    key,
                    Config::keys().join(", ")
                );
            };
            println!("{}", value);
        }
        ConfigCommands::Set { key, value } => {
            edit(&path, |config| config.set(key, value))?;
            println!("{} = {}", key, value);
        }
        ConfigCommands::Unset { key } => {
            edit(&path, |config| config.unset(key))?;
            let value = Config::default().get(key).unwrap_or_default();
            println!("{} reset to {}", key, value);
        }
        ConfigCommands::List => list(&path, cli.format.as_deref())?,
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists; pass --force to replace it",
                    path.display()
                );
            }
            let config = Config {
                topology: cli.topology.clone(),
                ..Config::default()
            };
            config.save(&path)?;
            tracing::info!("Wrote default config to {:?}", path);
            println!("Created {}", path.display());
        }
    }
    Ok(())
}

/// Load, change and save the config, leaving the file alone on error
fn edit<F>(path: &Path, change: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Config) -> anyhow::Result<()>,
{
    let mut config = Config::load(path);
    change(&mut config)?;
    config.save(path)
}

/// Table rows mark settings that differ from the default with `*`
fn list(path: &Path, format: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load(path);
    let format = format
        .unwrap_or(&config.format)
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!(e))?;
    if format == OutputFormat::Json {
        println!("{}", to_json(&config)?);
        return Ok(());
    }

    let defaults = Config::default();
    println!("# {}", path.display());
    for key in Config::keys() {
        let value = config.get(key).unwrap_or_default();
        let marker = if config.get(key) != defaults.get(key) { "*" } else { " " };
        println!(
            "{} {:<18} {:<24} {}",
            marker,
            key,
            value,
            Config::describe(key).unwrap_or_default()
        );
    }
    Ok(())
}
