//! CLI configuration

use std::path::{Path, PathBuf};

use pathfinder_core::{
    DropOrder, EdgeWeights, QueryConfig, RelaxationOptions, TopologyOptions,
    UnknownEndpointPolicy,
};
use serde::{Deserialize, Serialize};

/// Get default config directory
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pathfinder")
}

/// Default location of the config file
pub fn config_file_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Topology document loaded when `--topology` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<PathBuf>,
    pub weight_key: String,
    pub unknown_endpoints: String,
    pub drop_order: String,
    pub exhaustive: bool,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topology: None,
            weight_key: EdgeWeights::default().weight_key,
            unknown_endpoints: "reject".to_string(),
            drop_order: "supplied".to_string(),
            exhaustive: false,
            format: "table".to_string(),
        }
    }
}

impl Config {
    /// Load the config at `path`, falling back to defaults when it is
    /// missing or unreadable
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "topology",
            "weight_key",
            "unknown_endpoints",
            "drop_order",
            "exhaustive",
            "format",
        ]
    }

    /// What a key controls, for `config list`
    pub fn describe(key: &str) -> Option<&'static str> {
        match key {
            "topology" => Some("topology document used when --topology is absent"),
            "weight_key" => Some("link metadata key holding the link cost"),
            "unknown_endpoints" => {
                Some("links to unregistered interfaces: reject | create_placeholder")
            }
            "drop_order" => Some("flexible search drop order: supplied | reverse | k1,k2"),
            "exhaustive" => Some("flexible search reports every relaxation depth"),
            "format" => Some("default output format: table | json"),
            _ => None,
        }
    }

    /// Reset a key to its default value
    pub fn unset(&mut self, key: &str) -> anyhow::Result<()> {
        let defaults = Self::default();
        match key {
            "topology" => self.topology = defaults.topology,
            "weight_key" => self.weight_key = defaults.weight_key,
            "unknown_endpoints" => self.unknown_endpoints = defaults.unknown_endpoints,
            "drop_order" => self.drop_order = defaults.drop_order,
            "exhaustive" => self.exhaustive = defaults.exhaustive,
            "format" => self.format = defaults.format,
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "topology" => Some(
                self.topology
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            "weight_key" => Some(self.weight_key.clone()),
            "unknown_endpoints" => Some(self.unknown_endpoints.clone()),
            "drop_order" => Some(self.drop_order.clone()),
            "exhaustive" => Some(self.exhaustive.to_string()),
            "format" => Some(self.format.clone()),
            _ => None,
        }
    }

    /// Set a key after checking the value parses
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "topology" => {
                self.topology = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "weight_key" => {
                pathfinder_core::limits::validate_key(value)
                    .map_err(|e| anyhow::anyhow!("Invalid weight_key: {}", e))?;
                self.weight_key = value.to_string();
            }
            "unknown_endpoints" => {
                value
                    .parse::<UnknownEndpointPolicy>()
                    .map_err(|e| anyhow::anyhow!(e))?;
                self.unknown_endpoints = value.to_string();
            }
            "drop_order" => {
                value.parse::<DropOrder>().map_err(|e| anyhow::anyhow!(e))?;
                self.drop_order = value.to_string();
            }
            "exhaustive" => {
                self.exhaustive = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("exhaustive must be true or false"))?;
            }
            "format" => {
                value
                    .parse::<crate::output::OutputFormat>()
                    .map_err(|e| anyhow::anyhow!(e))?;
                self.format = value.to_string();
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    pub fn topology_options(&self) -> anyhow::Result<TopologyOptions> {
        let policy = self
            .unknown_endpoints
            .parse::<UnknownEndpointPolicy>()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(TopologyOptions::default()
            .with_unknown_endpoints(policy)
            .with_weights(EdgeWeights::with_key(&self.weight_key)))
    }

    pub fn query_config(&self) -> anyhow::Result<QueryConfig> {
        let drop_order = self
            .drop_order
            .parse::<DropOrder>()
            .map_err(|e| anyhow::anyhow!(e))?;
        let mut relaxation = RelaxationOptions::default().with_drop_order(drop_order);
        relaxation.exhaustive = self.exhaustive;
        Ok(QueryConfig::default().with_relaxation(relaxation))
    }
}
