//! Topology documents on disk
//!
//! A document lists switches (with their ports) and links. JSON and TOML
//! are both accepted; the format follows the file extension.

use crate::error::{StoreError, StoreResult};
use pathfinder_core::{Link, Switch};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized form of a topology document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(StoreError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A complete topology, as loaded from or saved to a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyDocument {
    #[serde(default)]
    pub switches: Vec<Switch>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl TopologyDocument {
    pub fn parse(content: &str, format: DocumentFormat) -> StoreResult<Self> {
        let document = match format {
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Toml => toml::from_str(content)?,
        };
        Ok(document)
    }

    pub fn render(&self, format: DocumentFormat) -> StoreResult<String> {
        let content = match format {
            DocumentFormat::Json => serde_json::to_string_pretty(self)?,
            DocumentFormat::Toml => toml::to_string_pretty(self)?,
        };
        Ok(content)
    }

    /// Read a document, choosing the format from the extension
    pub fn load(path: &Path) -> StoreResult<Self> {
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let document = Self::parse(&content, format)?;
        tracing::debug!(
            "Loaded {} switch(es) and {} link(s) from {:?}",
            document.switches.len(),
            document.links.len(),
            path
        );
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let format = DocumentFormat::from_path(path)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.render(format)?)?;
        Ok(())
    }
}
