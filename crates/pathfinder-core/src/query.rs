//! Path queries against a topology snapshot

use crate::constraint::{ConstraintSchema, ConstraintSet};
use crate::error::{Error, Result};
use crate::limits::validate_identifier;
use crate::metadata::MetadataValue;
use crate::relaxation::{search_flexible, RelaxationOptions, RelaxationResult};
use crate::topology::TopologyGraph;
use crate::traversal::{enumerate_shortest, AllEdges, Path};
use serde::{Deserialize, Serialize};

/// Query-side settings shared by every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub schema: ConstraintSchema,

    #[serde(default)]
    pub relaxation: RelaxationOptions,
}

impl QueryConfig {
    pub fn with_schema(mut self, schema: ConstraintSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_relaxation(mut self, relaxation: RelaxationOptions) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Validate raw constraint pairs into a set under this config's schema
    pub fn constraints<I, K, V>(&self, pairs: I) -> Result<ConstraintSet>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetadataValue>,
    {
        ConstraintSet::build(pairs, &self.schema)
    }
}

fn validate_endpoints(source: &str, destination: &str) -> Result<()> {
    validate_identifier(source).map_err(|e| Error::identifier("source", e.to_string()))?;
    validate_identifier(destination)
        .map_err(|e| Error::identifier("destination", e.to_string()))?;
    Ok(())
}

impl TopologyGraph {
    /// Every minimum-cost path, ignoring link metadata
    pub fn shortest_paths(&self, source: &str, destination: &str) -> Result<Vec<Path>> {
        validate_endpoints(source, destination)?;
        tracing::debug!("Shortest paths {} -> {}", source, destination);

        let found = enumerate_shortest(self.graph(), source, destination, &AllEdges, self.weights());
        Ok(found.paths)
    }

    /// Every minimum-cost path that uses only links satisfying `constraints`
    pub fn constrained_shortest_paths(
        &self,
        source: &str,
        destination: &str,
        constraints: &ConstraintSet,
    ) -> Result<Vec<Path>> {
        validate_endpoints(source, destination)?;
        tracing::debug!(
            "Constrained paths {} -> {} with [{}]",
            source,
            destination,
            constraints
        );

        let found = enumerate_shortest(self.graph(), source, destination, constraints, self.weights());
        Ok(found.paths)
    }

    /// Constrained paths, relaxing constraints when none satisfy them all
    pub fn constrained_flexible(
        &self,
        source: &str,
        destination: &str,
        constraints: &ConstraintSet,
        options: &RelaxationOptions,
    ) -> Result<Vec<RelaxationResult>> {
        validate_endpoints(source, destination)?;
        tracing::debug!(
            "Flexible paths {} -> {} with [{}], drop order {:?}",
            source,
            destination,
            constraints,
            options.drop_order
        );

        Ok(search_flexible(
            self.graph(),
            source,
            destination,
            constraints,
            self.weights(),
            options,
        ))
    }
}
