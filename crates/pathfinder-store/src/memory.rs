//! In-memory snapshot store
//!
//! The current topology sits behind an `RwLock<Arc<Snapshot>>`. Queries
//! clone the `Arc` under a short read lock and then run without holding any
//! lock. Mutations build a new snapshot from a copy of the current one and
//! publish it under the write lock, so a query sees either all of an update
//! or none of it.

use crate::document::TopologyDocument;
use crate::error::{StoreError, StoreResult};
use crate::traits::{ConstraintPairs, PathComputation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pathfinder_core::{
    ConstraintSet, Link, Path, QueryConfig, RelaxationOptions, RelaxationResult, Switch,
    TopologyGraph, TopologyOptions, TopologyStats, UpdateSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// One published version of the topology
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub topology: TopologyGraph,
    /// Bumped on every published mutation
    pub generation: u64,
    pub updated_at: DateTime<Utc>,
}

/// Size and version of the current snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    #[serde(flatten)]
    pub topology: TopologyStats,
    pub generation: u64,
    pub updated_at: DateTime<Utc>,
}

/// In-memory topology store
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
    config: QueryConfig,
}

impl SnapshotStore {
    pub fn new(options: TopologyOptions, config: QueryConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot {
                topology: TopologyGraph::new(options),
                generation: 0,
                updated_at: Utc::now(),
            })),
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> StoreResult<Arc<Snapshot>> {
        let current = self
            .current
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(Arc::clone(&current))
    }

    /// Apply `change` to a copy of the topology and publish it on success.
    ///
    /// Mutations are serialized by the write lock. On error the published
    /// snapshot is left as it was.
    fn mutate<R, F>(&self, change: F) -> StoreResult<R>
    where
        F: FnOnce(&mut TopologyGraph) -> pathfinder_core::Result<R>,
    {
        let mut current = self
            .current
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let mut next = Snapshot::clone(&current);
        let result = change(&mut next.topology)?;
        next.generation += 1;
        next.updated_at = Utc::now();

        tracing::debug!("Published topology generation {}", next.generation);
        *current = Arc::new(next);
        Ok(result)
    }

    /// Merge a topology document into the current topology
    pub fn load_document(&self, document: &TopologyDocument) -> StoreResult<UpdateSummary> {
        self.mutate(|topology| merge_document(topology, document))
    }

    /// Replace the current topology with a document's contents in one step
    pub fn replace_document(&self, document: &TopologyDocument) -> StoreResult<UpdateSummary> {
        self.mutate(|topology| {
            topology.clear();
            merge_document(topology, document)
        })
    }

    /// The current topology as a document
    pub fn export_document(&self) -> StoreResult<TopologyDocument> {
        let snapshot = self.snapshot()?;
        Ok(TopologyDocument {
            switches: snapshot.topology.switches(),
            links: snapshot.topology.links(),
        })
    }

    fn constraint_set(&self, constraints: &ConstraintPairs) -> StoreResult<ConstraintSet> {
        let pairs = constraints.iter().map(|(k, v)| (k.clone(), v.clone()));
        Ok(self.config.constraints(pairs)?)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(TopologyOptions::default(), QueryConfig::default())
    }
}

fn merge_document(
    topology: &mut TopologyGraph,
    document: &TopologyDocument,
) -> pathfinder_core::Result<UpdateSummary> {
    let nodes = topology.update_nodes(&document.switches)?;
    let links = topology.update_links(&document.links)?;
    Ok(UpdateSummary {
        switches_added: nodes.switches_added,
        interfaces_added: nodes.interfaces_added + links.interfaces_added,
        links_added: links.links_added,
        links_updated: links.links_updated,
    })
}

#[async_trait]
impl PathComputation for SnapshotStore {
    async fn clear(&self) -> StoreResult<()> {
        self.mutate(|topology| {
            topology.clear();
            Ok(())
        })
    }

    async fn update_nodes(&self, switches: &[Switch]) -> StoreResult<UpdateSummary> {
        self.mutate(|topology| topology.update_nodes(switches))
    }

    async fn update_links(&self, links: &[Link]) -> StoreResult<UpdateSummary> {
        self.mutate(|topology| topology.update_links(links))
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let snapshot = self.snapshot()?;
        Ok(StoreStats {
            topology: snapshot.topology.stats(),
            generation: snapshot.generation,
            updated_at: snapshot.updated_at,
        })
    }

    async fn shortest_paths(&self, source: &str, destination: &str) -> StoreResult<Vec<Path>> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.topology.shortest_paths(source, destination)?)
    }

    async fn constrained_shortest_paths(
        &self,
        source: &str,
        destination: &str,
        constraints: &ConstraintPairs,
    ) -> StoreResult<Vec<Path>> {
        let constraints = self.constraint_set(constraints)?;
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .topology
            .constrained_shortest_paths(source, destination, &constraints)?)
    }

    async fn constrained_flexible(
        &self,
        source: &str,
        destination: &str,
        constraints: &ConstraintPairs,
        options: Option<&RelaxationOptions>,
    ) -> StoreResult<Vec<RelaxationResult>> {
        let constraints = self.constraint_set(constraints)?;
        let options = options.unwrap_or(&self.config.relaxation);
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .topology
            .constrained_flexible(source, destination, &constraints, options)?)
    }
}
