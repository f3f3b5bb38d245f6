//! Host-facing path computation trait

use crate::error::StoreResult;
use crate::memory::StoreStats;
use async_trait::async_trait;
use pathfinder_core::{Link, MetadataValue, Path, RelaxationOptions, RelaxationResult, Switch, UpdateSummary};

/// Raw constraints as supplied by a caller, in priority order
pub type ConstraintPairs = [(String, MetadataValue)];

/// Operations the hosting system calls into
///
/// Topology mutations are applied atomically; every query runs against a
/// single consistent snapshot.
#[async_trait]
pub trait PathComputation: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Topology Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove every switch, interface and link
    async fn clear(&self) -> StoreResult<()>;

    /// Register switches and their interfaces
    async fn update_nodes(&self, switches: &[Switch]) -> StoreResult<UpdateSummary>;

    /// Insert links or refresh their metadata
    async fn update_links(&self, links: &[Link]) -> StoreResult<UpdateSummary>;

    /// Size and generation of the current snapshot
    async fn stats(&self) -> StoreResult<StoreStats>;

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Every minimum-cost path between two elements
    async fn shortest_paths(&self, source: &str, destination: &str) -> StoreResult<Vec<Path>>;

    /// Every minimum-cost path using only links that satisfy `constraints`
    async fn constrained_shortest_paths(
        &self,
        source: &str,
        destination: &str,
        constraints: &ConstraintPairs,
    ) -> StoreResult<Vec<Path>>;

    /// Constrained paths, relaxing constraints when necessary.
    ///
    /// `options` overrides the store's configured relaxation settings.
    async fn constrained_flexible(
        &self,
        source: &str,
        destination: &str,
        constraints: &ConstraintPairs,
        options: Option<&RelaxationOptions>,
    ) -> StoreResult<Vec<RelaxationResult>>;
}
