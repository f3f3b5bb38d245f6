//! Pathfinder Store - Concurrent topology snapshots
//!
//! This crate holds the current topology for a running host, applies
//! updates atomically, and loads or saves topology documents.

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use document::{DocumentFormat, TopologyDocument};
pub use error::{StoreError, StoreResult};
pub use memory::{Snapshot, SnapshotStore, StoreStats};
pub use traits::{ConstraintPairs, PathComputation};
