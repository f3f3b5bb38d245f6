//! Pathfinder Core - Constrained path computation over network topologies
//!
//! This crate provides the topology graph model and the three path queries:
//! all shortest paths, strict constrained shortest paths, and flexible
//! search that relaxes constraints when none satisfy them all.

pub mod constraint;
pub mod element;
pub mod error;
pub mod graph;
pub mod limits;
pub mod metadata;
pub mod query;
pub mod relaxation;
pub mod topology;
pub mod traversal;

pub use constraint::{parse_constraint_arg, Comparison, Constraint, ConstraintSchema, ConstraintSet};
pub use element::{interface_id, split_interface_id, Interface, Link, Switch};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeKind, Graph, NodeIndex};
pub use metadata::{Metadata, MetadataValue};
pub use query::QueryConfig;
pub use relaxation::{search_flexible, DropOrder, RelaxationOptions, RelaxationResult};
pub use topology::{
    ElementInfo, ElementKind, TopologyGraph, TopologyOptions, TopologyStats, UnknownEndpointPolicy,
    UpdateSummary,
};
pub use traversal::{enumerate_shortest, AllEdges, EdgeFilter, EdgeWeights, Path, PathSet, TraversalStats};
