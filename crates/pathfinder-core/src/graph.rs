//! Owned adjacency-list graph with generic node identifiers
//!
//! Nodes live in an arena and are addressed by [`NodeIndex`]; the id → index
//! map gives O(1) lookup by identifier. Edges are undirected: each edge is
//! stored once and referenced from the adjacency list of both endpoints.
//! Nodes are never removed individually, only by [`Graph::clear`], so
//! indices stay valid for the lifetime of a snapshot.

use crate::metadata::{Metadata, MetadataValue};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Arena index of a node.
pub type NodeIndex = usize;

/// Arena index of an edge.
pub type EdgeIndex = usize;

/// What an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Switch ↔ interface attachment. Zero weight, never filtered.
    Attachment,
    /// Provisioned link between two interfaces.
    Link,
}

/// An undirected edge between two nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    pub a: NodeIndex,
    pub b: NodeIndex,
    pub kind: EdgeKind,
    pub metadata: Metadata,
}

impl Edge {
    /// The endpoint opposite to `from`.
    pub fn other(&self, from: NodeIndex) -> NodeIndex {
        if self.a == from {
            self.b
        } else {
            self.a
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}

/// In-memory graph: node arena + adjacency lists + undirected edge table.
#[derive(Debug, Clone)]
pub struct Graph<N, D = ()> {
    nodes: Vec<(N, D)>,
    index: HashMap<N, NodeIndex>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeIndex>>,
    edge_lookup: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

impl<N, D> Default for Graph<N, D> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            edge_lookup: HashMap::new(),
        }
    }
}

fn edge_key(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<N, D> Graph<N, D>
where
    N: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.edges.clear();
        self.adjacency.clear();
        self.edge_lookup.clear();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(id)
    }

    pub fn node_index<Q>(&self, id: &Q) -> Option<NodeIndex>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(id).copied()
    }

    /// Identifier of the node at `idx`. Panics on an index from another graph.
    pub fn node_id(&self, idx: NodeIndex) -> &N {
        &self.nodes[idx].0
    }

    pub fn node_data(&self, idx: NodeIndex) -> &D {
        &self.nodes[idx].1
    }

    pub fn node_data_mut(&mut self, idx: NodeIndex) -> &mut D {
        &mut self.nodes[idx].1
    }

    /// Insert a node if absent. Returns its index and whether it was created.
    pub fn add_node(&mut self, id: N, data: D) -> (NodeIndex, bool) {
        if let Some(&idx) = self.index.get(&id) {
            return (idx, false);
        }
        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push((id, data));
        self.adjacency.push(Vec::new());
        (idx, true)
    }

    /// Insert an undirected edge, or merge `metadata` into the existing one.
    ///
    /// Merging replaces values for keys present in `metadata` and keeps the
    /// others. Returns the edge index and whether it was created.
    pub fn upsert_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        kind: EdgeKind,
        metadata: Metadata,
    ) -> (EdgeIndex, bool) {
        let key = edge_key(a, b);
        if let Some(&eidx) = self.edge_lookup.get(&key) {
            let edge = &mut self.edges[eidx];
            edge.kind = kind;
            edge.metadata.extend(metadata);
            return (eidx, false);
        }

        let eidx = self.edges.len();
        self.edges.push(Edge {
            a,
            b,
            kind,
            metadata,
        });
        self.edge_lookup.insert(key, eidx);
        self.adjacency[a].push(eidx);
        if a != b {
            self.adjacency[b].push(eidx);
        }
        (eidx, true)
    }

    pub fn find_edge(&self, a: NodeIndex, b: NodeIndex) -> Option<&Edge> {
        self.edge_lookup.get(&edge_key(a, b)).map(|&e| &self.edges[e])
    }

    pub fn edge(&self, idx: EdgeIndex) -> &Edge {
        &self.edges[idx]
    }

    /// Edges incident to `node`, in insertion order, paired with the neighbor.
    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, &Edge)> + '_ {
        self.adjacency[node].iter().map(move |&eidx| {
            let edge = &self.edges[eidx];
            (edge.other(node), edge)
        })
    }

    pub fn degree(&self, node: NodeIndex) -> usize {
        self.adjacency[node].len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &N, &D)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, (id, data))| (idx, id, data))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }
}
