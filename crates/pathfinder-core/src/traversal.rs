//! All-shortest-paths enumeration over a filterable graph view

use crate::graph::{Edge, EdgeKind, Graph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Costs closer than this are treated as ties.
const COST_EPSILON: f64 = 1e-9;

/// Ordered node identifiers from source to destination, inclusive
pub type Path = Vec<String>;

/// Decides which edges a traversal may use
pub trait EdgeFilter {
    fn admits(&self, edge: &Edge) -> bool;
}

impl<F> EdgeFilter for F
where
    F: Fn(&Edge) -> bool,
{
    fn admits(&self, edge: &Edge) -> bool {
        self(edge)
    }
}

/// Filter that admits every edge (the unfiltered view)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllEdges;

impl EdgeFilter for AllEdges {
    fn admits(&self, _edge: &Edge) -> bool {
        true
    }
}

/// How edge weights are derived from edge metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeWeights {
    /// Metadata key holding an explicit link weight
    #[serde(default = "default_weight_key")]
    pub weight_key: String,

    /// Weight of a link without the weight key
    #[serde(default = "default_link_weight")]
    pub default_weight: f64,
}

fn default_weight_key() -> String {
    "weight".to_string()
}

fn default_link_weight() -> f64 {
    1.0
}

impl Default for EdgeWeights {
    fn default() -> Self {
        Self {
            weight_key: default_weight_key(),
            default_weight: default_link_weight(),
        }
    }
}

impl EdgeWeights {
    pub fn with_key(weight_key: impl Into<String>) -> Self {
        Self {
            weight_key: weight_key.into(),
            ..Default::default()
        }
    }

    /// Weight of an edge: attachments are free, links use the weight key.
    pub fn weight(&self, edge: &Edge) -> f64 {
        match edge.kind {
            EdgeKind::Attachment => 0.0,
            EdgeKind::Link => edge
                .get(&self.weight_key)
                .and_then(|v| v.as_number())
                .filter(|w| w.is_finite() && *w >= 0.0)
                .unwrap_or(self.default_weight),
        }
    }
}

/// Statistics from a single enumeration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub edges_relaxed: usize,
    pub paths_found: usize,
}

/// Result of an enumeration: every minimum-cost path and their shared cost
#[derive(Debug, Clone)]
pub struct PathSet<N> {
    pub paths: Vec<Vec<N>>,
    /// Total weight of each path; `None` when unreachable
    pub cost: Option<f64>,
    pub stats: TraversalStats,
}

impl<N> PathSet<N> {
    fn empty(stats: TraversalStats) -> Self {
        Self {
            paths: Vec::new(),
            cost: None,
            stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// State for Dijkstra priority queue
#[derive(Clone, Copy, PartialEq)]
struct DijkstraState {
    cost: f64,
    node: NodeIndex,
}

impl Eq for DijkstraState {}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; node index breaks ties deterministically
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Enumerate every minimum-cost simple path from `source` to `destination`.
///
/// Missing endpoints give an empty set. `source == destination` gives the
/// single-node path whether or not the node has edges. Paths come back
/// sorted, so identical inputs always produce identical output.
pub fn enumerate_shortest<N, D, Q, F>(
    graph: &Graph<N, D>,
    source: &Q,
    destination: &Q,
    filter: &F,
    weights: &EdgeWeights,
) -> PathSet<N>
where
    N: Clone + Eq + Hash + Ord + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    F: EdgeFilter + ?Sized,
{
    let mut stats = TraversalStats::default();

    let (Some(src), Some(dst)) = (graph.node_index(source), graph.node_index(destination))
    else {
        return PathSet::empty(stats);
    };

    if src == dst {
        stats.nodes_visited = 1;
        stats.paths_found = 1;
        return PathSet {
            paths: vec![vec![graph.node_id(src).clone()]],
            cost: Some(0.0),
            stats,
        };
    }

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut preds: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[src] = 0.0;
    heap.push(DijkstraState { cost: 0.0, node: src });

    while let Some(DijkstraState { cost, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        if cost > dist[dst] + COST_EPSILON {
            break;
        }
        settled[node] = true;
        stats.nodes_visited += 1;

        for (next, edge) in graph.neighbors(node) {
            // Predecessors of the source can never lie on a simple path to it
            if next == src || !filter.admits(edge) {
                continue;
            }
            stats.edges_relaxed += 1;

            let new_cost = cost + weights.weight(edge);
            if new_cost < dist[next] - COST_EPSILON {
                dist[next] = new_cost;
                preds[next].clear();
                preds[next].push(node);
                heap.push(DijkstraState {
                    cost: new_cost,
                    node: next,
                });
            } else if (new_cost - dist[next]).abs() <= COST_EPSILON && !preds[next].contains(&node)
            {
                preds[next].push(node);
            }
        }
    }

    if !dist[dst].is_finite() {
        tracing::debug!("No path between nodes after visiting {}", stats.nodes_visited);
        return PathSet::empty(stats);
    }

    let mut paths: Vec<Vec<N>> = walk_predecessors(&preds, src, dst)
        .into_iter()
        .map(|indices| indices.into_iter().map(|i| graph.node_id(i).clone()).collect())
        .collect();
    paths.sort();
    stats.paths_found = paths.len();

    tracing::debug!(
        "Found {} shortest path(s) with cost {}",
        paths.len(),
        dist[dst]
    );

    PathSet {
        paths,
        cost: Some(dist[dst]),
        stats,
    }
}

/// Expand the predecessor DAG into source → destination index paths.
///
/// Zero-weight edges can make predecessors mutually reachable, so a node
/// already on the current branch is skipped to keep every path simple.
fn walk_predecessors(preds: &[Vec<NodeIndex>], src: NodeIndex, dst: NodeIndex) -> Vec<Vec<NodeIndex>> {
    let mut found = Vec::new();
    let mut on_path = vec![false; preds.len()];
    let mut branch = vec![dst];
    let mut cursor = vec![0usize];
    on_path[dst] = true;

    while let Some(&node) = branch.last() {
        if node == src {
            found.push(branch.iter().rev().copied().collect());
            on_path[node] = false;
            branch.pop();
            cursor.pop();
            continue;
        }

        let Some(next_pred) = cursor.last_mut() else {
            break;
        };
        match preds[node].get(*next_pred) {
            Some(&pred) => {
                *next_pred += 1;
                if !on_path[pred] {
                    on_path[pred] = true;
                    branch.push(pred);
                    cursor.push(0);
                }
            }
            None => {
                on_path[node] = false;
                branch.pop();
                cursor.pop();
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn link(graph: &mut Graph<&'static str>, a: &'static str, b: &'static str, weight: Option<f64>) {
        let (ia, _) = graph.add_node(a, ());
        let (ib, _) = graph.add_node(b, ());
        let mut metadata = Metadata::new();
        if let Some(w) = weight {
            metadata.insert("weight".into(), w.into());
        }
        graph.upsert_edge(ia, ib, EdgeKind::Link, metadata);
    }

    fn attach(graph: &mut Graph<&'static str>, a: &'static str, b: &'static str) {
        let (ia, _) = graph.add_node(a, ());
        let (ib, _) = graph.add_node(b, ());
        graph.upsert_edge(ia, ib, EdgeKind::Attachment, Metadata::new());
    }

    // Diamond:  A - B - D
    //            \- C -/
    fn diamond() -> Graph<&'static str> {
        let mut graph = Graph::new();
        link(&mut graph, "A", "B", None);
        link(&mut graph, "A", "C", None);
        link(&mut graph, "B", "D", None);
        link(&mut graph, "C", "D", None);
        graph
    }

    #[test]
    fn test_all_tied_paths_returned() {
        let graph = diamond();
        let result = enumerate_shortest(&graph, "A", "D", &AllEdges, &EdgeWeights::default());

        assert_eq!(result.paths, vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]);
        assert_eq!(result.cost, Some(2.0));
        assert_eq!(result.stats.paths_found, 2);
    }

    #[test]
    fn test_weights_break_ties() {
        let mut graph = diamond();
        link(&mut graph, "A", "C", Some(5.0));
        let result = enumerate_shortest(&graph, "A", "D", &AllEdges, &EdgeWeights::default());

        assert_eq!(result.paths, vec![vec!["A", "B", "D"]]);
    }

    #[test]
    fn test_self_path_without_edges() {
        let mut graph: Graph<&str> = Graph::new();
        graph.add_node("lonely", ());
        let result = enumerate_shortest(&graph, "lonely", "lonely", &AllEdges, &EdgeWeights::default());

        assert_eq!(result.paths, vec![vec!["lonely"]]);
        assert_eq!(result.cost, Some(0.0));
    }

    #[test]
    fn test_missing_endpoint_is_empty() {
        let graph = diamond();
        let weights = EdgeWeights::default();
        assert!(enumerate_shortest(&graph, "A", "Z", &AllEdges, &weights).is_empty());
        assert!(enumerate_shortest(&graph, "Z", "A", &AllEdges, &weights).is_empty());
        assert!(enumerate_shortest(&graph, "Z", "Z", &AllEdges, &weights).is_empty());
    }

    #[test]
    fn test_filter_removes_edges() {
        let graph = diamond();
        let b = graph.node_index("B").unwrap();
        let avoid_b = move |edge: &Edge| edge.a != b && edge.b != b;
        let result = enumerate_shortest(&graph, "A", "D", &avoid_b, &EdgeWeights::default());

        assert_eq!(result.paths, vec![vec!["A", "C", "D"]]);
    }

    #[test]
    fn test_zero_weight_cycles_terminate() {
        // Two switches, each with two attached ports, linked port to port:
        //   S1 - S1:1 - S2:1 - S2
        //   S1 - S1:2 - S2:2 - S2
        let mut graph = Graph::new();
        attach(&mut graph, "S1", "S1:1");
        attach(&mut graph, "S1", "S1:2");
        attach(&mut graph, "S2", "S2:1");
        attach(&mut graph, "S2", "S2:2");
        link(&mut graph, "S1:1", "S2:1", None);
        link(&mut graph, "S1:2", "S2:2", None);

        let result = enumerate_shortest(&graph, "S1", "S2", &AllEdges, &EdgeWeights::default());
        assert_eq!(
            result.paths,
            vec![
                vec!["S1", "S1:1", "S2:1", "S2"],
                vec!["S1", "S1:2", "S2:2", "S2"],
            ]
        );

        // Interface to interface may detour through the owning switch for free
        let result =
            enumerate_shortest(&graph, "S1:1", "S2:2", &AllEdges, &EdgeWeights::default());
        for path in &result.paths {
            let mut seen = path.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), path.len(), "path {:?} repeats a node", path);
        }
        assert!(result
            .paths
            .contains(&vec!["S1:1", "S1", "S1:2", "S2:2"]));
        assert!(result
            .paths
            .contains(&vec!["S1:1", "S2:1", "S2", "S2:2"]));
    }

    #[test]
    fn test_deterministic_output() {
        let graph = diamond();
        let weights = EdgeWeights::default();
        let first = enumerate_shortest(&graph, "D", "A", &AllEdges, &weights);
        let second = enumerate_shortest(&graph, "D", "A", &AllEdges, &weights);
        assert_eq!(first.paths, second.paths);
    }

    #[test]
    fn test_invalid_weight_falls_back_to_default() {
        let weights = EdgeWeights::default();
        let mut metadata = Metadata::new();
        metadata.insert("weight".into(), (-3.0).into());
        let edge = Edge {
            a: 0,
            b: 1,
            kind: EdgeKind::Link,
            metadata,
        };
        assert_eq!(weights.weight(&edge), 1.0);
    }
}
