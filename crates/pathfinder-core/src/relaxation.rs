//! Flexible search: progressively relax constraints until a path appears

use crate::constraint::ConstraintSet;
use crate::graph::Graph;
use crate::traversal::{enumerate_shortest, AllEdges, EdgeWeights};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::hash::Hash;

/// Which constraints are dropped first when relaxing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropOrder {
    /// Earlier-supplied constraints are dropped first
    #[default]
    Supplied,
    /// Later-supplied constraints are dropped first
    Reverse,
    /// Listed keys are dropped first, in listed order; the rest follow in
    /// supplied order
    Priority(Vec<String>),
}

impl DropOrder {
    /// Positions in `set`, ranked from first-to-drop to last-to-drop
    pub fn rank(&self, set: &ConstraintSet) -> Vec<usize> {
        let supplied: Vec<usize> = (0..set.len()).collect();
        match self {
            Self::Supplied => supplied,
            Self::Reverse => supplied.into_iter().rev().collect(),
            Self::Priority(keys) => {
                let position = |key: &str| set.keys().position(|k| k == key);
                let mut ranked: Vec<usize> = Vec::with_capacity(set.len());
                for key in keys {
                    if let Some(pos) = position(key.as_str()) {
                        if !ranked.contains(&pos) {
                            ranked.push(pos);
                        }
                    }
                }
                let rest: Vec<usize> = supplied
                    .into_iter()
                    .filter(|p| !ranked.contains(p))
                    .collect();
                ranked.extend(rest);
                ranked
            }
        }
    }
}

impl std::str::FromStr for DropOrder {
    type Err = String;

    /// `supplied`, `reverse`, or a comma-separated key list
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "supplied" => Ok(Self::Supplied),
            "reverse" => Ok(Self::Reverse),
            "" => Err("drop order cannot be empty".to_string()),
            list => Ok(Self::Priority(
                list.split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect(),
            )),
        }
    }
}

/// Tuning for flexible search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelaxationOptions {
    #[serde(default)]
    pub drop_order: DropOrder,

    /// Most constraints that may be dropped (None = all of them)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dropped: Option<usize>,

    /// Report every successful relaxation instead of stopping at the
    /// shallowest one
    #[serde(default)]
    pub exhaustive: bool,
}

impl RelaxationOptions {
    pub fn with_drop_order(mut self, order: DropOrder) -> Self {
        self.drop_order = order;
        self
    }

    pub fn with_max_dropped(mut self, max: usize) -> Self {
        self.max_dropped = Some(max);
        self
    }

    pub fn exhaustive(mut self) -> Self {
        self.exhaustive = true;
        self
    }
}

/// Paths found while honoring a subset of the requested constraints
#[derive(Debug, Clone, Serialize)]
pub struct RelaxationResult<N = String> {
    /// Constraints still enforced
    pub honored: ConstraintSet,

    /// Keys of the constraints that were dropped, in drop order
    pub dropped: Vec<String>,

    /// All minimum-cost paths under `honored`
    pub paths: Vec<Vec<N>>,

    /// True when no constraint is enforced
    pub unconstrained: bool,
}

impl<N> RelaxationResult<N> {
    fn new(honored: ConstraintSet, dropped: Vec<String>, paths: Vec<Vec<N>>) -> Self {
        let unconstrained = honored.is_empty();
        Self {
            honored,
            dropped,
            paths,
            unconstrained,
        }
    }
}

/// Run a flexible search.
///
/// The strict query is tried first and returned as-is when it finds paths.
/// Otherwise drop sets grow one constraint at a time; within a size they are
/// tried in [`DropOrder`] rank order, and the first size producing any paths
/// ends the search (unless `exhaustive`). A destination unreachable even
/// with every constraint dropped yields one unconstrained, empty record.
/// If `max_dropped` stops the search first, the result is one record that
/// honors every constraint and has no paths.
pub fn search_flexible<N, D, Q>(
    graph: &Graph<N, D>,
    source: &Q,
    destination: &Q,
    constraints: &ConstraintSet,
    weights: &EdgeWeights,
    options: &RelaxationOptions,
) -> Vec<RelaxationResult<N>>
where
    N: Clone + Eq + Hash + Ord + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    // Reaching oneself crosses no edge, so no constraint can block it. An
    // absent node falls through to the unreachable record below.
    if source == destination && graph.contains(source) {
        let trivial = enumerate_shortest(graph, source, destination, &AllEdges, weights);
        return vec![RelaxationResult::new(constraints.clone(), Vec::new(), trivial.paths)];
    }

    let strict = enumerate_shortest(graph, source, destination, constraints, weights);
    if !strict.is_empty() || constraints.is_empty() {
        return vec![RelaxationResult::new(constraints.clone(), Vec::new(), strict.paths)];
    }

    let open = enumerate_shortest(graph, source, destination, &AllEdges, weights);
    if open.is_empty() {
        tracing::debug!("Destination unreachable even without constraints");
        return vec![RelaxationResult::new(ConstraintSet::new(), all_keys(constraints), Vec::new())];
    }

    let ranked = options.drop_order.rank(constraints);
    let depth = options
        .max_dropped
        .unwrap_or(constraints.len())
        .min(constraints.len());

    let mut results = Vec::new();
    for size in 1..=depth {
        for combo in combinations(ranked.len(), size) {
            let dropped: Vec<usize> = combo.iter().map(|&i| ranked[i]).collect();
            let honored = constraints.without(&dropped);
            let found = enumerate_shortest(graph, source, destination, &honored, weights);
            if found.is_empty() {
                continue;
            }

            let dropped_keys = dropped
                .iter()
                .filter_map(|&pos| constraints.iter().nth(pos).map(|c| c.key.clone()))
                .collect();
            results.push(RelaxationResult::new(honored, dropped_keys, found.paths));
        }

        tracing::debug!(
            "Relaxation dropping {} constraint(s): {} successful subset(s)",
            size,
            results.len()
        );
        if !results.is_empty() && !options.exhaustive {
            break;
        }
    }

    if results.is_empty() {
        tracing::debug!("Relaxation budget of {} exhausted without a path", depth);
        return vec![RelaxationResult::new(constraints.clone(), Vec::new(), Vec::new())];
    }
    results
}

fn all_keys(set: &ConstraintSet) -> Vec<String> {
    set.keys().map(str::to_string).collect()
}

/// k-combinations of `0..n` in lexicographic order
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut combo: Vec<usize> = (0..k).collect();
    loop {
        out.push(combo.clone());

        // Rightmost position that can still advance
        let Some(i) = (0..k).rev().find(|&i| combo[i] < n - k + i) else {
            return out;
        };
        combo[i] += 1;
        for j in i + 1..k {
            combo[j] = combo[j - 1] + 1;
        }
    }
}
