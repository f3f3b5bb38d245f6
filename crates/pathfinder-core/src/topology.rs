//! Topology snapshot: switches, interfaces and links as one graph
//!
//! Each switch and each interface is a node. A switch is joined to every
//! interface it owns by a zero-weight attachment edge, so a path can enter a
//! switch and leave through any of its ports. Links join two interfaces.

use crate::element::{interface_id, split_interface_id, Interface, Link, Switch};
use crate::error::{Error, Result};
use crate::graph::{EdgeKind, Graph, NodeIndex};
use crate::limits::{validate_batch_links, validate_batch_switches, validate_identifier};
use crate::metadata::Metadata;
use crate::traversal::EdgeWeights;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Kind of network element behind a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Switch,
    Interface,
}

/// Per-node data stored in the topology graph
#[derive(Debug, Clone)]
pub struct ElementInfo {
    pub kind: ElementKind,
    pub metadata: Metadata,
    /// Created implicitly by a link rather than registered by `update_nodes`
    pub placeholder: bool,
}

impl ElementInfo {
    fn new(kind: ElementKind, metadata: Metadata) -> Self {
        Self {
            kind,
            metadata,
            placeholder: false,
        }
    }

    fn placeholder(kind: ElementKind) -> Self {
        Self {
            kind,
            metadata: Metadata::new(),
            placeholder: true,
        }
    }
}

/// What to do with a link whose interface is not registered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEndpointPolicy {
    /// Fail the whole batch and leave the topology untouched
    #[default]
    Reject,
    /// Create the interface (and its owning switch, when the id names one)
    CreatePlaceholder,
}

impl std::str::FromStr for UnknownEndpointPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "create" | "create_placeholder" | "placeholder" => Ok(Self::CreatePlaceholder),
            other => Err(format!("unknown endpoint policy: {}", other)),
        }
    }
}

/// Topology behavior settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyOptions {
    #[serde(default)]
    pub unknown_endpoints: UnknownEndpointPolicy,

    #[serde(default)]
    pub weights: EdgeWeights,
}

impl TopologyOptions {
    pub fn with_unknown_endpoints(mut self, policy: UnknownEndpointPolicy) -> Self {
        self.unknown_endpoints = policy;
        self
    }

    pub fn with_weights(mut self, weights: EdgeWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Counts of what an update changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub switches_added: usize,
    pub interfaces_added: usize,
    pub links_added: usize,
    pub links_updated: usize,
}

/// Size of a topology snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyStats {
    pub switches: usize,
    pub interfaces: usize,
    pub links: usize,
    pub placeholders: usize,
}

/// Element kinds a batch will create, checked before anything is applied
type PendingKinds = HashMap<String, ElementKind>;

/// The current network topology
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    graph: Graph<String, ElementInfo>,
    options: TopologyOptions,
}

impl TopologyGraph {
    pub fn new(options: TopologyOptions) -> Self {
        Self {
            graph: Graph::new(),
            options,
        }
    }

    pub fn options(&self) -> &TopologyOptions {
        &self.options
    }

    pub fn weights(&self) -> &EdgeWeights {
        &self.options.weights
    }

    /// Underlying graph, for custom traversals
    pub fn graph(&self) -> &Graph<String, ElementInfo> {
        &self.graph
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graph.contains(id)
    }

    pub fn element(&self, id: &str) -> Option<&ElementInfo> {
        self.graph.node_index(id).map(|idx| self.graph.node_data(idx))
    }

    /// Remove every node and edge
    pub fn clear(&mut self) {
        self.graph.clear();
        tracing::info!("Topology cleared");
    }

    /// Register switches and their interfaces.
    ///
    /// Existing elements keep their place; their metadata is merged with the
    /// new values. The batch is validated before anything is inserted.
    pub fn update_nodes(&mut self, switches: &[Switch]) -> Result<UpdateSummary> {
        validate_batch_switches(switches.len())?;
        let mut pending = PendingKinds::new();
        for switch in switches {
            self.check_new_element(&switch.id, ElementKind::Switch, "switch", &mut pending)?;
            for iface in &switch.interfaces {
                let id = switch.interface_id(iface.port);
                self.check_new_element(&id, ElementKind::Interface, "interface", &mut pending)?;
            }
        }

        let mut summary = UpdateSummary::default();
        for switch in switches {
            let (sidx, created) = self.upsert_element(&switch.id, ElementKind::Switch, &switch.metadata);
            if created {
                summary.switches_added += 1;
            }
            for iface in &switch.interfaces {
                let id = interface_id(&switch.id, iface.port);
                let (iidx, created) = self.upsert_element(&id, ElementKind::Interface, &iface.metadata);
                if created {
                    summary.interfaces_added += 1;
                }
                self.graph
                    .upsert_edge(sidx, iidx, EdgeKind::Attachment, Metadata::new());
            }
        }

        tracing::info!(
            "Updated {} switch(es): {} new switch(es), {} new interface(s)",
            switches.len(),
            summary.switches_added,
            summary.interfaces_added
        );
        Ok(summary)
    }

    /// Insert links or refresh their metadata (later values win per key).
    ///
    /// The batch is validated before anything is inserted, so a rejected
    /// link leaves the topology unchanged.
    pub fn update_links(&mut self, links: &[Link]) -> Result<UpdateSummary> {
        validate_batch_links(links.len())?;
        let mut pending = PendingKinds::new();
        for link in links {
            self.check_link(link, &mut pending).map_err(|e| {
                tracing::warn!("Rejected link {}: {}", link.id(), e);
                e
            })?;
        }

        let mut summary = UpdateSummary::default();
        for link in links {
            let (a, a_new) = self.ensure_interface(&link.endpoint_a);
            let (b, b_new) = self.ensure_interface(&link.endpoint_b);
            summary.interfaces_added += a_new + b_new;

            let (_, created) = self
                .graph
                .upsert_edge(a, b, EdgeKind::Link, link.metadata.clone());
            if created {
                summary.links_added += 1;
            } else {
                summary.links_updated += 1;
            }
        }

        tracing::info!(
            "Updated {} link(s): {} added, {} refreshed",
            links.len(),
            summary.links_added,
            summary.links_updated
        );
        Ok(summary)
    }

    pub fn stats(&self) -> TopologyStats {
        let mut stats = TopologyStats::default();
        for (_, _, info) in self.graph.nodes() {
            match info.kind {
                ElementKind::Switch => stats.switches += 1,
                ElementKind::Interface => stats.interfaces += 1,
            }
            if info.placeholder {
                stats.placeholders += 1;
            }
        }
        stats.links = self
            .graph
            .edges()
            .filter(|e| e.kind == EdgeKind::Link)
            .count();
        stats
    }

    /// Registered switches with their interfaces, ordered by id
    pub fn switches(&self) -> Vec<Switch> {
        let mut switches: BTreeMap<&str, Switch> = BTreeMap::new();
        for (idx, id, info) in self.graph.nodes() {
            if info.kind != ElementKind::Switch {
                continue;
            }
            let mut switch = Switch::new(id.clone());
            switch.metadata = info.metadata.clone();
            for (neighbor, edge) in self.graph.neighbors(idx) {
                if edge.kind != EdgeKind::Attachment {
                    continue;
                }
                let iface_id = self.graph.node_id(neighbor);
                if let Some((_, port)) = split_interface_id(iface_id) {
                    let mut iface = Interface::new(port);
                    iface.metadata = self.graph.node_data(neighbor).metadata.clone();
                    switch.interfaces.push(iface);
                }
            }
            switch.interfaces.sort_by_key(|i| i.port);
            switches.insert(id.as_str(), switch);
        }
        switches.into_values().collect()
    }

    /// Links with their current metadata, ordered by link id
    pub fn links(&self) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .graph
            .edges()
            .filter(|e| e.kind == EdgeKind::Link)
            .map(|e| Link {
                endpoint_a: self.graph.node_id(e.a).clone(),
                endpoint_b: self.graph.node_id(e.b).clone(),
                metadata: e.metadata.clone(),
            })
            .collect();
        links.sort_by_key(|l| l.id());
        links
    }

    /// Kind of `id` once the batch validated so far is applied
    fn kind_of(&self, id: &str, pending: &PendingKinds) -> Option<ElementKind> {
        pending
            .get(id)
            .copied()
            .or_else(|| self.element(id).map(|info| info.kind))
    }

    fn check_new_element(
        &self,
        id: &str,
        kind: ElementKind,
        argument: &str,
        pending: &mut PendingKinds,
    ) -> Result<()> {
        validate_identifier(id).map_err(|e| Error::identifier(argument, e.to_string()))?;
        match self.kind_of(id, pending) {
            Some(existing) if existing != kind => Err(Error::identifier(
                argument,
                format!("'{}' is already used as {:?}", id, existing),
            )),
            _ => {
                pending.insert(id.to_string(), kind);
                Ok(())
            }
        }
    }

    fn check_link(&self, link: &Link, pending: &mut PendingKinds) -> Result<()> {
        let name = link.id();
        let invalid = |reason: String| Error::InvalidLink {
            link: name.clone(),
            reason,
        };

        for endpoint in [&link.endpoint_a, &link.endpoint_b] {
            validate_identifier(endpoint).map_err(|e| invalid(e.to_string()))?;
            match self.kind_of(endpoint, pending) {
                Some(ElementKind::Switch) => {
                    return Err(invalid(format!(
                        "endpoint '{}' is a switch, not an interface",
                        endpoint
                    )));
                }
                Some(ElementKind::Interface) => {}
                None if self.options.unknown_endpoints == UnknownEndpointPolicy::Reject => {
                    return Err(Error::UnknownEndpoint {
                        link: name.clone(),
                        interface: endpoint.clone(),
                    });
                }
                None => {
                    // A placeholder interface needs an owning switch
                    let Some((owner, _)) = split_interface_id(endpoint) else {
                        return Err(invalid(format!(
                            "unknown endpoint '{}' is not of the form <switch>:<port>",
                            endpoint
                        )));
                    };
                    if self.kind_of(owner, pending) == Some(ElementKind::Interface) {
                        return Err(invalid(format!(
                            "owner '{}' of '{}' is not a switch",
                            owner, endpoint
                        )));
                    }
                    pending.insert(endpoint.clone(), ElementKind::Interface);
                    pending.insert(owner.to_string(), ElementKind::Switch);
                }
            }
        }

        if link.endpoint_a == link.endpoint_b {
            return Err(invalid("both endpoints are the same interface".to_string()));
        }

        let weight_key = &self.options.weights.weight_key;
        if let Some(weight) = link.metadata.get(weight_key) {
            let valid = weight
                .as_number()
                .map(|w| w.is_finite() && w >= 0.0)
                .unwrap_or(false);
            if !valid {
                return Err(invalid(format!(
                    "'{}' must be a non-negative number, got '{}'",
                    weight_key, weight
                )));
            }
        }
        Ok(())
    }

    fn upsert_element(&mut self, id: &str, kind: ElementKind, metadata: &Metadata) -> (NodeIndex, bool) {
        let (idx, created) = self
            .graph
            .add_node(id.to_string(), ElementInfo::new(kind, metadata.clone()));
        if !created {
            let info = self.graph.node_data_mut(idx);
            info.metadata.extend(metadata.clone());
            info.placeholder = false;
        }
        (idx, created)
    }

    /// Look up an interface, creating a placeholder (and its switch) if absent.
    /// Returns the node and how many nodes were created.
    fn ensure_interface(&mut self, id: &str) -> (NodeIndex, usize) {
        if let Some(idx) = self.graph.node_index(id) {
            return (idx, 0);
        }

        let (iidx, _) = self
            .graph
            .add_node(id.to_string(), ElementInfo::placeholder(ElementKind::Interface));
        if let Some((owner, _)) = split_interface_id(id) {
            let (sidx, switch_new) = self
                .graph
                .add_node(owner.to_string(), ElementInfo::placeholder(ElementKind::Switch));
            self.graph
                .upsert_edge(sidx, iidx, EdgeKind::Attachment, Metadata::new());
            if switch_new {
                tracing::debug!("Created placeholder switch {}", owner);
            }
        }
        tracing::debug!("Created placeholder interface {}", id);
        (iidx, 1)
    }
}
