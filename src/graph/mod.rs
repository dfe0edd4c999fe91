//! Topology graph: built node, volume, and link objects with resolved
//! cross-references.
//!
//! [`build`] consumes a validated [`TopologySpec`] and is deterministic:
//! the same spec always produces the same graph, node for node. Node
//! construction runs in two fixed passes so a virtual node can bind its
//! host regardless of declaration order; the dependency relation has
//! depth exactly one (virtual-on-physical), which is why no general
//! dependency ordering is needed.

use crate::spec::{LinkKind, NodeKind, NodeSpec, TopologySpec};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Stable handle to a built node within one [`TopologyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in [`TopologyGraph::nodes`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// A built compute node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub name: String,
    pub role: NodeRole,
    /// Target resource-manager identifier, passed through verbatim.
    pub aggregate: Option<String>,
    pub disk_image: Option<String>,
    pub routable_ip: bool,
    /// Spec order.
    pub volumes: Vec<Volume>,
}

/// Kind-specific attributes of a built node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeRole {
    Physical {
        hardware_type: Option<String>,
        exclusive: bool,
    },
    Virtual {
        cores: Option<u64>,
        ram_mb: Option<u64>,
        disk_gb: Option<u64>,
        /// Hosting physical node, bound during the dependent pass.
        host: Option<NodeId>,
    },
}

/// A storage volume attached to a built node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Volume {
    pub name: String,
    pub mount_point: Option<String>,
    pub size_gb: u64,
}

/// A built link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLink {
    pub name: String,
    pub class: LinkClass,
    /// Spec order.
    pub endpoints: Vec<Endpoint>,
}

/// Kind-specific attributes of a built link.
///
/// Shaped parameters stay `None` when the spec omitted them; the
/// downstream platform applies its own defaults, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LinkClass {
    PointToPoint,
    Multipoint,
    Shaped {
        bandwidth_kbps: Option<u64>,
        latency_ms: Option<u64>,
        packet_loss_rate: Option<f64>,
    },
}

/// The attachment point where a link connects to a specific node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub interface_name: Option<String>,
}

/// The resolved in-memory topology.
///
/// Node order is observable and reproducible: all physical nodes in their
/// original relative order, then all virtual nodes in theirs. Links keep
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    #[serde(skip_serializing)]
    by_name: BTreeMap<String, NodeId>,
}

impl TopologyGraph {
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0]
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }
}

/// Construct the topology graph from a validated spec.
///
/// Infallible over validated input: any lookup failure here is a broken
/// contract with the validator, not a user error, and panics.
pub fn build(spec: TopologySpec) -> TopologyGraph {
    let mut nodes = Vec::with_capacity(spec.nodes.len());
    let mut by_name = BTreeMap::<String, NodeId>::new();

    // Independent pass: physical nodes, input order.
    for ns in spec.nodes.iter().filter(|n| n.kind == NodeKind::Physical) {
        let role = NodeRole::Physical {
            hardware_type: ns.hardware_type.clone(),
            exclusive: ns.exclusive,
        };
        by_name.insert(ns.name.clone(), NodeId(nodes.len()));
        nodes.push(built_node(ns, role));
    }

    // Dependent pass: virtual nodes, input order. Hosts were all built
    // above, so the binding always resolves.
    for ns in spec.nodes.iter().filter(|n| n.kind == NodeKind::Virtual) {
        let host = ns.instantiate_on.as_deref().map(|target| {
            *by_name
                .get(target)
                .expect("validated instantiateOn target must already be built")
        });
        let role = NodeRole::Virtual {
            cores: ns.cores,
            ram_mb: ns.ram_mb,
            disk_gb: ns.disk_gb,
            host,
        };
        by_name.insert(ns.name.clone(), NodeId(nodes.len()));
        nodes.push(built_node(ns, role));
    }

    // Link pass: input order, endpoints resolved in interface order.
    let mut links = Vec::with_capacity(spec.links.len());
    for ls in &spec.links {
        let class = match ls.kind {
            LinkKind::PointToPoint => LinkClass::PointToPoint,
            LinkKind::Multipoint => LinkClass::Multipoint,
            LinkKind::Shaped => LinkClass::Shaped {
                bandwidth_kbps: ls.bandwidth_kbps,
                latency_ms: ls.latency_ms,
                packet_loss_rate: ls.packet_loss_rate,
            },
        };
        let endpoints = ls
            .interfaces
            .iter()
            .map(|itf| Endpoint {
                node: *by_name
                    .get(&itf.node)
                    .expect("validated interface reference must resolve to a built node"),
                interface_name: itf.interface_name.clone(),
            })
            .collect();
        links.push(GraphLink {
            name: ls.name.clone(),
            class,
            endpoints,
        });
    }

    debug!(nodes = nodes.len(), links = links.len(), "topology graph built");
    TopologyGraph {
        nodes,
        links,
        by_name,
    }
}

/// Attributes applied identically regardless of kind.
fn built_node(ns: &NodeSpec, role: NodeRole) -> GraphNode {
    GraphNode {
        name: ns.name.clone(),
        role,
        aggregate: ns.aggregate.clone(),
        disk_image: ns.disk_image.clone(),
        routable_ip: ns.routable_ip,
        volumes: ns
            .blockstores
            .iter()
            .map(|bs| Volume {
                name: bs.name.clone(),
                mount_point: bs.mount_point.clone(),
                size_gb: bs.size_gb,
            })
            .collect(),
    }
}
