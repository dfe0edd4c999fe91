//! Node and blockstore spec structs.

use serde::Serialize;

/// Node kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// A whole machine; built before any virtual node.
    Physical,
    /// A VM, optionally hosted on a named physical node.
    Virtual,
}

impl NodeKind {
    /// Parse the JSON keyword. Returns `None` for unrecognized kinds.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "physical" => Some(NodeKind::Physical),
            "virtual" => Some(NodeKind::Virtual),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            NodeKind::Physical => "physical",
            NodeKind::Virtual => "virtual",
        }
    }
}

/// One compute resource, as validated from the input spec.
///
/// Kind-restricted fields are `None`/default on the other kind; the
/// validator rejects them when they appear on the wrong kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    /// Unique across the whole specification.
    pub name: String,
    pub kind: NodeKind,

    /// Physical only.
    pub hardware_type: Option<String>,
    /// Physical only; defaults to false.
    pub exclusive: bool,

    /// Virtual only.
    pub cores: Option<u64>,
    /// Virtual only.
    pub ram_mb: Option<u64>,
    /// Virtual only.
    pub disk_gb: Option<u64>,
    /// Virtual only; names a physical node hosting this one.
    pub instantiate_on: Option<String>,

    /// Target resource-manager identifier.
    pub aggregate: Option<String>,
    pub disk_image: Option<String>,
    /// Defaults to false.
    pub routable_ip: bool,
    /// Input order.
    pub blockstores: Vec<BlockstoreSpec>,
}

/// A storage volume attached to a node.
///
/// Owned by its parent node; names need not be unique across nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockstoreSpec {
    pub name: String,
    pub mount_point: Option<String>,
    /// Size in GB, carried verbatim (no unit conversion).
    pub size_gb: u64,
}
