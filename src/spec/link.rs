//! Link and interface-reference spec structs.

use serde::Serialize;

/// Link kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkKind {
    PointToPoint,
    Multipoint,
    /// Carries optional bandwidth/latency/loss parameters.
    Shaped,
}

impl LinkKind {
    /// Parse the JSON keyword. Returns `None` for unrecognized kinds.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "point-to-point" => Some(LinkKind::PointToPoint),
            "multipoint" => Some(LinkKind::Multipoint),
            "shaped" => Some(LinkKind::Shaped),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            LinkKind::PointToPoint => "point-to-point",
            LinkKind::Multipoint => "multipoint",
            LinkKind::Shaped => "shaped",
        }
    }
}

/// A connection between interfaces on one or more nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSpec {
    /// Unique across all links; separate namespace from node names.
    pub name: String,
    pub kind: LinkKind,

    /// Shaped only. Absent means platform default downstream, not zero.
    pub bandwidth_kbps: Option<u64>,
    /// Shaped only.
    pub latency_ms: Option<u64>,
    /// Shaped only; in [0, 1].
    pub packet_loss_rate: Option<f64>,

    /// Non-empty; input order.
    pub interfaces: Vec<InterfaceRef>,
}

/// A weak reference from a link to a node's network interface.
///
/// Names a node, never owns it; the validator guarantees the name
/// resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceRef {
    pub node: String,
    /// Optional label for the interface on that node.
    pub interface_name: Option<String>,
}
