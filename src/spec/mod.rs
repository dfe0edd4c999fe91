//! Spec layer: JSON schema + validated in-memory structures.
//!
//! This module owns:
//! - the typed node/link/blockstore spec structs
//! - the ordered, fail-fast validator that turns raw JSON text into a
//!   [`TopologySpec`]

pub mod link;
pub mod node;
pub mod validate;

pub use link::{InterfaceRef, LinkKind, LinkSpec};
pub use node::{BlockstoreSpec, NodeKind, NodeSpec};
pub use validate::validate;

use serde::Serialize;

/// Validated, normalized topology specification.
///
/// Immutable after validation; input order of both sequences is preserved
/// for deterministic downstream construction. Consumed exactly once by
/// [`crate::graph::build`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologySpec {
    /// Non-empty; input order.
    pub nodes: Vec<NodeSpec>,
    /// May be empty; input order.
    pub links: Vec<LinkSpec>,
}
