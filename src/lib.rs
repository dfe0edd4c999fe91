//! Topology specification validator and graph builder.
//!
//! Turns a declarative JSON description of a small compute topology
//! (nodes, storage volumes, links) into a validated in-memory graph
//! ready to be handed to a resource-request serializer.
//!
//! Two components, used in sequence:
//! - [`validate`] parses and checks the raw spec, producing a typed
//!   [`TopologySpec`] or a [`ValidationError`].
//! - [`build`] deterministically turns a validated spec into a
//!   [`TopologyGraph`] with resolved cross-references.
//!
//! The crate performs no I/O and holds no shared state; serializing the
//! graph into a platform request document is the caller's business.

mod error;
pub mod graph;
pub mod spec;

pub use error::{ErrorKind, ValidationError};
pub use graph::{
    Endpoint, GraphLink, GraphNode, LinkClass, NodeId, NodeRole, TopologyGraph, Volume, build,
};
pub use spec::{
    BlockstoreSpec, InterfaceRef, LinkKind, LinkSpec, NodeKind, NodeSpec, TopologySpec, validate,
};
