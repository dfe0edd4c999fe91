//! Ordered, fail-fast validation of the raw JSON spec.
//!
//! Stage order is part of the contract and is what callers' first-error
//! diagnostics depend on:
//!
//! 1. parse
//! 2. top-level shape
//! 3. per-node structural checks, input order
//! 4. cross-node semantic checks (host references)
//! 5. per-link structural + reference checks, input order
//!
//! Every check returns the first violation found. There is no error
//! accumulation and no coercion: an integer field must be a JSON integer,
//! never a numeric string or a float.

use crate::error::ValidationError;
use crate::spec::{
    BlockstoreSpec, InterfaceRef, LinkKind, LinkSpec, NodeKind, NodeSpec, TopologySpec,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Fields rejected on `physical` nodes.
const VIRTUAL_ONLY: &[&str] = &["cores", "ramMB", "diskGB", "instantiateOn"];
/// Fields rejected on `virtual` nodes.
const PHYSICAL_ONLY: &[&str] = &["hardwareType", "exclusive"];
/// Fields rejected on non-`shaped` links.
const SHAPED_ONLY: &[&str] = &["bandwidthKbps", "latencyMs", "packetLossRate"];

/// Parse and validate a raw JSON topology specification.
///
/// Returns the typed, normalized [`TopologySpec`] (input order preserved)
/// or the first violation found under the fixed stage order.
pub fn validate(raw: &str) -> Result<TopologySpec, ValidationError> {
    let value: Value = serde_json::from_str(raw).map_err(ValidationError::malformed)?;

    let root = value
        .as_object()
        .ok_or_else(|| ValidationError::schema("top-level JSON must be an object"))?;

    let raw_nodes = match root.get("nodes") {
        Some(Value::Array(nodes)) if !nodes.is_empty() => nodes,
        _ => return Err(ValidationError::schema("'nodes' must be a non-empty array")),
    };
    // Absent links means no links; present must be an array.
    let raw_links: &[Value] = match root.get("links") {
        None => &[],
        Some(Value::Array(links)) => links,
        Some(_) => return Err(ValidationError::schema("'links' must be an array")),
    };

    // Structural node pass. `kinds` is the accumulator later passes
    // resolve references against; it lives and dies with this call.
    let mut kinds = BTreeMap::<String, NodeKind>::new();
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for (index, raw_node) in raw_nodes.iter().enumerate() {
        nodes.push(validate_node(raw_node, index, &mut kinds)?);
    }

    // Semantic node pass: every host reference must resolve, and only
    // after all names are known (declaration order is insignificant).
    check_host_references(&nodes, &kinds)?;

    // Link pass: structural checks per link, then its node references.
    let mut seen_links = BTreeSet::<String>::new();
    let mut links = Vec::with_capacity(raw_links.len());
    for (index, raw_link) in raw_links.iter().enumerate() {
        links.push(validate_link(raw_link, index, &kinds, &mut seen_links)?);
    }

    debug!(nodes = nodes.len(), links = links.len(), "specification validated");
    Ok(TopologySpec { nodes, links })
}

fn validate_node(
    raw: &Value,
    index: usize,
    kinds: &mut BTreeMap<String, NodeKind>,
) -> Result<NodeSpec, ValidationError> {
    let position = format!("nodes[{index}]");
    let obj = raw
        .as_object()
        .ok_or_else(|| ValidationError::schema_in(&position, "each node must be an object"))?;

    let kind_raw = require_string(obj, "kind", &position)?;
    let kind = NodeKind::from_keyword(kind_raw).ok_or_else(|| {
        ValidationError::schema_in(&position, format!("unsupported node kind '{kind_raw}'"))
    })?;

    let name = require_nonempty_string(obj, "name", &position)?.to_string();
    let context = format!("node '{name}'");
    if kinds.contains_key(&name) {
        return Err(ValidationError::schema_in(
            &context,
            format!("duplicate node name '{name}'"),
        ));
    }

    let aggregate = opt_string(obj, "aggregate", &context)?;
    let disk_image = opt_string(obj, "diskImage", &context)?;
    let routable_ip = opt_bool(obj, "routableIP", &context)?.unwrap_or(false);
    let blockstores = validate_blockstores(obj.get("blockstores"), &context)?;

    let (hardware_type, exclusive, cores, ram_mb, disk_gb, instantiate_on) = match kind {
        NodeKind::Physical => {
            reject_fields(obj, VIRTUAL_ONLY, &context, "virtual nodes")?;
            let hardware_type = opt_string(obj, "hardwareType", &context)?;
            let exclusive = opt_bool(obj, "exclusive", &context)?.unwrap_or(false);
            (hardware_type, exclusive, None, None, None, None)
        }
        NodeKind::Virtual => {
            reject_fields(obj, PHYSICAL_ONLY, &context, "physical nodes")?;
            let cores = opt_uint(obj, "cores", &context)?;
            let ram_mb = opt_uint(obj, "ramMB", &context)?;
            let disk_gb = opt_uint(obj, "diskGB", &context)?;
            let instantiate_on = opt_nonempty_string(obj, "instantiateOn", &context)?;
            (None, false, cores, ram_mb, disk_gb, instantiate_on)
        }
    };

    kinds.insert(name.clone(), kind);
    Ok(NodeSpec {
        name,
        kind,
        hardware_type,
        exclusive,
        cores,
        ram_mb,
        disk_gb,
        instantiate_on,
        aggregate,
        disk_image,
        routable_ip,
        blockstores,
    })
}

fn validate_blockstores(
    raw: Option<&Value>,
    context: &str,
) -> Result<Vec<BlockstoreSpec>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let list = raw
        .as_array()
        .ok_or_else(|| ValidationError::schema_in(context, "'blockstores' must be an array"))?;

    let mut out = Vec::with_capacity(list.len());
    for (index, raw_store) in list.iter().enumerate() {
        let obj = raw_store.as_object().ok_or_else(|| {
            ValidationError::schema_in(context, format!("blockstores[{index}] must be an object"))
        })?;
        let store_context = format!("{context} blockstores[{index}]");
        let name = require_nonempty_string(obj, "name", &store_context)?.to_string();
        let mount_point = opt_string(obj, "mountPoint", &store_context)?;
        let size_gb = match obj.get("sizeGB") {
            Some(v) => v.as_u64().ok_or_else(|| {
                ValidationError::schema_in(
                    &store_context,
                    "'sizeGB' must be a non-negative integer",
                )
            })?,
            None => {
                return Err(ValidationError::schema_in(
                    &store_context,
                    "missing required field 'sizeGB'",
                ));
            }
        };
        out.push(BlockstoreSpec {
            name,
            mount_point,
            size_gb,
        });
    }
    Ok(out)
}

/// Every `instantiateOn` must name a known node of kind `physical`.
fn check_host_references(
    nodes: &[NodeSpec],
    kinds: &BTreeMap<String, NodeKind>,
) -> Result<(), ValidationError> {
    for node in nodes {
        let Some(host) = node.instantiate_on.as_deref() else {
            continue;
        };
        let context = format!("node '{}'", node.name);
        match kinds.get(host) {
            Some(NodeKind::Physical) => {}
            Some(NodeKind::Virtual) => {
                return Err(ValidationError::semantic_in(
                    &context,
                    format!("instantiateOn target '{host}' is not a physical node"),
                ));
            }
            None => {
                return Err(ValidationError::semantic_in(
                    &context,
                    format!("instantiateOn references unknown node '{host}'"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_link(
    raw: &Value,
    index: usize,
    kinds: &BTreeMap<String, NodeKind>,
    seen: &mut BTreeSet<String>,
) -> Result<LinkSpec, ValidationError> {
    let position = format!("links[{index}]");
    let obj = raw
        .as_object()
        .ok_or_else(|| ValidationError::schema_in(&position, "each link must be an object"))?;

    let kind_raw = require_string(obj, "kind", &position)?;
    let kind = LinkKind::from_keyword(kind_raw).ok_or_else(|| {
        ValidationError::schema_in(&position, format!("unsupported link kind '{kind_raw}'"))
    })?;

    let name = require_nonempty_string(obj, "name", &position)?.to_string();
    let context = format!("link '{name}'");
    if !seen.insert(name.clone()) {
        return Err(ValidationError::schema_in(
            &context,
            format!("duplicate link name '{name}'"),
        ));
    }

    let (bandwidth_kbps, latency_ms, packet_loss_rate) = match kind {
        LinkKind::Shaped => {
            let bandwidth_kbps = opt_uint(obj, "bandwidthKbps", &context)?;
            let latency_ms = opt_uint(obj, "latencyMs", &context)?;
            let packet_loss_rate = opt_loss_rate(obj, &context)?;
            (bandwidth_kbps, latency_ms, packet_loss_rate)
        }
        LinkKind::PointToPoint | LinkKind::Multipoint => {
            reject_fields(obj, SHAPED_ONLY, &context, "shaped links")?;
            (None, None, None)
        }
    };

    let raw_interfaces = match obj.get("interfaces") {
        Some(Value::Array(ifs)) if !ifs.is_empty() => ifs,
        _ => {
            return Err(ValidationError::schema_in(
                &context,
                "'interfaces' must be a non-empty array",
            ));
        }
    };

    let mut interfaces = Vec::with_capacity(raw_interfaces.len());
    for (if_index, raw_ref) in raw_interfaces.iter().enumerate() {
        let if_obj = raw_ref.as_object().ok_or_else(|| {
            ValidationError::schema_in(&context, format!("interfaces[{if_index}] must be an object"))
        })?;
        let node = require_nonempty_string(if_obj, "node", &context)?.to_string();
        if !kinds.contains_key(&node) {
            return Err(ValidationError::semantic_in(
                &context,
                format!("references unknown node '{node}'"),
            ));
        }
        let interface_name = opt_string(if_obj, "interfaceName", &context)?;
        interfaces.push(InterfaceRef {
            node,
            interface_name,
        });
    }

    Ok(LinkSpec {
        name,
        kind,
        bandwidth_kbps,
        latency_ms,
        packet_loss_rate,
        interfaces,
    })
}

fn require_string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<&'a str, ValidationError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::schema_in(
            context,
            format!("'{key}' must be a string"),
        )),
        None => Err(ValidationError::schema_in(
            context,
            format!("missing required field '{key}'"),
        )),
    }
}

fn require_nonempty_string<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<&'a str, ValidationError> {
    let s = require_string(obj, key, context)?;
    if s.is_empty() {
        return Err(ValidationError::schema_in(
            context,
            format!("'{key}' must be a non-empty string"),
        ));
    }
    Ok(s)
}

fn opt_string(
    obj: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<String>, ValidationError> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::schema_in(
            context,
            format!("'{key}' must be a string"),
        )),
    }
}

fn opt_nonempty_string(
    obj: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<String>, ValidationError> {
    match opt_string(obj, key, context)? {
        Some(s) if s.is_empty() => Err(ValidationError::schema_in(
            context,
            format!("'{key}' must be a non-empty string"),
        )),
        other => Ok(other),
    }
}

fn opt_bool(
    obj: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<bool>, ValidationError> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::schema_in(
            context,
            format!("'{key}' must be a boolean"),
        )),
    }
}

/// Non-negative JSON integer. Floats, numeric strings, and negative
/// values are all rejected.
fn opt_uint(
    obj: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<u64>, ValidationError> {
    match obj.get(key) {
        None => Ok(None),
        Some(v) => match v.as_u64() {
            Some(n) => Ok(Some(n)),
            None => Err(ValidationError::schema_in(
                context,
                format!("'{key}' must be a non-negative integer"),
            )),
        },
    }
}

fn opt_loss_rate(
    obj: &Map<String, Value>,
    context: &str,
) -> Result<Option<f64>, ValidationError> {
    match obj.get("packetLossRate") {
        None => Ok(None),
        Some(v) => {
            let rate = v.as_f64().ok_or_else(|| {
                ValidationError::schema_in(context, "'packetLossRate' must be a number")
            })?;
            if !(0.0..=1.0).contains(&rate) {
                return Err(ValidationError::schema_in(
                    context,
                    format!("'packetLossRate' must be within [0, 1], got {rate}"),
                ));
            }
            Ok(Some(rate))
        }
    }
}

fn reject_fields(
    obj: &Map<String, Value>,
    fields: &[&str],
    context: &str,
    allowed_on: &str,
) -> Result<(), ValidationError> {
    for &field in fields {
        if obj.contains_key(field) {
            return Err(ValidationError::schema_in(
                context,
                format!("'{field}' is only valid on {allowed_on}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn fail(raw: &str) -> ValidationError {
        validate(raw).expect_err("input should be rejected")
    }

    #[test]
    fn single_physical_node_passes() {
        let spec = validate(r#"{"nodes":[{"kind":"physical","name":"n0"}]}"#).unwrap();
        assert_eq!(spec.nodes.len(), 1);
        assert_eq!(spec.nodes[0].name, "n0");
        assert_eq!(spec.nodes[0].kind, NodeKind::Physical);
        assert!(!spec.nodes[0].exclusive);
        assert!(!spec.nodes[0].routable_ip);
        assert!(spec.links.is_empty());
    }

    #[test]
    fn virtual_on_physical_passes() {
        let spec = validate(
            r#"{"nodes":[
                {"kind":"physical","name":"n0"},
                {"kind":"virtual","name":"v0","instantiateOn":"n0"}
            ],"links":[]}"#,
        )
        .unwrap();
        assert_eq!(spec.nodes[1].instantiate_on.as_deref(), Some("n0"));
    }

    #[test]
    fn garbage_is_malformed_input() {
        let err = fail("{nodes: [");
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn top_level_must_be_an_object() {
        for raw in [r#"[]"#, r#"3"#, r#""nodes""#] {
            let err = fail(raw);
            assert_eq!(err.kind(), ErrorKind::SchemaViolation);
            assert!(err.to_string().contains("top-level"), "{err}");
        }
    }

    #[test]
    fn nodes_must_be_present_and_non_empty() {
        for raw in [r#"{}"#, r#"{"nodes":[]}"#, r#"{"nodes":{}}"#, r#"{"nodes":3}"#] {
            let err = fail(raw);
            assert_eq!(err.kind(), ErrorKind::SchemaViolation);
            assert!(err.to_string().contains("'nodes'"), "{err}");
        }
    }

    #[test]
    fn links_must_be_an_array_when_present() {
        let err = fail(r#"{"nodes":[{"kind":"physical","name":"n0"}],"links":{}}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("'links'"), "{err}");
    }

    #[test]
    fn unsupported_node_kind_is_rejected() {
        let err = fail(r#"{"nodes":[{"kind":"rawpc","name":"n0"}]}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("unsupported node kind 'rawpc'"), "{err}");
    }

    #[test]
    fn node_kind_is_required_and_typed() {
        let missing = fail(r#"{"nodes":[{"name":"n0"}]}"#);
        assert!(missing.to_string().contains("'kind'"), "{missing}");

        let wrong_type = fail(r#"{"nodes":[{"kind":7,"name":"n0"}]}"#);
        assert_eq!(wrong_type.kind(), ErrorKind::SchemaViolation);
        assert!(wrong_type.to_string().contains("'kind' must be a string"), "{wrong_type}");
    }

    #[test]
    fn node_name_must_be_a_nonempty_string() {
        for raw in [
            r#"{"nodes":[{"kind":"physical"}]}"#,
            r#"{"nodes":[{"kind":"physical","name":""}]}"#,
            r#"{"nodes":[{"kind":"physical","name":17}]}"#,
        ] {
            let err = fail(raw);
            assert_eq!(err.kind(), ErrorKind::SchemaViolation);
            assert!(err.to_string().contains("'name'"), "{err}");
        }
    }

    #[test]
    fn duplicate_node_name_is_a_schema_violation() {
        // Scenario C.
        let err = fail(
            r#"{"nodes":[{"kind":"physical","name":"n0"},{"kind":"physical","name":"n0"}]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("duplicate node name 'n0'"), "{err}");
        assert_eq!(err.context(), Some("node 'n0'"));
    }

    #[test]
    fn integers_are_never_coerced() {
        // Numeric string.
        let err = fail(r#"{"nodes":[{"kind":"virtual","name":"v0","cores":"4"}]}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("'cores'"), "{err}");

        // Float where an integer is required.
        let err = fail(r#"{"nodes":[{"kind":"virtual","name":"v0","ramMB":512.5}]}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);

        // Negative.
        let err = fail(r#"{"nodes":[{"kind":"virtual","name":"v0","diskGB":-1}]}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    }

    #[test]
    fn kind_restricted_fields_are_rejected_on_the_wrong_kind() {
        let err = fail(r#"{"nodes":[{"kind":"physical","name":"n0","cores":2}]}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("only valid on virtual nodes"), "{err}");

        let err = fail(r#"{"nodes":[{"kind":"virtual","name":"v0","hardwareType":"d430"}]}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("only valid on physical nodes"), "{err}");
    }

    #[test]
    fn blockstore_shape_is_enforced() {
        let base = |blks: &str| {
            format!(r#"{{"nodes":[{{"kind":"physical","name":"n0","blockstores":{blks}}}]}}"#)
        };
        for blks in [
            r#"{}"#,
            r#"[3]"#,
            r#"[{"sizeGB":10}]"#,
            r#"[{"name":"","sizeGB":10}]"#,
            r#"[{"name":"bs0"}]"#,
            r#"[{"name":"bs0","sizeGB":"10"}]"#,
            r#"[{"name":"bs0","sizeGB":10,"mountPoint":4}]"#,
        ] {
            let err = fail(&base(blks));
            assert_eq!(err.kind(), ErrorKind::SchemaViolation, "{blks}: {err}");
        }
    }

    #[test]
    fn blockstores_are_carried_in_order() {
        let spec = validate(
            r#"{"nodes":[{"kind":"physical","name":"n0","blockstores":[
                {"name":"bs0","sizeGB":100,"mountPoint":"/data"},
                {"name":"bs1","sizeGB":20}
            ]}]}"#,
        )
        .unwrap();
        let stores = &spec.nodes[0].blockstores;
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].name, "bs0");
        assert_eq!(stores[0].mount_point.as_deref(), Some("/data"));
        assert_eq!(stores[0].size_gb, 100);
        assert_eq!(stores[1].name, "bs1");
        assert_eq!(stores[1].mount_point, None);
    }

    #[test]
    fn dangling_host_reference_is_semantic() {
        // P4: unknown target.
        let err = fail(r#"{"nodes":[{"kind":"virtual","name":"v0","instantiateOn":"ghost"}]}"#);
        assert_eq!(err.kind(), ErrorKind::SemanticViolation);
        assert!(err.to_string().contains("unknown node 'ghost'"), "{err}");
        assert_eq!(err.context(), Some("node 'v0'"));

        // P4: target exists but is virtual.
        let err = fail(
            r#"{"nodes":[
                {"kind":"virtual","name":"v0"},
                {"kind":"virtual","name":"v1","instantiateOn":"v0"}
            ]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SemanticViolation);
        assert!(err.to_string().contains("not a physical node"), "{err}");
    }

    #[test]
    fn empty_instantiate_on_is_structural() {
        let err = fail(r#"{"nodes":[{"kind":"virtual","name":"v0","instantiateOn":""}]}"#);
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    }

    #[test]
    fn structural_violations_win_over_earlier_semantic_ones() {
        // P2: the dangling host reference sits earlier in the node list
        // than the duplicate name, but the structural pass runs first.
        let err = fail(
            r#"{"nodes":[
                {"kind":"virtual","name":"v0","instantiateOn":"ghost"},
                {"kind":"physical","name":"n0"},
                {"kind":"physical","name":"n0"}
            ]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("duplicate node name"), "{err}");
    }

    #[test]
    fn node_violations_win_over_link_violations() {
        // P9: the links key appears first in the text and holds a bad
        // link, but nodes are validated before links are examined at all.
        let err = fail(
            r#"{"links":[{"kind":"lan","name":"l0","interfaces":[{"node":"n0"}]}],
                "nodes":[{"kind":"bogus","name":"n0"}]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("unsupported node kind 'bogus'"), "{err}");
    }

    #[test]
    fn unsupported_link_kind_is_rejected() {
        let err = fail(
            r#"{"nodes":[{"kind":"physical","name":"n0"}],
                "links":[{"kind":"lan","name":"l0","interfaces":[{"node":"n0"}]}]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("unsupported link kind 'lan'"), "{err}");
    }

    #[test]
    fn duplicate_link_name_is_a_schema_violation() {
        // P5, link half.
        let err = fail(
            r#"{"nodes":[{"kind":"physical","name":"n0"}],"links":[
                {"kind":"point-to-point","name":"l0","interfaces":[{"node":"n0"}]},
                {"kind":"multipoint","name":"l0","interfaces":[{"node":"n0"}]}
            ]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("duplicate link name 'l0'"), "{err}");
    }

    #[test]
    fn node_and_link_names_are_separate_namespaces() {
        let spec = validate(
            r#"{"nodes":[{"kind":"physical","name":"x"}],
                "links":[{"kind":"point-to-point","name":"x","interfaces":[{"node":"x"}]}]}"#,
        )
        .unwrap();
        assert_eq!(spec.nodes[0].name, spec.links[0].name);
    }

    #[test]
    fn link_interfaces_must_be_non_empty() {
        for links in [
            r#"[{"kind":"point-to-point","name":"l0"}]"#,
            r#"[{"kind":"point-to-point","name":"l0","interfaces":[]}]"#,
            r#"[{"kind":"point-to-point","name":"l0","interfaces":{}}]"#,
        ] {
            let err = fail(&format!(
                r#"{{"nodes":[{{"kind":"physical","name":"n0"}}],"links":{links}}}"#
            ));
            assert_eq!(err.kind(), ErrorKind::SchemaViolation, "{links}: {err}");
            assert!(err.to_string().contains("'interfaces'"), "{err}");
        }
    }

    #[test]
    fn interface_refs_are_type_checked_before_resolution() {
        let err = fail(
            r#"{"nodes":[{"kind":"physical","name":"n0"}],
                "links":[{"kind":"point-to-point","name":"l0","interfaces":[{"node":5}]}]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);

        let err = fail(
            r#"{"nodes":[{"kind":"physical","name":"n0"}],
                "links":[{"kind":"point-to-point","name":"l0","interfaces":[{}]}]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("'node'"), "{err}");
    }

    #[test]
    fn dangling_interface_reference_is_semantic() {
        // Scenario D / P6.
        let err = fail(
            r#"{"nodes":[{"kind":"physical","name":"n0"}],
                "links":[{"kind":"point-to-point","name":"l0",
                          "interfaces":[{"node":"n0"},{"node":"missing"}]}]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SemanticViolation);
        assert!(err.to_string().contains("l0"), "{err}");
        assert!(err.to_string().contains("unknown node 'missing'"), "{err}");
        assert_eq!(err.context(), Some("link 'l0'"));
    }

    #[test]
    fn shaped_parameters_are_rejected_on_plain_links() {
        let err = fail(
            r#"{"nodes":[{"kind":"physical","name":"n0"}],
                "links":[{"kind":"point-to-point","name":"l0","bandwidthKbps":1000,
                          "interfaces":[{"node":"n0"}]}]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("only valid on shaped links"), "{err}");
    }

    #[test]
    fn loss_rate_must_be_a_number_within_bounds() {
        let base = |plr: &str| {
            format!(
                r#"{{"nodes":[{{"kind":"physical","name":"n0"}}],
                    "links":[{{"kind":"shaped","name":"l0","packetLossRate":{plr},
                              "interfaces":[{{"node":"n0"}}]}}]}}"#
            )
        };
        for plr in [r#""0.5""#, "1.5", "-0.1"] {
            let err = fail(&base(plr));
            assert_eq!(err.kind(), ErrorKind::SchemaViolation, "{plr}: {err}");
        }
        // Boundary values are legal, including as integers.
        for plr in ["0", "1", "0.25"] {
            validate(&base(plr)).unwrap();
        }
    }

    #[test]
    fn shaped_link_parameters_are_carried() {
        let spec = validate(
            r#"{"nodes":[{"kind":"physical","name":"n0"},{"kind":"physical","name":"n1"}],
                "links":[{"kind":"shaped","name":"l0","bandwidthKbps":100000,"latencyMs":10,
                          "packetLossRate":0.01,
                          "interfaces":[{"node":"n0","interfaceName":"eth1"},{"node":"n1"}]}]}"#,
        )
        .unwrap();
        let link = &spec.links[0];
        assert_eq!(link.kind, LinkKind::Shaped);
        assert_eq!(link.bandwidth_kbps, Some(100_000));
        assert_eq!(link.latency_ms, Some(10));
        assert_eq!(link.packet_loss_rate, Some(0.01));
        assert_eq!(link.interfaces[0].interface_name.as_deref(), Some("eth1"));
        assert_eq!(link.interfaces[1].interface_name, None);
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let spec = validate(
            r#"{"nodes":[{"kind":"physical","name":"n0","color":"red"}],
                "links":[],"comment":"scratch"}"#,
        )
        .unwrap();
        assert_eq!(spec.nodes[0].name, "n0");
    }

    #[test]
    fn input_order_is_preserved() {
        let spec = validate(
            r#"{"nodes":[
                {"kind":"virtual","name":"v0"},
                {"kind":"physical","name":"p0"},
                {"kind":"virtual","name":"v1"}
            ]}"#,
        )
        .unwrap();
        let names: Vec<&str> = spec.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["v0", "p0", "v1"]);
    }
}
