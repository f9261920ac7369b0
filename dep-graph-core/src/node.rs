use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

/// How a node entered the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrigin {
    /// The node's own definition was registered.
    Real,
    /// The node is known only because another node named it as a dependency.
    Reference,
}

/// A single entity in a dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique identifier within the graph (the entity name).
    pub id: String,
    /// Category tag when known (`address_object`, `ike_gateway`, ...).
    ///
    /// `None` when the node was auto-created by an edge whose target kind was
    /// deliberately unspecified. A later registration may fill it in; once
    /// set it is never overwritten.
    pub kind: Option<String>,
    /// The entity's own data. `None` for reference placeholders.
    pub payload: Option<Value>,
    /// Whether this node comes from a real definition or only an edge.
    pub origin: NodeOrigin,
    /// Ids this node depends on (outgoing edges).
    pub depends_on: BTreeSet<String>,
    /// Ids that depend on this node (incoming edges).
    pub required_by: BTreeSet<String>,
}

impl Node {
    pub(crate) fn new(id: impl Into<String>, kind: Option<&str>, payload: Option<Value>) -> Self {
        // A null payload carries no definition, so the node stays a placeholder.
        let payload = payload.filter(|value| !value.is_null());
        let origin = if payload.is_some() {
            NodeOrigin::Real
        } else {
            NodeOrigin::Reference
        };
        Self {
            id: id.into(),
            kind: kind.map(ToOwned::to_owned),
            payload,
            origin,
            depends_on: BTreeSet::new(),
            required_by: BTreeSet::new(),
        }
    }

    /// True when the node exists purely as a dependency placeholder.
    pub fn is_reference(&self) -> bool {
        self.origin == NodeOrigin::Reference
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Node, NodeOrigin};

    #[test]
    fn payload_decides_origin() {
        let real = Node::new("web1", Some("address_object"), Some(json!({"ip": "10.0.0.1"})));
        assert_eq!(real.origin, NodeOrigin::Real);
        assert!(!real.is_reference());

        let placeholder = Node::new("db1", Some("address_object"), None);
        assert_eq!(placeholder.origin, NodeOrigin::Reference);
        assert!(placeholder.is_reference());
    }

    #[test]
    fn null_payload_stays_reference() {
        let node = Node::new("gw1", Some("ike_gateway"), Some(serde_json::Value::Null));
        assert!(node.is_reference());
        assert!(node.payload.is_none());
    }
}
