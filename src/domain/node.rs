use crate::domain::ids::NodeId;

/// The two ends a node can serve when it bounds a yard. Immutable after
/// creation — see data model invariant 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodePosition {
    One = 1,
    Two = 2,
}

/// A named point on the network.
///
/// Two `Node` records are always created for a given catalogue name: one per
/// `NodePosition`, so that a yard node can be referenced as either its
/// entry or exit boundary.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub position: NodePosition,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, position: NodePosition) -> Self {
        Node { id, name: name.into(), position }
    }
}
