/// Attribute that carries a node's dispatch identifier.
pub const CRA_ID_ATTR: &str = "data-cra-id";

/// Property-bag key that assigns a dispatch identifier at build time.
pub const STATE_ID_PROP: &str = "stateID";

/// Stable arena key of a live document node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Kind of a live node, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Fragment,
    Element,
    Text,
}
