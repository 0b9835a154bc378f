use core_types::NodeKey;

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    MissingNode(NodeKey),
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeKey),
    #[error("node {0:?} cannot have children")]
    InvalidParent(NodeKey),
    #[error("appending {child:?} to {parent:?} would create a cycle")]
    CycleDetected { parent: NodeKey, child: NodeKey },
    #[error("property `{0}` is read-only")]
    ReadOnlyProperty(String),
    #[error("{0} is not a valid css style property")]
    InvalidStyleProperty(String),
}
