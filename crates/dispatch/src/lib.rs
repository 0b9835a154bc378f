//! Targeted patches for live nodes.
//!
//! A [`Patch`] is routed to nodes by direct key or by their `data-cra-id`
//! identifier and mutates them in place. There is no diffing: every op is
//! applied as written, in order.

pub mod apply;
pub mod error;
pub mod json;
pub mod patch;

pub use apply::apply_patch;
pub use error::DispatchError;
pub use patch::{Callback, Patch, PatchOp, TreeBuildFn, TreeSource};

use dom::{Document, NodeKey};

/// What a dispatch call targets.
#[derive(Clone, Debug)]
pub enum Locator {
    Node(NodeKey),
    Id(String),
    /// One patch per identifier; dispatched with no separate patch.
    Map(Vec<(String, Patch)>),
}

impl From<NodeKey> for Locator {
    fn from(key: NodeKey) -> Self {
        Locator::Node(key)
    }
}

impl From<&str> for Locator {
    fn from(id: &str) -> Self {
        Locator::Id(id.to_string())
    }
}

impl From<String> for Locator {
    fn from(id: String) -> Self {
        Locator::Id(id)
    }
}

/// Nodes a dispatch call resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Dispatched {
    #[default]
    None,
    One(NodeKey),
    Many(Vec<NodeKey>),
}

impl Dispatched {
    fn from_nodes(mut nodes: Vec<NodeKey>) -> Self {
        match nodes.len() {
            0 => Dispatched::None,
            1 => Dispatched::One(nodes.remove(0)),
            _ => Dispatched::Many(nodes),
        }
    }

    pub fn nodes(&self) -> &[NodeKey] {
        match self {
            Dispatched::None => &[],
            Dispatched::One(key) => std::slice::from_ref(key),
            Dispatched::Many(keys) => keys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }
}

/// Route a patch to its target nodes.
///
/// - `Node` patches that node.
/// - `Id` patches every node registered under the identifier, unless the
///   patch is marked `skip`.
/// - `Map` patches each identifier with its own patch; `patch` must be `None`.
///
/// A missing patch for a resolved target is [`DispatchError::InvalidStateShape`].
/// An identifier with no live node resolves to [`Dispatched::None`].
pub fn dispatch(
    doc: &mut Document,
    locator: impl Into<Locator>,
    patch: Option<&Patch>,
) -> Result<Dispatched, DispatchError> {
    match locator.into() {
        Locator::Node(key) => {
            if !doc.contains(key) {
                return Err(dom::DomError::MissingNode(key).into());
            }
            let patch = patch.ok_or_else(|| missing_patch(&format!("{key:?}")))?;
            apply_patch(doc, key, patch)?;
            Ok(Dispatched::One(key))
        }
        Locator::Id(id) => dispatch_id(doc, &id, patch).map(Dispatched::from_nodes),
        Locator::Map(entries) => {
            if patch.is_some() {
                return Err(DispatchError::InvalidStateShape(
                    "a patch map takes no separate patch".to_string(),
                ));
            }
            let mut updated = Vec::new();
            for (id, patch) in &entries {
                updated.extend(dispatch_id(doc, id, Some(patch))?);
            }
            Ok(Dispatched::from_nodes(updated))
        }
    }
}

fn dispatch_id(
    doc: &mut Document,
    id: &str,
    patch: Option<&Patch>,
) -> Result<Vec<NodeKey>, DispatchError> {
    let nodes = doc.query_state_id(id);
    if nodes.is_empty() {
        log::debug!(target: "cradle::dispatch", "no node carries id {id:?}");
        return Ok(nodes);
    }
    let patch = patch.ok_or_else(|| missing_patch(id))?;
    if patch.skip {
        return Ok(nodes);
    }
    for &key in &nodes {
        apply_patch(doc, key, patch)?;
    }
    Ok(nodes)
}

fn missing_patch(target: &str) -> DispatchError {
    DispatchError::InvalidStateShape(format!("no patch given for {target}"))
}
