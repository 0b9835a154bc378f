use dom::{Document, DomError, NodeKey, PropValue};
use std::fmt;
use std::rc::Rc;
use template::Initial;

/// Side effect run by a [`PatchOp::Call`]; receives the patched node.
pub type Callback = Rc<dyn Fn(&mut Document, NodeKey)>;

/// Closure producing the node a [`PatchOp::Tree`] splices in.
pub type TreeBuildFn = Rc<dyn Fn(&mut Document) -> Result<NodeKey, DomError>>;

/// Where a `tree` patch gets its replacement children.
#[derive(Clone)]
pub enum TreeSource {
    /// Built fresh for every patched node.
    Initials(Vec<Initial>),
    /// Moved under the patched node; with several matches the last one keeps it.
    Node(NodeKey),
    /// Called once per patched node.
    Build(TreeBuildFn),
}

impl fmt::Debug for TreeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSource::Initials(items) => f.debug_tuple("Initials").field(items).finish(),
            TreeSource::Node(key) => f.debug_tuple("Node").field(key).finish(),
            TreeSource::Build(_) => f.write_str("Build(..)"),
        }
    }
}

/// A single recognized patch key.
#[derive(Clone)]
pub enum PatchOp {
    /// `style`: every name must be a recognized style property.
    Style(Vec<(String, String)>),
    /// `text`: replaces the inner text.
    Text(String),
    /// `class`: whitespace-separated tokens added to the class set.
    Class(String),
    /// `remove`: detach the node.
    Remove,
    /// `$name`: sets `data-name`.
    Data { name: String, value: String },
    /// `tree`: replaces the children.
    Tree(TreeSource),
    /// Function-valued key; invoked, never assigned.
    Call { name: String, callback: Callback },
    /// Any other key, style shorthands included.
    Property { name: String, value: PropValue },
}

impl PatchOp {
    /// Name this op is reported under in logs; `data-*` ops report the bare
    /// suffix.
    pub fn key(&self) -> &str {
        match self {
            PatchOp::Style(_) => "style",
            PatchOp::Text(_) => "text",
            PatchOp::Class(_) => "class",
            PatchOp::Remove => "remove",
            PatchOp::Data { name, .. } => name.as_str(),
            PatchOp::Tree(_) => "tree",
            PatchOp::Call { name, .. } | PatchOp::Property { name, .. } => name.as_str(),
        }
    }
}

impl fmt::Debug for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOp::Style(entries) => f.debug_tuple("Style").field(entries).finish(),
            PatchOp::Text(text) => f.debug_tuple("Text").field(text).finish(),
            PatchOp::Class(class) => f.debug_tuple("Class").field(class).finish(),
            PatchOp::Remove => f.write_str("Remove"),
            PatchOp::Data { name, value } => f
                .debug_struct("Data")
                .field("name", name)
                .field("value", value)
                .finish(),
            PatchOp::Tree(source) => f.debug_tuple("Tree").field(source).finish(),
            PatchOp::Call { name, .. } => f.debug_struct("Call").field("name", name).finish(),
            PatchOp::Property { name, value } => f
                .debug_struct("Property")
                .field("name", name)
                .field("value", value)
                .finish(),
        }
    }
}

/// Ordered partial update for a live node.
///
/// Ops apply in insertion order. `skip` makes identifier dispatch resolve
/// nodes without touching them.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    pub ops: Vec<PatchOp>,
    pub skip: bool,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, op: PatchOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Add one style entry; consecutive calls share a single `Style` op.
    pub fn style(mut self, name: &str, value: &str) -> Self {
        match self.ops.last_mut() {
            Some(PatchOp::Style(entries)) => {
                entries.push((name.to_string(), value.to_string()));
            }
            _ => self
                .ops
                .push(PatchOp::Style(vec![(name.to_string(), value.to_string())])),
        }
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.push(PatchOp::Text(text.into()))
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.push(PatchOp::Class(class.into()))
    }

    pub fn remove(self) -> Self {
        self.push(PatchOp::Remove)
    }

    pub fn data(self, name: &str, value: impl Into<String>) -> Self {
        self.push(PatchOp::Data {
            name: name.to_string(),
            value: value.into(),
        })
    }

    pub fn tree(self, source: TreeSource) -> Self {
        self.push(PatchOp::Tree(source))
    }

    pub fn call(self, name: &str, callback: impl Fn(&mut Document, NodeKey) + 'static) -> Self {
        self.push(PatchOp::Call {
            name: name.to_string(),
            callback: Rc::new(callback),
        })
    }

    pub fn property(self, name: &str, value: impl Into<PropValue>) -> Self {
        self.push(PatchOp::Property {
            name: name.to_string(),
            value: value.into(),
        })
    }

    /// Resolve targets only.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
