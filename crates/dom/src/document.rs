//! Live arena document.
//!
//! Invariants:
//! - Key `n` lives at slot `n - 1`; keys are never reused after removal.
//! - A node has at most one parent and appears once in that parent's children.
//! - The identifier registry maps each `data-cra-id` value to the live elements
//!   carrying it, in registration order. It is updated on every attribute write
//!   and on subtree removal, so it never holds a removed key. Lookups only
//!   report elements connected to the root; detached or unmounted holders stay
//!   registered and reappear once attached.
//! - The document root can neither be removed nor appended anywhere.

use crate::element::Element;
use crate::error::DomError;
use crate::props::PropValue;
use core_types::{CRA_ID_ATTR, NodeKey, NodeType};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub enum NodeKind {
    Document,
    Fragment,
    Element(Element),
    Text(String),
}

impl NodeKind {
    fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Fragment => NodeType::Fragment,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
        }
    }

    fn allows_children(&self) -> bool {
        !matches!(self, NodeKind::Text(_))
    }
}

#[derive(Clone, Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

/// How a node left the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// Detached from its parent's child list.
    FromParent(NodeKey),
    /// Had no parent; the node dropped itself.
    SelfRemoved,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<NodeRecord>>,
    root: NodeKey,
    registry: HashMap<String, Vec<NodeKey>>,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeKey::INVALID,
            registry: HashMap::new(),
        };
        doc.root = doc.insert(NodeKind::Document);
        doc
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    fn insert(&mut self, kind: NodeKind) -> NodeKey {
        self.nodes.push(Some(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        NodeKey(self.nodes.len() as u32)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeKey {
        self.insert(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeKey {
        self.insert(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeKey {
        self.insert(NodeKind::Fragment)
    }

    fn record(&self, key: NodeKey) -> Result<&NodeRecord, DomError> {
        if !key.is_valid() {
            return Err(DomError::MissingNode(key));
        }
        self.nodes
            .get(key.0 as usize - 1)
            .and_then(Option::as_ref)
            .ok_or(DomError::MissingNode(key))
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, DomError> {
        if !key.is_valid() {
            return Err(DomError::MissingNode(key));
        }
        self.nodes
            .get_mut(key.0 as usize - 1)
            .and_then(Option::as_mut)
            .ok_or(DomError::MissingNode(key))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.record(key).is_ok()
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).map(<[_]>::is_empty).unwrap_or(true)
    }

    pub fn node_type(&self, key: NodeKey) -> Result<NodeType, DomError> {
        Ok(self.record(key)?.kind.node_type())
    }

    pub fn kind(&self, key: NodeKey) -> Result<&NodeKind, DomError> {
        Ok(&self.record(key)?.kind)
    }

    pub fn element(&self, key: NodeKey) -> Result<&Element, DomError> {
        match &self.record(key)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(key)),
        }
    }

    /// Mutable element access for class, style and property writes. Attribute
    /// writes go through [`Document::set_attribute`].
    pub fn element_mut(&mut self, key: NodeKey) -> Result<&mut Element, DomError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(key)),
        }
    }

    pub fn parent(&self, key: NodeKey) -> Result<Option<NodeKey>, DomError> {
        Ok(self.record(key)?.parent)
    }

    pub fn children(&self, key: NodeKey) -> Result<&[NodeKey], DomError> {
        Ok(&self.record(key)?.children)
    }

    /// Append `child` to `parent`.
    ///
    /// A fragment child is emptied into `parent` instead of being attached
    /// itself. A child that already has a parent is moved.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        if !self.record(parent)?.kind.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        let child_type = self.node_type(child)?;
        match child_type {
            NodeType::Document => return Err(DomError::InvalidParent(child)),
            NodeType::Fragment => {
                let moved = std::mem::take(&mut self.record_mut(child)?.children);
                for grandchild in moved {
                    self.record_mut(grandchild)?.parent = None;
                    self.append_child(parent, grandchild)?;
                }
                return Ok(());
            }
            NodeType::Element | NodeType::Text => {}
        }
        if parent == child || self.is_descendant(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        self.detach(child)?;
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink `key` from its parent without dropping it. Returns the former
    /// parent.
    pub fn detach(&mut self, key: NodeKey) -> Result<Option<NodeKey>, DomError> {
        let Some(parent) = self.record_mut(key)?.parent.take() else {
            return Ok(None);
        };
        if let Ok(record) = self.record_mut(parent) {
            record.children.retain(|k| *k != key);
        }
        Ok(Some(parent))
    }

    /// Whether `maybe_descendant` sits somewhere below `ancestor`.
    pub fn is_descendant(&self, ancestor: NodeKey, maybe_descendant: NodeKey) -> bool {
        let Ok(record) = self.record(ancestor) else {
            return false;
        };
        let mut stack: Vec<NodeKey> = record.children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Ok(record) = self.record(current) {
                stack.extend(record.children.iter().copied());
            }
        }
        false
    }

    /// Remove a node and its whole subtree.
    ///
    /// Keys in the subtree become invalid and their identifiers leave the
    /// registry.
    pub fn remove(&mut self, key: NodeKey) -> Result<Removal, DomError> {
        if key == self.root {
            return Err(DomError::InvalidParent(key));
        }
        let removal = match self.detach(key)? {
            Some(parent) => Removal::FromParent(parent),
            None => Removal::SelfRemoved,
        };
        self.drop_subtree(key);
        Ok(removal)
    }

    /// Remove every child of `key`.
    pub fn clear_children(&mut self, key: NodeKey) -> Result<(), DomError> {
        let children = std::mem::take(&mut self.record_mut(key)?.children);
        for child in children {
            if let Ok(record) = self.record_mut(child) {
                record.parent = None;
            }
            self.drop_subtree(child);
        }
        Ok(())
    }

    fn drop_subtree(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.nodes.get_mut(current.0 as usize - 1) else {
                continue;
            };
            let Some(record) = slot.take() else {
                continue;
            };
            if let NodeKind::Element(el) = &record.kind {
                if let Some(id) = el.get_attribute(CRA_ID_ATTR) {
                    self.unregister(&id, current);
                }
            }
            stack.extend(record.children);
        }
    }

    fn register(&mut self, id: &str, key: NodeKey) {
        let entry = self.registry.entry(id.to_string()).or_default();
        if !entry.contains(&key) {
            log::trace!(target: "cradle::dom", "register {id:?} -> {key:?}");
            entry.push(key);
        }
    }

    fn unregister(&mut self, id: &str, key: NodeKey) {
        if let Some(entry) = self.registry.get_mut(id) {
            entry.retain(|k| *k != key);
            log::trace!(target: "cradle::dom", "unregister {id:?} -> {key:?}");
            if entry.is_empty() {
                self.registry.remove(id);
            }
        }
    }

    /// Whether following parents from `key` reaches the document root.
    pub fn is_connected(&self, key: NodeKey) -> bool {
        let mut current = key;
        loop {
            if current == self.root {
                return true;
            }
            match self.record(current) {
                Ok(NodeRecord {
                    parent: Some(parent),
                    ..
                }) => current = *parent,
                _ => return false,
            }
        }
    }

    /// Elements in the tree whose `data-cra-id` equals `id`, in registration
    /// order.
    pub fn query_state_id(&self, id: &str) -> Vec<NodeKey> {
        self.registry
            .get(id)
            .map(|keys| {
                keys.iter()
                    .copied()
                    .filter(|key| self.is_connected(*key))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_attribute(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(key)?;
        let previous = if name == CRA_ID_ATTR {
            el.get_attribute(CRA_ID_ATTR)
        } else {
            None
        };
        el.set_attribute(name, value);
        if name == CRA_ID_ATTR {
            if let Some(previous) = previous {
                self.unregister(&previous, key);
            }
            self.register(value, key);
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, key: NodeKey, name: &str) -> Result<(), DomError> {
        let removed = self.element_mut(key)?.remove_attribute(name);
        if name == CRA_ID_ATTR {
            if let Some(previous) = removed {
                self.unregister(&previous, key);
            }
        }
        Ok(())
    }

    pub fn get_attribute(&self, key: NodeKey, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element(key)?.get_attribute(name))
    }

    /// Whether the node exposes property `name`.
    pub fn has_property(&self, key: NodeKey, name: &str) -> Result<bool, DomError> {
        self.element(key).map(|el| el.has_property(name))
    }

    /// Assign a property. `innerText`/`textContent` replace the children.
    pub fn set_property(
        &mut self,
        key: NodeKey,
        name: &str,
        value: &PropValue,
    ) -> Result<(), DomError> {
        match name {
            "innerText" | "textContent" => self.set_text_content(key, &value.to_string()),
            _ => self.element_mut(key)?.set_property(name, value),
        }
    }

    /// Replace the children with a single text node, or set a text node's data.
    pub fn set_text_content(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        if let NodeKind::Text(existing) = &mut self.record_mut(key)?.kind {
            existing.clear();
            existing.push_str(text);
            return Ok(());
        }
        self.clear_children(key)?;
        if !text.is_empty() {
            self.append_text(key, text)?;
        }
        Ok(())
    }

    pub fn append_text(&mut self, parent: NodeKey, text: &str) -> Result<NodeKey, DomError> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, key: NodeKey) -> Result<String, DomError> {
        let mut out = String::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let record = self.record(current)?;
            if let NodeKind::Text(text) = &record.kind {
                out.push_str(text);
            }
            stack.extend(record.children.iter().rev().copied());
        }
        Ok(out)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(doc: &mut Document, tag: &str) -> NodeKey {
        let el = doc.create_element(tag);
        doc.append_child(doc.root(), el).unwrap();
        el
    }

    #[test]
    fn registry_tracks_identifier_changes() {
        let mut doc = Document::new();
        let el = mounted(&mut doc, "div");
        doc.set_attribute(el, CRA_ID_ATTR, "a").unwrap();
        assert_eq!(doc.query_state_id("a"), &[el]);

        doc.set_attribute(el, CRA_ID_ATTR, "b").unwrap();
        assert!(doc.query_state_id("a").is_empty());
        assert_eq!(doc.query_state_id("b"), &[el]);

        doc.remove_attribute(el, CRA_ID_ATTR).unwrap();
        assert!(doc.query_state_id("b").is_empty());
    }

    #[test]
    fn removal_drops_subtree_registry_entries() {
        let mut doc = Document::new();
        let outer = mounted(&mut doc, "section");
        let inner = doc.create_element("span");
        doc.append_child(outer, inner).unwrap();
        doc.set_attribute(inner, CRA_ID_ATTR, "inner").unwrap();

        assert_eq!(doc.remove(outer).unwrap(), Removal::FromParent(doc.root()));
        assert!(doc.query_state_id("inner").is_empty());
        assert!(!doc.contains(inner));
        assert!(doc.children(doc.root()).unwrap().is_empty());
    }

    #[test]
    fn lookups_skip_detached_and_unmounted_holders() {
        let mut doc = Document::new();
        let mounted_el = mounted(&mut doc, "div");
        doc.set_attribute(mounted_el, CRA_ID_ATTR, "card").unwrap();
        let loose = doc.create_element("div");
        doc.set_attribute(loose, CRA_ID_ATTR, "card").unwrap();
        assert_eq!(doc.query_state_id("card"), vec![mounted_el]);

        doc.detach(mounted_el).unwrap();
        assert!(doc.query_state_id("card").is_empty());
        assert!(!doc.is_connected(mounted_el));

        let root = doc.root();
        doc.append_child(root, loose).unwrap();
        doc.append_child(root, mounted_el).unwrap();
        assert_eq!(doc.query_state_id("card"), vec![mounted_el, loose]);
    }

    #[test]
    fn unparented_node_removes_itself() {
        let mut doc = Document::new();
        let loose = doc.create_element("div");
        assert_eq!(doc.remove(loose).unwrap(), Removal::SelfRemoved);
        assert!(matches!(doc.element(loose), Err(DomError::MissingNode(_))));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut doc = Document::new();
        let root = doc.root();
        assert!(doc.remove(root).is_err());
    }

    #[test]
    fn fragment_children_move_into_parent() {
        let mut doc = Document::new();
        let frag = doc.create_fragment();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(frag, a).unwrap();
        doc.append_child(frag, b).unwrap();

        let host = mounted(&mut doc, "div");
        doc.append_child(host, frag).unwrap();
        assert_eq!(doc.children(host).unwrap(), &[a, b]);
        assert!(doc.children(frag).unwrap().is_empty());
        assert_eq!(doc.parent(a).unwrap(), Some(host));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut doc = Document::new();
        let outer = mounted(&mut doc, "div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        assert!(matches!(
            doc.append_child(inner, outer),
            Err(DomError::CycleDetected { .. })
        ));
    }

    #[test]
    fn appending_moves_between_parents() {
        let mut doc = Document::new();
        let first = mounted(&mut doc, "ul");
        let second = mounted(&mut doc, "ol");
        let item = doc.create_element("li");
        doc.append_child(first, item).unwrap();
        doc.append_child(second, item).unwrap();
        assert!(doc.children(first).unwrap().is_empty());
        assert_eq!(doc.children(second).unwrap(), &[item]);
    }

    #[test]
    fn text_content_replaces_children() {
        let mut doc = Document::new();
        let p = mounted(&mut doc, "p");
        let span = doc.create_element("span");
        doc.append_child(p, span).unwrap();
        doc.append_text(span, "old").unwrap();

        doc.set_property(p, "innerText", &"new".into()).unwrap();
        assert_eq!(doc.text_content(p).unwrap(), "new");
        assert!(!doc.contains(span));
    }

    #[test]
    fn text_nodes_cannot_take_children() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        let el = doc.create_element("b");
        assert!(matches!(
            doc.append_child(text, el),
            Err(DomError::InvalidParent(_))
        ));
    }
}
