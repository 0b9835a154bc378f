//! Materializes property bags and children onto a node.

use crate::document::{Document, NodeKind};
use crate::error::DomError;
use crate::props::{PropValue, PropertyBag};
use core_types::{CRA_ID_ATTR, NodeKey, NodeType, STATE_ID_PROP};
use css::{StyleDeclaration, is_style_property};

/// One entry of a build list.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildItem {
    Props(PropertyBag),
    Node(NodeKey),
    Text(String),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TreeBuilderConfig {
    /// Whether text appended right after a text child merges into it.
    pub coalesce_text: bool,
}

/// Applies build lists to live nodes.
///
/// Every `Props` item is applied before any child is appended, so a bag's
/// `innerText` always lands ahead of explicit children. Children keep list
/// order. Identifiers assigned here (`stateID` or a literal `data-cra-id`)
/// enter the document registry immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeBuilder {
    config: TreeBuilderConfig,
}

impl TreeBuilder {
    pub fn new(config: TreeBuilderConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        doc: &mut Document,
        root: NodeKey,
        items: Vec<BuildItem>,
    ) -> Result<(), DomError> {
        let is_element = doc.node_type(root)? == NodeType::Element;
        let mut children = Vec::new();
        for item in items {
            match item {
                BuildItem::Props(bag) if is_element => self.apply_props(doc, root, bag)?,
                BuildItem::Props(bag) => {
                    log::trace!(
                        target: "cradle::dom",
                        "ignoring {} props on non-element {root:?}",
                        bag.len()
                    );
                }
                child => children.push(child),
            }
        }
        for child in children {
            match child {
                BuildItem::Node(node) => doc.append_child(root, node)?,
                BuildItem::Text(text) => self.append_text(doc, root, &text)?,
                BuildItem::Props(_) => {}
            }
        }
        Ok(())
    }

    fn apply_props(
        &self,
        doc: &mut Document,
        key: NodeKey,
        bag: PropertyBag,
    ) -> Result<(), DomError> {
        for (name, value) in bag {
            self.apply_prop(doc, key, &name, &value)?;
        }
        Ok(())
    }

    fn apply_prop(
        &self,
        doc: &mut Document,
        key: NodeKey,
        name: &str,
        value: &PropValue,
    ) -> Result<(), DomError> {
        match name {
            "style" => apply_style(doc, key, value),
            STATE_ID_PROP => doc.set_attribute(key, CRA_ID_ATTR, &value.to_string()),
            "className" | "class" => {
                let classes = value.to_string();
                let list = doc.element_mut(key)?.class_list_mut();
                for token in classes.split_whitespace() {
                    list.add(token);
                }
                Ok(())
            }
            "innerText" | "text" => self.append_text(doc, key, &value.to_string()),
            _ => {
                if let Some(data) = name.strip_prefix('$') {
                    doc.set_attribute(key, &format!("data-{data}"), &value.to_string())
                } else if name.contains('-') {
                    doc.set_attribute(key, name, &value.to_string())
                } else {
                    doc.set_property(key, name, value)
                }
            }
        }
    }

    fn append_text(&self, doc: &mut Document, parent: NodeKey, text: &str) -> Result<(), DomError> {
        if text.is_empty() {
            return Ok(());
        }
        if self.config.coalesce_text {
            if let Some(&last) = doc.children(parent)?.last() {
                if let NodeKind::Text(existing) = doc.kind(last)? {
                    let merged = format!("{existing}{text}");
                    return doc.set_text_content(last, &merged);
                }
            }
        }
        doc.append_text(parent, text).map(|_| ())
    }
}

/// Validate and assign a style value: a mapping or inline css text. Nothing
/// is written unless every property name is recognized.
pub fn apply_style(doc: &mut Document, key: NodeKey, value: &PropValue) -> Result<(), DomError> {
    let entries: Vec<(String, String)> = match value {
        PropValue::Style(entries) => entries.clone(),
        other => StyleDeclaration::from_css_text(&other.to_string())
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };
    for (name, _) in &entries {
        if !is_style_property(name) {
            return Err(DomError::InvalidStyleProperty(name.clone()));
        }
    }
    let style = doc.element_mut(key)?.style_mut();
    for (name, value) in &entries {
        style.set(name, value);
    }
    Ok(())
}
