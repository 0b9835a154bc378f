//! Per-node patch application.

use crate::error::DispatchError;
use crate::patch::{Patch, PatchOp, TreeSource};
use css::is_style_property;
use dom::{Document, DomError, NodeKey, PropValue, apply_style};

/// Keys assigned without an invalid-attribute warning even when the node
/// has no such property.
fn is_quiet_key(name: &str) -> bool {
    matches!(name, "for" | "text" | "class") || name.contains("aria")
}

fn is_style_shorthand(name: &str) -> bool {
    name != "src" && is_style_property(name)
}

/// Apply every op of `patch` to `key`, in order.
///
/// Unrecognized style names abort with [`DispatchError::InvalidStyleProperty`];
/// ops applied before the failure stay applied. Other per-op failures are
/// logged and the remaining ops still run.
pub fn apply_patch(doc: &mut Document, key: NodeKey, patch: &Patch) -> Result<(), DispatchError> {
    for op in &patch.ops {
        log::trace!(target: "cradle::dispatch", "{key:?} <- {op:?}");
        match apply_op(doc, key, op) {
            Ok(()) => {}
            Err(DomError::InvalidStyleProperty(name)) => {
                return Err(DispatchError::InvalidStyleProperty(name));
            }
            Err(err) => {
                log::error!(
                    target: "cradle::dispatch",
                    "patching `{}` on {key:?} failed: {err}",
                    op.key()
                );
            }
        }
    }
    Ok(())
}

fn apply_op(doc: &mut Document, key: NodeKey, op: &PatchOp) -> Result<(), DomError> {
    match op {
        PatchOp::Style(entries) => {
            if let Some((name, _)) = entries.iter().find(|(name, _)| !is_style_shorthand(name)) {
                return Err(DomError::InvalidStyleProperty(name.clone()));
            }
            let style = doc.element_mut(key)?.style_mut();
            for (name, value) in entries {
                style.set(name, value);
            }
            Ok(())
        }
        PatchOp::Property { name, value } if name == "style" => apply_style(doc, key, value),
        PatchOp::Property { name, value } if is_style_shorthand(name) => {
            doc.element_mut(key)?.style_mut().set(name, &value.to_string());
            Ok(())
        }
        PatchOp::Call { callback, .. } => {
            callback(doc, key);
            Ok(())
        }
        PatchOp::Text(text) => doc.set_text_content(key, text),
        PatchOp::Class(classes) => {
            let list = doc.element_mut(key)?.class_list_mut();
            for token in classes.split_whitespace() {
                list.add(token);
            }
            Ok(())
        }
        PatchOp::Remove => {
            let removal = doc.remove(key)?;
            log::trace!(target: "cradle::dispatch", "removed {key:?}: {removal:?}");
            Ok(())
        }
        PatchOp::Data { name, value } => doc.set_attribute(key, &format!("data-{name}"), value),
        PatchOp::Tree(source) => replace_tree(doc, key, source),
        PatchOp::Property { name, value } => assign_property(doc, key, name, value),
    }
}

fn replace_tree(doc: &mut Document, key: NodeKey, source: &TreeSource) -> Result<(), DomError> {
    let fragment = match source {
        TreeSource::Initials(items) => template::make(doc, items.clone())?,
        TreeSource::Build(build) => build(doc)?,
        TreeSource::Node(node) => {
            if *node == key || doc.is_descendant(*node, key) {
                return Err(DomError::CycleDetected {
                    parent: key,
                    child: *node,
                });
            }
            // Keep the source alive if it currently sits under `key`.
            doc.detach(*node)?;
            *node
        }
    };
    doc.clear_children(key)?;
    doc.append_child(key, fragment)
}

fn assign_property(
    doc: &mut Document,
    key: NodeKey,
    name: &str,
    value: &PropValue,
) -> Result<(), DomError> {
    let exposed = doc.has_property(key, name)?;
    doc.set_property(key, name, value)?;
    if !exposed && !is_quiet_key(name) {
        log::warn!(target: "cradle::dispatch", "invalid html attribute {name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::CRA_ID_ATTR;

    fn mounted(doc: &mut Document) -> NodeKey {
        let el = doc.create_element("div");
        doc.append_child(doc.root(), el).unwrap();
        el
    }

    #[test]
    fn style_shorthand_property_sets_style() {
        let mut doc = Document::new();
        let el = mounted(&mut doc);
        apply_patch(&mut doc, el, &Patch::new().property("backgroundColor", "red")).unwrap();
        let el_ref = doc.element(el).unwrap();
        assert_eq!(el_ref.style().get("background-color"), Some("red"));
        assert!(!el_ref.has_property("backgroundColor"));
    }

    #[test]
    fn style_property_goes_through_validation() {
        let mut doc = Document::new();
        let el = mounted(&mut doc);
        let bad_map = Patch::new().property(
            "style",
            PropValue::Style(vec![("colr".to_string(), "red".to_string())]),
        );
        let err = apply_patch(&mut doc, el, &bad_map).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidStyleProperty(name) if name == "colr"));

        let bad_text = Patch::new().property("style", "bogus-prop: 1");
        let err = apply_patch(&mut doc, el, &bad_text).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidStyleProperty(name) if name == "bogus-prop"));
        assert_eq!(doc.get_attribute(el, "style").unwrap(), None);

        apply_patch(&mut doc, el, &Patch::new().property("style", "color: red")).unwrap();
        assert_eq!(doc.get_attribute(el, "style").unwrap().as_deref(), Some("color: red;"));
    }

    #[test]
    fn tree_from_an_ancestor_leaves_the_document_intact() {
        let mut doc = Document::new();
        let outer = mounted(&mut doc);
        let inner = doc.create_element("span");
        doc.append_child(outer, inner).unwrap();
        doc.append_text(inner, "keep").unwrap();

        apply_patch(&mut doc, inner, &Patch::new().tree(TreeSource::Node(outer))).unwrap();
        assert_eq!(doc.children(doc.root()).unwrap(), &[outer]);
        assert_eq!(doc.parent(inner).unwrap(), Some(outer));
        assert_eq!(doc.text_content(inner).unwrap(), "keep");

        apply_patch(&mut doc, inner, &Patch::new().tree(TreeSource::Node(inner))).unwrap();
        assert_eq!(doc.text_content(inner).unwrap(), "keep");
    }

    #[test]
    fn src_is_never_a_style() {
        let mut doc = Document::new();
        let img = doc.create_element("img");
        apply_patch(&mut doc, img, &Patch::new().property("src", "/a.png")).unwrap();
        assert_eq!(doc.get_attribute(img, "src").unwrap().as_deref(), Some("/a.png"));

        let err = apply_patch(&mut doc, img, &Patch::new().style("src", "x")).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidStyleProperty(name) if name == "src"));
    }

    #[test]
    fn invalid_style_aborts_after_earlier_ops() {
        let mut doc = Document::new();
        let el = mounted(&mut doc);
        let patch = Patch::new()
            .text("kept")
            .style("colr", "red")
            .class("never");
        let err = apply_patch(&mut doc, el, &patch).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidStyleProperty(name) if name == "colr"));
        assert_eq!(doc.text_content(el).unwrap(), "kept");
        assert!(!doc.element(el).unwrap().class_list().contains("never"));
    }

    #[test]
    fn read_only_property_is_logged_not_fatal() {
        let mut doc = Document::new();
        let el = mounted(&mut doc);
        let patch = Patch::new().property("tagName", "SPAN").text("after");
        apply_patch(&mut doc, el, &patch).unwrap();
        assert_eq!(doc.element(el).unwrap().tag_name(), "DIV");
        assert_eq!(doc.text_content(el).unwrap(), "after");
    }

    #[test]
    fn ops_after_remove_are_harmless() {
        let mut doc = Document::new();
        let el = mounted(&mut doc);
        doc.set_attribute(el, CRA_ID_ATTR, "gone").unwrap();
        apply_patch(&mut doc, el, &Patch::new().remove().text("late")).unwrap();
        assert!(!doc.contains(el));
        assert!(doc.query_state_id("gone").is_empty());
    }

    #[test]
    fn call_receives_the_node() {
        let mut doc = Document::new();
        let el = mounted(&mut doc);
        let patch = Patch::new().call("mark", |doc, key| {
            doc.set_attribute(key, "data-called", "yes").unwrap();
        });
        apply_patch(&mut doc, el, &patch).unwrap();
        assert_eq!(doc.get_attribute(el, "data-called").unwrap().as_deref(), Some("yes"));
    }

    #[test]
    fn tree_from_existing_descendant_survives_clear() {
        let mut doc = Document::new();
        let el = mounted(&mut doc);
        let inner = doc.create_element("span");
        doc.append_child(el, inner).unwrap();
        doc.append_text(el, "old").unwrap();
        apply_patch(&mut doc, el, &Patch::new().tree(TreeSource::Node(inner))).unwrap();
        assert_eq!(doc.children(el).unwrap(), &[inner]);
    }
}
