//! Variadic tree construction.
//!
//! An initializer list is an ordered sequence of [`Initial`] items. A leading
//! selector names the element to create and seeds its `className`, `id` and
//! `innerText`; every other item is either a property bag or a child.

pub mod json;

pub use json::{ShapeError, prop_from_json};

use dom::{BuildItem, Document, DomError, NodeKey, PropertyBag, TreeBuilder};
use selector::Descriptor;

/// One item of an initializer list.
#[derive(Clone, Debug, PartialEq)]
pub enum Initial {
    /// Selector string. Only meaningful in first position; later it is text.
    Selector(String),
    Props(PropertyBag),
    Node(NodeKey),
    Text(String),
    /// A nested list, built into its own node.
    Nested(Vec<Initial>),
}

impl From<&str> for Initial {
    fn from(value: &str) -> Self {
        Initial::Selector(value.to_string())
    }
}

impl From<String> for Initial {
    fn from(value: String) -> Self {
        Initial::Selector(value)
    }
}

impl From<PropertyBag> for Initial {
    fn from(value: PropertyBag) -> Self {
        Initial::Props(value)
    }
}

impl From<NodeKey> for Initial {
    fn from(value: NodeKey) -> Self {
        Initial::Node(value)
    }
}

impl From<Vec<Initial>> for Initial {
    fn from(value: Vec<Initial>) -> Self {
        Initial::Nested(value)
    }
}

/// Descriptor for the first item of a list.
///
/// A single-element nested list is unwrapped once. Anything that is not a
/// selector yields [`Descriptor::fragment`].
pub fn parse_initial(first: Option<&Initial>) -> Descriptor {
    match first {
        Some(Initial::Selector(s)) => selector::parse(s),
        Some(Initial::Nested(inner)) => match inner.as_slice() {
            [Initial::Selector(s)] => selector::parse(s),
            _ => Descriptor::fragment(),
        },
        _ => Descriptor::fragment(),
    }
}

fn seed_props(descriptor: &Descriptor) -> PropertyBag {
    let mut bag = PropertyBag::new();
    if let Some(class_names) = &descriptor.class_names {
        bag.insert("className", class_names.as_str());
    }
    if let Some(id) = &descriptor.id {
        bag.insert("id", id.as_str());
    }
    if let Some(text) = &descriptor.inline_text {
        bag.insert("innerText", text.as_str());
    }
    bag
}

/// Build a node from an initializer list with the default tree builder.
pub fn make(doc: &mut Document, items: Vec<Initial>) -> Result<NodeKey, DomError> {
    make_with(&TreeBuilder::default(), doc, items)
}

/// Build a node from an initializer list.
///
/// Returns an element when the list starts with a selector and a fragment
/// otherwise. Seeded properties only fill keys the caller's first property
/// bag leaves unset.
pub fn make_with(
    builder: &TreeBuilder,
    doc: &mut Document,
    items: Vec<Initial>,
) -> Result<NodeKey, DomError> {
    let descriptor = parse_initial(items.first());
    let mut rest = items.into_iter();

    let (root, seeded) = if descriptor.is_fragment() {
        (doc.create_fragment(), PropertyBag::new())
    } else {
        rest.next();
        log::trace!(target: "cradle::template", "make <{}>", descriptor.tag);
        (doc.create_element(&descriptor.tag), seed_props(&descriptor))
    };

    let build = build_items(builder, doc, seeded, rest)?;
    builder.build(doc, root, build)?;
    Ok(root)
}

/// Build `items` as the children of a new fragment. The first item gets no
/// selector treatment, so a list of nested lists yields siblings.
pub fn make_fragment(doc: &mut Document, items: Vec<Initial>) -> Result<NodeKey, DomError> {
    let builder = TreeBuilder::default();
    let root = doc.create_fragment();
    let build = build_items(&builder, doc, PropertyBag::new(), items)?;
    builder.build(doc, root, build)?;
    Ok(root)
}

fn build_items(
    builder: &TreeBuilder,
    doc: &mut Document,
    seeded: PropertyBag,
    items: impl IntoIterator<Item = Initial>,
) -> Result<Vec<BuildItem>, DomError> {
    let mut build = Vec::new();
    let mut seeded = Some(seeded);
    for item in items {
        match item {
            Initial::Props(caller) => match seeded.take() {
                Some(seed) => build.push(BuildItem::Props(seed.merged_under(caller))),
                None => build.push(BuildItem::Props(caller)),
            },
            Initial::Node(node) => build.push(BuildItem::Node(node)),
            Initial::Text(text) | Initial::Selector(text) => build.push(BuildItem::Text(text)),
            Initial::Nested(inner) => {
                let child = make_with(builder, doc, inner)?;
                build.push(BuildItem::Node(child));
            }
        }
    }
    if let Some(seed) = seeded.filter(|bag| !bag.is_empty()) {
        build.push(BuildItem::Props(seed));
    }
    Ok(build)
}

/// Build a node from a selector, optional property bags and children.
///
/// ```ignore
/// let card = el!(&mut doc, "section.card#main", PropertyBag::new().with("title", "x"), "body text");
/// ```
#[macro_export]
macro_rules! el {
    ($doc:expr, $($item:expr),+ $(,)?) => {
        $crate::make($doc, vec![$($crate::Initial::from($item)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::snapshot::assert_snapshot;
    use dom::{NodeType, PropValue};

    #[test]
    fn selector_seeds_props() {
        let mut doc = Document::new();
        let p = make(&mut doc, vec!["p#intro.lead|Hello".into()]).unwrap();
        let el = doc.element(p).unwrap();
        assert_eq!(el.tag_name(), "P");
        assert_eq!(el.id(), Some("intro"));
        assert_eq!(el.get_attribute("class").as_deref(), Some("lead"));
        assert_eq!(doc.text_content(p).unwrap(), "Hello");
    }

    #[test]
    fn caller_props_win_over_selector() {
        let mut doc = Document::new();
        let node = make(
            &mut doc,
            vec![
                "div#seeded.a".into(),
                PropertyBag::new().with("id", "explicit").into(),
            ],
        )
        .unwrap();
        let el = doc.element(node).unwrap();
        assert_eq!(el.id(), Some("explicit"));
        assert_eq!(el.get_attribute("class").as_deref(), Some("a"));
    }

    #[test]
    fn non_selector_first_item_builds_fragment() {
        let mut doc = Document::new();
        let frag = make(
            &mut doc,
            vec![Initial::Text("x".into()), Initial::Nested(vec!["b".into()])],
        )
        .unwrap();
        assert_eq!(doc.node_type(frag).unwrap(), NodeType::Fragment);
        assert_eq!(doc.children(frag).unwrap().len(), 2);
    }

    #[test]
    fn single_nested_selector_is_unwrapped() {
        let mut doc = Document::new();
        let node = make(
            &mut doc,
            vec![Initial::Nested(vec!["span.x".into()]), Initial::Text("t".into())],
        )
        .unwrap();
        assert_eq!(doc.element(node).unwrap().local_name(), "span");
        assert_eq!(doc.text_content(node).unwrap(), "t");
    }

    #[test]
    fn macro_builds_nested_tree() {
        let mut doc = Document::new();
        let item = el!(&mut doc, "li|one").unwrap();
        let list = el!(
            &mut doc,
            "ul.menu",
            PropertyBag::new().with("stateID", "menu"),
            item,
            vec![Initial::from("li|two")],
        )
        .unwrap();
        doc.append_child(doc.root(), list).unwrap();
        assert_eq!(doc.query_state_id("menu"), &[list]);
        assert_snapshot(
            &doc,
            list,
            r#"
<ul data-cra-id="menu" class="menu">
  <li>
    "one"
  <li>
    "two"
"#,
        );
    }

    #[test]
    fn fragment_keeps_nested_lists_as_siblings() {
        let mut doc = Document::new();
        let frag = make_fragment(
            &mut doc,
            vec![
                Initial::Nested(vec!["li|a".into()]),
                Initial::Nested(vec!["li|b".into()]),
            ],
        )
        .unwrap();
        assert_eq!(doc.to_html(frag).unwrap(), "<li>a</li><li>b</li>");

        let unwrapped = make(
            &mut doc,
            vec![
                Initial::Nested(vec!["li|a".into()]),
                Initial::Nested(vec!["li|b".into()]),
            ],
        )
        .unwrap();
        assert_eq!(doc.to_html(unwrapped).unwrap(), "<li>a<li>b</li></li>");
    }

    #[test]
    fn later_strings_are_text() {
        let mut doc = Document::new();
        let node = make(&mut doc, vec!["b".into(), "bold".into()]).unwrap();
        assert_eq!(doc.to_html(node).unwrap(), "<b>bold</b>");
    }

    #[test]
    fn numeric_props_stringify() {
        let mut doc = Document::new();
        let node = make(
            &mut doc,
            vec!["input".into(), PropertyBag::new().with("tabIndex", 2).into()],
        )
        .unwrap();
        assert_eq!(
            doc.element(node).unwrap().property("tabIndex"),
            Some(PropValue::from("2"))
        );
    }
}
