//! A re-renderable component addressed by its identifier.

use dispatch::{DispatchError, Dispatched, Patch, TreeSource, dispatch};
use dom::{Document, DomError, NodeKey, PropertyBag, STATE_ID_PROP};
use serde_json::Value;
use signal::Consumer;
use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;
use template::Initial;

/// Produces a component's children from its data.
pub type Template = Rc<dyn Fn(&Value) -> Vec<Initial>>;

type Effect = Box<dyn FnOnce(&Value)>;

#[derive(Debug, Default)]
struct RefState {
    bound: Option<Value>,
    stash: Option<Value>,
    node: Option<NodeKey>,
    removed: bool,
}

/// Component whose root element carries a fixed identifier.
///
/// [`Ref::render`] builds the root from a selector and the template's
/// children; [`Ref::update_state`] rebuilds only the children through a
/// `tree` patch. Bound to a [`signal::Signal`], it re-renders on every
/// notified change.
pub struct Ref {
    doc: Rc<RefCell<Document>>,
    state_id: String,
    selector: String,
    template: Template,
    state: RefCell<RefState>,
    effects: RefCell<Vec<Effect>>,
}

impl Ref {
    pub fn new(
        doc: Rc<RefCell<Document>>,
        state_id: &str,
        selector: &str,
        template: impl Fn(&Value) -> Vec<Initial> + 'static,
    ) -> Self {
        Self {
            doc,
            state_id: state_id.to_string(),
            selector: selector.to_string(),
            template: Rc::new(template),
            state: RefCell::new(RefState::default()),
            effects: RefCell::new(Vec::new()),
        }
    }

    pub fn state_id(&self) -> &str {
        &self.state_id
    }

    /// Build the component. Without `data` the value pre-bound by a store is
    /// used, then `null`. The node is not mounted; a previously rendered
    /// instance is removed from the document. Pending effects run afterwards
    /// with the rendered data.
    pub fn render(&self, data: Option<Value>) -> Result<NodeKey, DomError> {
        let data = {
            let state = self.state.borrow();
            data.or_else(|| state.bound.clone()).unwrap_or(Value::Null)
        };
        let mut items = vec![
            Initial::Selector(self.selector.clone()),
            Initial::Props(PropertyBag::new().with(STATE_ID_PROP, self.state_id.as_str())),
        ];
        items.extend((self.template)(&data));
        let node = template::make(&mut self.doc.borrow_mut(), items)?;
        if let Some(previous) = self.instance() {
            log::debug!(target: "cradle::ref", "{} re-rendered; dropping {previous:?}", self.state_id);
            self.doc.borrow_mut().remove(previous)?;
        }

        {
            let mut state = self.state.borrow_mut();
            state.stash = Some(data.clone());
            state.node = Some(node);
            state.removed = false;
        }
        let effects = std::mem::take(&mut *self.effects.borrow_mut());
        for effect in effects {
            effect(&data);
        }
        Ok(node)
    }

    /// Run `f` once, after the next render.
    pub fn effect(&self, f: impl FnOnce(&Value) + 'static) {
        self.effects.borrow_mut().push(Box::new(f));
    }

    /// The rendered root, while it is still in the document.
    pub fn instance(&self) -> Option<NodeKey> {
        let node = self.state.borrow().node?;
        self.doc.borrow().contains(node).then_some(node)
    }

    /// Rebuild the children of every node carrying this identifier from
    /// `data`, and stash it.
    pub fn update_state(&self, data: &Value) -> Result<Dispatched, DispatchError> {
        self.state.borrow_mut().stash = Some(data.clone());
        let items = (self.template)(data);
        let patch = Patch::new().tree(TreeSource::Build(Rc::new(move |doc: &mut Document| {
            template::make_fragment(doc, items.clone())
        })));
        dispatch(&mut self.doc.borrow_mut(), self.state_id.as_str(), Some(&patch))
    }

    /// Keep `data` as the stash without touching the document.
    pub fn stash_state(&self, data: Value) {
        self.state.borrow_mut().stash = Some(data);
    }

    /// Remove the rendered root. The component stops accepting store
    /// updates until it renders again.
    pub fn remove(&self) -> Result<(), DomError> {
        if let Some(node) = self.instance() {
            self.doc.borrow_mut().remove(node)?;
        }
        let mut state = self.state.borrow_mut();
        state.node = None;
        state.removed = true;
        Ok(())
    }

    /// Last data this component rendered or was updated with.
    pub fn stash(&self) -> Option<Value> {
        self.state.borrow().stash.clone()
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("state_id", &self.state_id)
            .field("selector", &self.selector)
            .field("state", &self.state.borrow())
            .field("pending_effects", &self.effects.borrow().len())
            .finish()
    }
}

impl Consumer for Ref {
    fn has_update_entry(&self) -> bool {
        !self.state.borrow().removed
    }

    fn bind_render(&self, initial: Value) {
        self.state.borrow_mut().bound = Some(initial);
    }

    fn update_state(&self, value: &Value) -> Result<(), Box<dyn Error>> {
        if self.state.borrow().removed {
            log::debug!(target: "cradle::ref", "{} is removed; update dropped", self.state_id);
            return Ok(());
        }
        Ref::update_state(self, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter(doc: &Rc<RefCell<Document>>) -> Ref {
        Ref::new(Rc::clone(doc), "counter", "p.count", |data| {
            vec![Initial::Text(format!("count: {}", data["n"]))]
        })
    }

    #[test]
    fn render_then_update() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = counter(&doc);
        let node = r.render(Some(json!({"n": 1}))).unwrap();
        {
            let mut d = doc.borrow_mut();
            let root = d.root();
            d.append_child(root, node).unwrap();
        }
        assert_eq!(r.instance(), Some(node));

        let out = r.update_state(&json!({"n": 2})).unwrap();
        assert_eq!(out, Dispatched::One(node));
        assert_eq!(
            doc.borrow().to_html(node).unwrap(),
            r#"<p data-cra-id="counter" class="count">count: 2</p>"#
        );
        assert_eq!(r.stash(), Some(json!({"n": 2})));
    }

    #[test]
    fn render_uses_bound_value() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = counter(&doc);
        r.bind_render(json!({"n": 5}));
        let node = r.render(None).unwrap();
        assert_eq!(doc.borrow().text_content(node).unwrap(), "count: 5");
    }

    #[test]
    fn removed_ref_rejects_binding() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = counter(&doc);
        let node = r.render(None).unwrap();
        r.remove().unwrap();
        assert!(!doc.borrow().contains(node));
        assert_eq!(r.instance(), None);
        assert!(!r.has_update_entry());

        r.render(None).unwrap();
        assert!(r.has_update_entry());
    }

    #[test]
    fn update_rebuilds_sibling_children() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = Ref::new(Rc::clone(&doc), "tags", "ul", |data| {
            data.as_array()
                .into_iter()
                .flatten()
                .map(|tag| Initial::Nested(vec![Initial::Selector(format!("li|{}", tag.as_str().unwrap_or("")))]))
                .collect()
        });
        let node = r.render(Some(json!(["a"]))).unwrap();
        {
            let mut d = doc.borrow_mut();
            let root = d.root();
            d.append_child(root, node).unwrap();
        }
        r.update_state(&json!(["b", "c"])).unwrap();
        assert_eq!(
            doc.borrow().to_html(node).unwrap(),
            r#"<ul data-cra-id="tags"><li>b</li><li>c</li></ul>"#
        );
    }

    #[test]
    fn rerender_replaces_the_previous_instance() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = counter(&doc);
        let first = r.render(Some(json!({"n": 1}))).unwrap();
        {
            let mut d = doc.borrow_mut();
            let root = d.root();
            d.append_child(root, first).unwrap();
        }
        let second = r.render(Some(json!({"n": 2}))).unwrap();
        assert!(!doc.borrow().contains(first));
        {
            let mut d = doc.borrow_mut();
            let root = d.root();
            d.append_child(root, second).unwrap();
        }

        let out = r.update_state(&json!({"n": 3})).unwrap();
        assert_eq!(out, Dispatched::One(second));
        assert_eq!(doc.borrow().text_content(second).unwrap(), "count: 3");
    }

    #[test]
    fn detached_instance_is_not_updated() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = counter(&doc);
        let node = r.render(Some(json!({"n": 1}))).unwrap();
        assert_eq!(r.update_state(&json!({"n": 2})).unwrap(), Dispatched::None);
        assert_eq!(doc.borrow().text_content(node).unwrap(), "count: 1");
    }

    #[test]
    fn stash_state_leaves_the_document_alone() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = counter(&doc);
        let node = r.render(Some(json!({"n": 1}))).unwrap();
        r.stash_state(json!({"n": 9}));
        assert_eq!(r.stash(), Some(json!({"n": 9})));
        assert_eq!(doc.borrow().text_content(node).unwrap(), "count: 1");
    }

    #[test]
    fn effects_run_once_after_render() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let r = counter(&doc);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        r.effect(move |data| sink.borrow_mut().push(data["n"].clone()));

        r.render(Some(json!({"n": 1}))).unwrap();
        r.render(Some(json!({"n": 2}))).unwrap();
        assert_eq!(*seen.borrow(), vec![json!(1)]);
    }
}
