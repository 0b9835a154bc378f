use crate::error::DomError;
use crate::props::PropValue;
use css::StyleDeclaration;

/// Properties the host exposes but never lets callers assign.
const READ_ONLY_PROPERTIES: &[&str] = &[
    "attributes",
    "childElementCount",
    "childNodes",
    "children",
    "classList",
    "clientHeight",
    "clientWidth",
    "dataset",
    "firstChild",
    "firstElementChild",
    "isConnected",
    "lastChild",
    "lastElementChild",
    "localName",
    "nextSibling",
    "nodeName",
    "nodeType",
    "offsetHeight",
    "offsetLeft",
    "offsetTop",
    "offsetWidth",
    "ownerDocument",
    "parentElement",
    "parentNode",
    "previousSibling",
    "scrollHeight",
    "scrollWidth",
    "tagName",
];

/// `(property, attribute)` pairs whose value is mirrored into an attribute.
const REFLECTED_PROPERTIES: &[(&str, &str)] = &[
    ("accessKey", "accesskey"),
    ("action", "action"),
    ("alt", "alt"),
    ("contentEditable", "contenteditable"),
    ("dir", "dir"),
    ("draggable", "draggable"),
    ("href", "href"),
    ("htmlFor", "for"),
    ("lang", "lang"),
    ("method", "method"),
    ("name", "name"),
    ("placeholder", "placeholder"),
    ("rel", "rel"),
    ("role", "role"),
    ("src", "src"),
    ("tabIndex", "tabindex"),
    ("target", "target"),
    ("title", "title"),
    ("type", "type"),
    ("value", "value"),
];

/// Reflected properties whose attribute is present-or-absent.
const BOOLEAN_PROPERTIES: &[(&str, &str)] = &[
    ("autofocus", "autofocus"),
    ("checked", "checked"),
    ("disabled", "disabled"),
    ("hidden", "hidden"),
    ("multiple", "multiple"),
    ("open", "open"),
    ("readOnly", "readonly"),
    ("required", "required"),
    ("selected", "selected"),
];

fn reflected_attr(name: &str) -> Option<&'static str> {
    REFLECTED_PROPERTIES
        .iter()
        .find(|(prop, _)| *prop == name)
        .map(|(_, attr)| *attr)
}

fn boolean_attr(name: &str) -> Option<&'static str> {
    BOOLEAN_PROPERTIES
        .iter()
        .find(|(prop, _)| *prop == name)
        .map(|(_, attr)| *attr)
}

// `onclick`, `oninput`, ... exist on every element even while unset.
fn is_event_handler(name: &str) -> bool {
    name.len() > 2
        && name.starts_with("on")
        && name[2..].bytes().all(|b| b.is_ascii_lowercase())
}

/// Set semantics over an element's class tokens: insertion ordered, no
/// duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Add a token; returns `false` when it was already present or empty.
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    pub fn remove(&mut self, token: &str) {
        self.tokens.retain(|t| t != token);
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Replace all tokens with the whitespace-separated tokens of `value`.
    pub fn set_value(&mut self, value: &str) {
        self.tokens.clear();
        for token in value.split_whitespace() {
            self.add(token);
        }
    }

    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

/// Payload of an element node.
///
/// `class` and `style` are kept structured in [`ClassList`] and
/// [`StyleDeclaration`]; every other attribute is a plain ordered pair.
/// Properties that are neither reflected nor built in live as expandos.
#[derive(Clone, Debug)]
pub struct Element {
    local_name: String,
    attributes: Vec<(String, String)>,
    class_list: ClassList,
    style: StyleDeclaration,
    expandos: Vec<(String, PropValue)>,
}

impl Element {
    pub fn new(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_string(),
            attributes: Vec::new(),
            class_list: ClassList::default(),
            style: StyleDeclaration::new(),
            expandos: Vec::new(),
        }
    }

    /// Tag name exactly as it was created.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// ASCII-uppercase tag name, like a DOM `tagName`.
    pub fn tag_name(&self) -> String {
        self.local_name.to_ascii_uppercase()
    }

    pub fn id(&self) -> Option<&str> {
        self.plain_attribute("id")
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match name {
            "class" if !self.class_list.is_empty() => Some(self.class_list.value()),
            "class" => None,
            "style" if !self.style.is_empty() => Some(self.style.css_text()),
            "style" => None,
            _ => self.plain_attribute(name).map(str::to_string),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    fn plain_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute writes go through `Document::set_attribute` so the identifier
    /// registry stays in sync.
    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match name {
            "class" => self.class_list.set_value(value),
            "style" => self.style.set_css_text(value),
            _ => match self.attributes.iter_mut().find(|(k, _)| k == name) {
                Some((_, existing)) => {
                    existing.clear();
                    existing.push_str(value);
                }
                None => self.attributes.push((name.to_string(), value.to_string())),
            },
        }
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> Option<String> {
        match name {
            "class" => {
                let old = self.get_attribute("class");
                self.class_list.set_value("");
                old
            }
            "style" => {
                let old = self.get_attribute("style");
                self.style.set_css_text("");
                old
            }
            _ => {
                let pos = self.attributes.iter().position(|(k, _)| k == name)?;
                Some(self.attributes.remove(pos).1)
            }
        }
    }

    /// All attributes in serialization order: plain attributes, then `class`,
    /// then `style`.
    pub fn attributes(&self) -> Vec<(String, String)> {
        let mut out = self.attributes.clone();
        if let Some(class) = self.get_attribute("class") {
            out.push(("class".to_string(), class));
        }
        if let Some(style) = self.get_attribute("style") {
            out.push(("style".to_string(), style));
        }
        out
    }

    pub fn class_list(&self) -> &ClassList {
        &self.class_list
    }

    pub fn class_list_mut(&mut self) -> &mut ClassList {
        &mut self.class_list
    }

    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleDeclaration {
        &mut self.style
    }

    /// Whether the element exposes a property named `name`, either built in,
    /// reflected, an event handler slot, or an expando set earlier.
    ///
    /// `innerText`/`textContent` are answered by the document, which owns the
    /// children.
    pub fn has_property(&self, name: &str) -> bool {
        matches!(
            name,
            "id" | "className" | "style" | "innerText" | "textContent"
        ) || READ_ONLY_PROPERTIES.contains(&name)
            || reflected_attr(name).is_some()
            || boolean_attr(name).is_some()
            || is_event_handler(name)
            || self.expandos.iter().any(|(k, _)| k == name)
    }

    /// Assign a property. Unknown names become expandos.
    pub fn set_property(&mut self, name: &str, value: &PropValue) -> Result<(), DomError> {
        if READ_ONLY_PROPERTIES.contains(&name) {
            return Err(DomError::ReadOnlyProperty(name.to_string()));
        }
        match name {
            "id" => self.set_attribute("id", &value.to_string()),
            "className" => self.class_list.set_value(&value.to_string()),
            "style" => match value {
                PropValue::Style(entries) => {
                    for (k, v) in entries {
                        self.style.set(k, v);
                    }
                }
                other => self.style.set_css_text(&other.to_string()),
            },
            _ => {
                if let Some(attr) = reflected_attr(name) {
                    self.set_attribute(attr, &value.to_string());
                } else if let Some(attr) = boolean_attr(name) {
                    if value.is_truthy() {
                        self.set_attribute(attr, "");
                    } else {
                        self.remove_attribute(attr);
                    }
                } else {
                    match self.expandos.iter_mut().find(|(k, _)| k == name) {
                        Some((_, existing)) => *existing = value.clone(),
                        None => self.expandos.push((name.to_string(), value.clone())),
                    }
                }
            }
        }
        Ok(())
    }

    /// Read a property back. Reflected properties read their attribute.
    pub fn property(&self, name: &str) -> Option<PropValue> {
        match name {
            "id" => return self.id().map(PropValue::from),
            "className" => return Some(PropValue::Str(self.class_list.value())),
            "tagName" => return Some(PropValue::Str(self.tag_name())),
            _ => {}
        }
        if let Some(attr) = reflected_attr(name) {
            return self.plain_attribute(attr).map(PropValue::from);
        }
        if let Some(attr) = boolean_attr(name) {
            return Some(PropValue::Bool(self.plain_attribute(attr).is_some()));
        }
        self.expandos
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}
