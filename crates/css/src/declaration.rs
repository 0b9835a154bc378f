use crate::properties::canonical_name;
use crate::syntax::parse_declarations;

/// Ordered inline style of a single element.
///
/// Names are kept in canonical kebab-case. Setting an existing property
/// replaces its value in place; setting an empty value removes it, matching
/// how a DOM style declaration treats `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    entries: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from inline `style` attribute text.
    pub fn from_css_text(text: &str) -> Self {
        let mut decl = Self::new();
        decl.set_css_text(text);
        decl
    }

    pub fn set(&mut self, name: &str, value: &str) {
        let name = canonical_name(name);
        let value = value.trim();
        if value.is_empty() {
            self.entries.retain(|(k, _)| *k != name);
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            None => self.entries.push((name, value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = canonical_name(name);
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) {
        self.set(name, "");
    }

    /// Replace every entry with the declarations parsed from `text`.
    pub fn set_css_text(&mut self, text: &str) {
        self.entries.clear();
        for declaration in parse_declarations(text) {
            self.set(&declaration.name, &declaration.value);
        }
    }

    /// Serialize as `name: value;` pairs separated by a space.
    pub fn css_text(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i != 0 {
                out.push(' ');
            }
            out.push_str(k);
            out.push_str(": ");
            out.push_str(v);
            out.push(';');
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
