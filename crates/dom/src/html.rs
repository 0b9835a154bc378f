use crate::document::{Document, NodeKind};
use crate::error::DomError;
use core_types::NodeKey;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

fn is_void(local_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(local_name))
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

impl Document {
    /// Serialize `key` and its subtree as HTML.
    ///
    /// Documents and fragments serialize their children only. Attributes come
    /// out in [`crate::Element::attributes`] order, so `class` and `style`
    /// trail the plain ones.
    pub fn to_html(&self, key: NodeKey) -> Result<String, DomError> {
        let mut out = String::new();
        self.write_html(key, &mut out)?;
        Ok(out)
    }

    /// Serialize only the children of `key`.
    pub fn inner_html(&self, key: NodeKey) -> Result<String, DomError> {
        let mut out = String::new();
        for &child in self.children(key)? {
            self.write_html(child, &mut out)?;
        }
        Ok(out)
    }

    fn write_html(&self, key: NodeKey, out: &mut String) -> Result<(), DomError> {
        match self.kind(key)? {
            NodeKind::Text(text) => escape_text(out, text),
            NodeKind::Document | NodeKind::Fragment => {
                for &child in self.children(key)? {
                    self.write_html(child, out)?;
                }
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(el.local_name());
                for (name, value) in el.attributes() {
                    out.push(' ');
                    out.push_str(&name);
                    out.push_str("=\"");
                    escape_attr(out, &value);
                    out.push('"');
                }
                out.push('>');
                if is_void(el.local_name()) {
                    return Ok(());
                }
                for &child in self.children(key)? {
                    self.write_html(child, out)?;
                }
                out.push_str("</");
                out.push_str(el.local_name());
                out.push('>');
            }
        }
        Ok(())
    }
}
