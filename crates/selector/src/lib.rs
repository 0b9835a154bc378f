//! Compact selector grammar.
//!
//! A selector string encodes a tag name, an id, a class list and an optional
//! inline text:
//!
//! ```text
//! p.lead#intro        -> <p id="intro" class="lead">
//! .card.wide          -> <DIV class="card wide">
//! h1|Hello            -> <h1>Hello</h1>
//! |Hello              -> <P>Hello</P>
//! ```
//!
//! Parsing never fails. Malformed input degrades to a best-effort
//! [`Descriptor`].

use memchr::memchr;

/// Tag used when a selector names no tag.
pub const DEFAULT_TAG: &str = "DIV";

/// Tag used for bare `|text` selectors.
pub const TEXT_TAG: &str = "P";

/// Structural result of parsing a selector string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// Verbatim tag name; never empty for a parsed selector.
    pub tag: String,
    pub id: Option<String>,
    /// Space-joined class list.
    pub class_names: Option<String>,
    pub inline_text: Option<String>,
}

impl Descriptor {
    /// Descriptor of something that is not a selector at all. It carries no tag,
    /// so callers build a document fragment from it.
    pub fn fragment() -> Self {
        Self::default()
    }

    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }

    /// Class names as individual tokens.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_names
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
    }
}

/// Parse a selector string.
///
/// The first separator found decides the branch: `|` splits off inline text,
/// then a selector without `#` is `tag.class.class`, one without `.` is
/// `tag#id`, and anything else is scanned segment by segment.
pub fn parse(selector: &str) -> Descriptor {
    let bytes = selector.as_bytes();
    let (head, inline_text) = match memchr(b'|', bytes) {
        Some(pos) => {
            let head = &selector[..pos];
            let tail = non_empty(&selector[pos + 1..]);
            if head.is_empty() {
                return Descriptor {
                    tag: TEXT_TAG.to_string(),
                    id: None,
                    class_names: None,
                    inline_text: tail,
                };
            }
            (head, tail)
        }
        None => (selector, None),
    };

    let head_bytes = head.as_bytes();
    let mut descriptor = if memchr(b'#', head_bytes).is_none() {
        parse_tag_and_classes(head)
    } else if memchr(b'.', head_bytes).is_none() {
        parse_tag_and_id(head)
    } else {
        parse_mixed(head)
    };
    descriptor.inline_text = inline_text;
    descriptor
}

// "tag.a.b"
fn parse_tag_and_classes(head: &str) -> Descriptor {
    let mut segments = head.split('.');
    let tag = tag_or_default(segments.next().unwrap_or(""));
    Descriptor {
        tag,
        id: None,
        class_names: join_classes(segments),
        inline_text: None,
    }
}

// "tag#id"
fn parse_tag_and_id(head: &str) -> Descriptor {
    let mut segments = head.split('#');
    let tag = tag_or_default(segments.next().unwrap_or(""));
    let id_segment = segments.next().unwrap_or("");
    // "tag#id trailing" keeps only the token after the first space.
    let id = if id_segment.contains(' ') {
        id_segment.split(' ').nth(1).unwrap_or("")
    } else {
        id_segment
    };
    Descriptor {
        tag,
        id: non_empty(id),
        class_names: None,
        inline_text: None,
    }
}

// "tag.a#id.b", "tag#id.a", ...
fn parse_mixed(head: &str) -> Descriptor {
    let mut tag = "";
    let mut id: Option<&str> = None;
    let mut classes: Vec<&str> = Vec::new();

    for (i, segment) in head.split('.').enumerate() {
        let mut parts = segment.split('#');
        let name = parts.next().unwrap_or("");
        match parts.next() {
            Some(segment_id) => {
                // Only the first id survives; later ones are dropped.
                if id.is_none() {
                    id = Some(segment_id);
                }
                if i == 0 {
                    tag = name;
                } else {
                    classes.push(name);
                }
            }
            None if i == 0 => tag = name,
            None => classes.push(segment),
        }
    }

    Descriptor {
        tag: tag_or_default(tag),
        id: id.and_then(non_empty),
        class_names: join_classes(classes.into_iter()),
        inline_text: None,
    }
}

fn tag_or_default(tag: &str) -> String {
    if tag.is_empty() {
        DEFAULT_TAG.to_string()
    } else {
        tag.to_string()
    }
}

fn join_classes<'a>(segments: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut out = String::new();
    for class in segments.filter(|c| !c.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(class);
    }
    non_empty(&out)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
