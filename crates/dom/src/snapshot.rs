use crate::document::{Document, NodeKind};
use core_types::NodeKey;
use std::fmt::{self, Write};

/// Deterministic tree dump for tests. Not a stable format.
///
/// One line per node, two spaces of indent per depth level:
/// - `#document`, `#fragment`
/// - `<tag attr="v" ...>` with attributes in serialization order
/// - `"text"` with quotes and backslashes escaped
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotOptions {
    /// Append ` @<key>` to each line.
    pub show_keys: bool,
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    /// Snapshot the subtree under `key`. A missing key yields `#missing`.
    pub fn new(doc: &Document, key: NodeKey, options: SnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk(doc, key, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Panic with the first differing line when the snapshot of `key` differs
/// from `expected` (one node per line, indentation significant).
#[track_caller]
pub fn assert_snapshot(doc: &Document, key: NodeKey, expected: &str) {
    let actual = DomSnapshot::new(doc, key, SnapshotOptions::default());
    let expected: Vec<&str> = expected.lines().filter(|l| !l.trim().is_empty()).collect();
    let actual_lines = actual.as_lines();
    let max = expected.len().max(actual_lines.len());
    for i in 0..max {
        let exp = expected.get(i).copied();
        let act = actual_lines.get(i).map(String::as_str);
        if exp != act {
            panic!(
                "snapshot mismatch at line {}\nexpected: {}\nactual:   {}\nfull snapshot:\n{}",
                i + 1,
                exp.unwrap_or("<none>"),
                act.unwrap_or("<none>"),
                actual
            );
        }
    }
}

fn walk(doc: &Document, key: NodeKey, options: &SnapshotOptions, depth: usize, out: &mut Vec<String>) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(depth * INDENT_STEP);
    let Ok(kind) = doc.kind(key) else {
        line.push_str("#missing");
        out.push(line);
        return;
    };
    match kind {
        NodeKind::Document => line.push_str("#document"),
        NodeKind::Fragment => line.push_str("#fragment"),
        NodeKind::Text(text) => {
            line.push('"');
            write_escaped(&mut line, text);
            line.push('"');
        }
        NodeKind::Element(el) => {
            line.push('<');
            line.push_str(el.local_name());
            for (name, value) in el.attributes() {
                line.push(' ');
                line.push_str(&name);
                line.push_str("=\"");
                write_escaped(&mut line, &value);
                line.push('"');
            }
            line.push('>');
        }
    }
    if options.show_keys {
        let _ = write!(line, " @{}", key.0);
    }
    out.push(line);
    if let Ok(children) = doc.children(key) {
        for &child in children {
            walk(doc, child, options, depth + 1, out);
        }
    }
}

fn write_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
}
