use std::fmt;

/// Value carried by a property bag entry or a generic property patch.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Str(String),
    Bool(bool),
    Num(f64),
    /// Nested style mapping, only meaningful under the `style` key.
    Style(Vec<(String, String)>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness used for boolean attributes.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Str(s) => !s.is_empty(),
            PropValue::Bool(b) => *b,
            PropValue::Num(n) => *n != 0.0 && !n.is_nan(),
            PropValue::Style(entries) => !entries.is_empty(),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => f.write_str(s),
            PropValue::Bool(b) => write!(f, "{b}"),
            // Integral numbers print without a fraction, like `String(1)` in a page.
            PropValue::Num(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            PropValue::Num(n) => write!(f, "{n}"),
            PropValue::Style(entries) => {
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}: {v};")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Num(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Num(value as f64)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Num(value as f64)
    }
}

/// Ordered `key -> value` mapping handed to the tree builder.
///
/// Re-inserting a key replaces its value without moving it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, PropValue)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable insert.
    pub fn with(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Chainable `style` entry; merges into an existing `style` mapping.
    pub fn with_style(mut self, name: &str, value: &str) -> Self {
        match self.entries.iter_mut().find(|(k, _)| k == "style") {
            Some((_, PropValue::Style(entries))) => {
                entries.push((name.to_string(), value.to_string()));
            }
            Some((_, other)) => {
                *other = PropValue::Style(vec![(name.to_string(), value.to_string())]);
            }
            None => self.entries.push((
                "style".to_string(),
                PropValue::Style(vec![(name.to_string(), value.to_string())]),
            )),
        }
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<PropValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Merge `caller` over `self`: keys present in `caller` win, keys only in
    /// `self` are kept. Caller order comes first.
    pub fn merged_under(self, caller: PropertyBag) -> PropertyBag {
        let mut out = caller;
        for (k, v) in self.entries {
            if !out.contains_key(&k) {
                out.entries.push((k, v));
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for PropertyBag {
    type Item = (String, PropValue);
    type IntoIter = std::vec::IntoIter<(String, PropValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
