//! JSON form of initializer lists.
//!
//! ```text
//! ["p.lead", {"title": "x", "style": {"color": "red"}}, "text", ["span", "nested"]]
//! ```
//!
//! A leading string is the selector, every other string is text, objects
//! are property bags and arrays nest. `null` items are skipped.

use crate::Initial;
use dom::{PropValue, PropertyBag};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[error("invalid initializer: {0}")]
pub struct ShapeError(pub String);

/// Convert a scalar (or a `style` object) to a property value.
///
/// Returns `None` for `null`, arrays and objects not under `style`.
pub fn prop_from_json(key: &str, value: &Value) -> Option<PropValue> {
    match value {
        Value::String(s) => Some(PropValue::Str(s.clone())),
        Value::Bool(b) => Some(PropValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(PropValue::Num),
        Value::Object(map) if key == "style" => Some(PropValue::Style(
            map.iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), v)
                })
                .collect(),
        )),
        _ => None,
    }
}

fn bag_from_json(map: &serde_json::Map<String, Value>) -> Result<PropertyBag, ShapeError> {
    let mut bag = PropertyBag::new();
    for (key, value) in map {
        match prop_from_json(key, value) {
            Some(prop) => bag.insert(key, prop),
            None if value.is_null() => {}
            None => {
                return Err(ShapeError(format!(
                    "property `{key}` must be a string, number, boolean or style object"
                )));
            }
        }
    }
    Ok(bag)
}

impl Initial {
    /// Decode a JSON initializer list. A bare string is a one-item list.
    pub fn list_from_json(value: &Value) -> Result<Vec<Initial>, ShapeError> {
        match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::Null => {}
                        Value::String(s) if i == 0 => out.push(Initial::Selector(s.clone())),
                        Value::String(s) => out.push(Initial::Text(s.clone())),
                        Value::Number(_) | Value::Bool(_) => {
                            out.push(Initial::Text(item.to_string()))
                        }
                        Value::Object(map) => out.push(Initial::Props(bag_from_json(map)?)),
                        Value::Array(_) => out.push(Initial::Nested(Self::list_from_json(item)?)),
                    }
                }
                Ok(out)
            }
            Value::String(s) => Ok(vec![Initial::Selector(s.clone())]),
            other => Err(ShapeError(format!("expected an array, found {other}"))),
        }
    }
}
