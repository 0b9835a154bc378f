//! Decoding patches from their JSON object form.
//!
//! ```text
//! {"text": "hi", "class": "on", "style": {"color": "red"}, "$role": "menu",
//!  "remove": false, "tree": ["ul", ["li|a"]], "title": "tip"}
//! ```

use crate::error::DispatchError;
use crate::patch::{Patch, PatchOp, TreeSource};
use serde_json::Value;
use template::{Initial, prop_from_json};

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Patch {
    /// Decode a patch object. Keys keep their object order.
    ///
    /// A non-object value, a non-object `style` or a malformed `tree` is
    /// [`DispatchError::InvalidStateShape`]. `remove` only acts when `true`.
    /// Other keys carrying `null`, arrays or objects are dropped with a
    /// warning.
    pub fn from_json(value: &Value) -> Result<Patch, DispatchError> {
        let Value::Object(map) = value else {
            return Err(DispatchError::InvalidStateShape(value.to_string()));
        };
        let mut patch = Patch::new();
        for (key, value) in map {
            let op = match key.as_str() {
                "style" => {
                    let Value::Object(entries) = value else {
                        return Err(DispatchError::InvalidStateShape(format!(
                            "style must be an object, found {value}"
                        )));
                    };
                    PatchOp::Style(
                        entries
                            .iter()
                            .map(|(k, v)| (k.clone(), scalar_text(v)))
                            .collect(),
                    )
                }
                "text" => PatchOp::Text(scalar_text(value)),
                "class" if value.is_string() => PatchOp::Class(scalar_text(value)),
                "remove" => match value {
                    Value::Bool(true) => PatchOp::Remove,
                    _ => continue,
                },
                "tree" => {
                    let items = Initial::list_from_json(value)
                        .map_err(|err| DispatchError::InvalidStateShape(err.to_string()))?;
                    PatchOp::Tree(TreeSource::Initials(items))
                }
                _ => {
                    if let Some(data) = key.split('$').nth(1) {
                        PatchOp::Data {
                            name: data.to_string(),
                            value: scalar_text(value),
                        }
                    } else if let Some(prop) = prop_from_json(key, value) {
                        PatchOp::Property {
                            name: key.clone(),
                            value: prop,
                        }
                    } else {
                        log::warn!(
                            target: "cradle::dispatch",
                            "dropping `{key}`: unsupported value {value}"
                        );
                        continue;
                    }
                }
            };
            patch.ops.push(op);
        }
        Ok(patch)
    }
}
