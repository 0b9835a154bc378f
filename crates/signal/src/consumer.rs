use serde_json::Value;
use std::error::Error;

/// Something a store pushes its value into.
///
/// Values cross this boundary as JSON so consumers need not know the store's
/// type. Methods take `&self`; implementors keep their state behind interior
/// mutability.
pub trait Consumer {
    /// Whether [`Consumer::update_state`] can be called at all. A store
    /// refuses to bind a consumer that answers `false`.
    fn has_update_entry(&self) -> bool {
        true
    }

    /// Pre-bind the value the next render starts from.
    fn bind_render(&self, initial: Value);

    /// Receive a new (possibly path-scoped) value.
    fn update_state(&self, value: &Value) -> Result<(), Box<dyn Error>>;
}
