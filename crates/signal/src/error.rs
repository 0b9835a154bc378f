use std::error::Error;

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("can't set key {key}: store value is not an object")]
    StoreTypeMismatch { key: String },
    #[error("can't create action {0:?}")]
    ActionRegistration(String),
    #[error("action {0} does not exist")]
    ActionNotFound(String),
    #[error("invalid consumer binding: {0}")]
    InvalidConsumerBinding(String),
    /// The bound consumer rejected an update.
    #[error("consumer update failed: {0}")]
    Consumer(Box<dyn Error>),
    /// Raised by action handlers for their own failures.
    #[error("{0}")]
    Handler(String),
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
}
