use dom::DomError;

/// Failures that abort a whole dispatch call. Everything else is logged.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid state object: {0}")]
    InvalidStateShape(String),
    #[error("{0} is not a valid css style property")]
    InvalidStyleProperty(String),
    /// A direct node locator that is no longer in the document.
    #[error(transparent)]
    Dom(#[from] DomError),
}
