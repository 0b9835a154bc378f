//! Reactive value store with history, durable persistence and named actions.
//!
//! A [`Signal`] forwards every change to at most one bound [`Consumer`] as
//! JSON, optionally scoped to one key of the value.

pub mod consumer;
pub mod error;
pub mod history;
mod signal;
pub mod storage;

pub use consumer::Consumer;
pub use error::SignalError;
pub use history::History;
pub use signal::{Action, Signal, SignalOptions, Update};
pub use storage::{FileStorage, MemoryStorage, Storage, local};
