//! Declarative node construction and state synchronization over an
//! in-process document.
//!
//! - [`parse`] turns `tag.class#id|text` selectors into [`Descriptor`]s.
//! - [`make`] and [`el!`] build nodes from initializer lists.
//! - [`dispatch`] patches live nodes by key or by `data-cra-id` identifier.
//! - [`Signal`] holds a value with history and persistence and pushes every
//!   change into a bound [`Ref`].

pub mod reference;

pub use dispatch::{DispatchError, Dispatched, Locator, Patch, PatchOp, TreeSource, dispatch};
pub use dom::{
    BuildItem, CRA_ID_ATTR, Document, DomError, Element, NodeKey, NodeType, PropValue,
    PropertyBag, TreeBuilder, TreeBuilderConfig,
};
pub use reference::{Ref, Template};
pub use selector::{Descriptor, parse};
pub use signal::{
    Consumer, FileStorage, MemoryStorage, Signal, SignalError, SignalOptions, Storage, Update,
};
pub use template::{Initial, el, make, make_fragment};
