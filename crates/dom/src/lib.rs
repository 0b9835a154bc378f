//! In-process live document.
//!
//! Nodes live in an arena [`Document`] and are addressed by
//! [`core_types::NodeKey`]. Elements carry plain attributes, a class set, an
//! inline style declaration and expando properties. The document keeps a
//! registry from `data-cra-id` values to elements so identifier lookups never
//! scan the tree.

pub mod builder;
pub mod document;
pub mod element;
pub mod error;
pub mod html;
pub mod props;
#[cfg(any(test, feature = "snapshot"))]
pub mod snapshot;

pub use builder::{BuildItem, TreeBuilder, TreeBuilderConfig, apply_style};
pub use core_types::{CRA_ID_ATTR, NodeKey, NodeType, STATE_ID_PROP};
pub use document::{Document, NodeKind, Removal};
pub use element::{ClassList, Element};
pub use error::DomError;
pub use props::{PropValue, PropertyBag};
