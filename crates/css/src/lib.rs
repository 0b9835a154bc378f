pub mod declaration;
pub mod properties;
pub mod syntax;

// Re-exports so other crates can just use `css::...` nicely.
pub use declaration::StyleDeclaration;
pub use properties::{canonical_name, is_style_property};
pub use syntax::{Declaration, parse_declarations};
