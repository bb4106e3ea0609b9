//! Entity-attribute-value engine
//!
//! Slug derivation for categories and fields, and typed handling of the
//! text values stored per product.

pub mod slug;
pub mod value;

pub use slug::slugify;
pub use value::{FieldType, FieldValue};
