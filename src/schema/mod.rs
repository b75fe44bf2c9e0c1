//! Schema model for record-based files
//!
//! This module holds the layout engine: the entity model going from the base type registry up to
//! the full file schema, and the offset/bounds computation that maps a schema definition to byte
//! positions in a line.
//!
//! The components build on each other, leaves first:
//!
//! - [`basetype`] - the fixed registry of base kinds and their conversion routines
//! - [`template`] - printf-style width templates for default and reset values
//! - [`element`] - the identity triple (name, description, length) fields and records share
//! - [`fieldtype`] - schema-level nicknames over base kinds, with format metadata
//! - [`field`] - one fixed-width slot, with positional metadata once attached to a record
//! - [`record`] - one line format: ordered fields tiling a fixed total width
//! - [`layout`] - the full schema: records by name plus free-form metadata

pub mod basetype;
pub mod element;
pub mod field;
pub mod fieldtype;
pub mod layout;
pub mod record;
pub mod template;

pub use basetype::{BaseKind, TypeDescriptor, TypedValue};
pub use element::Element;
pub use field::Field;
pub use fieldtype::FieldType;
pub use layout::Layout;
pub use record::{FieldAttr, MapValue, Record};
