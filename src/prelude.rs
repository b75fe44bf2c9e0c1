//! # rbf Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the rbf library. Import this module to get quick access to the essential types for
//! loading layouts and decoding record-based files.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all rbf operations
pub use crate::Error;

/// The result type used throughout rbf
pub use crate::Result;

// ================================================================================================
// Schema Model
// ================================================================================================

/// The full schema of a record-based file
pub use crate::schema::Layout;

/// One line format: an ordered set of fields tiling a fixed total width
pub use crate::schema::Record;

/// One named, typed, fixed-width slot within a record
pub use crate::schema::Field;

/// Schema-level named alias over one base kind
pub use crate::schema::FieldType;

/// The fixed registry of base kinds and converted scalar values
pub use crate::schema::{BaseKind, TypedValue};

/// Projection and mapping helpers over records
pub use crate::schema::{FieldAttr, MapValue};

// ================================================================================================
// Reading and Writing
// ================================================================================================

/// Streaming reader over one record-based file
pub use crate::reader::Reader;

/// Output adapters over decoded records
pub use crate::writer::{DelimitedWriter, HtmlWriter, RecordWriter, TextWriter};
