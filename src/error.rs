use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure modes that can occur while loading a layout schema, decoding
/// fixed-width lines into records, converting field values to typed scalars, and writing records
/// out. Each variant provides specific context about the failure to enable appropriate handling.
///
/// # Error Categories
///
/// ## Schema Errors
/// - [`Error::SchemaNotFound`] - The layout description file does not exist
/// - [`Error::UnknownFieldType`] - A record references a field type the schema never declared
/// - [`Error::InvalidType`] - A field type names a base kind outside the registry
/// - [`Error::Malformed`] - Structurally invalid schema document or record definition
///
/// ## Lookup Errors
/// - [`Error::KeyNotFound`] - Unknown record or field name
/// - [`Error::AmbiguousName`] - Single-value access over a name shared by several fields
/// - [`Error::UnknownAttribute`] - Projection over a field attribute that does not exist
///
/// ## Data Errors
/// - [`Error::Conversion`] - A raw field value could not be converted to its typed form
/// - [`Error::DataFileNotFound`] - The record-based data file does not exist
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::XmlError`] - Parse errors from the quick-xml layer
///
/// # Examples
///
/// ```rust,no_run
/// use rbf::{Error, schema::Layout};
///
/// match Layout::from_file("world_data.xml") {
///     Ok(layout) => println!("{} records", layout.len()),
///     Err(Error::SchemaNotFound(path)) => eprintln!("no such schema: {}", path),
///     Err(Error::UnknownFieldType { record, field, ftype }) => {
///         eprintln!("record {} field {} uses undeclared type {}", record, field, ftype);
///     }
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The layout description file could not be found.
    ///
    /// Raised before any parsing starts, when the path handed to
    /// [`crate::schema::Layout::from_file`] does not point at a readable file.
    #[error("Layout schema file not found - {0}")]
    SchemaNotFound(String),

    /// The record-based data file could not be found.
    ///
    /// Raised by [`crate::reader::Reader::new`] when the data file path does not
    /// point at a readable file.
    #[error("Data file not found - {0}")]
    DataFileNotFound(String),

    /// A base kind name is not part of the type registry.
    ///
    /// The registry holds a fixed set of kinds (`string`, `integer`, `decimal`,
    /// `date`, `time`); constructing a field type over any other name fails.
    #[error("'{0}' is not a valid base kind")]
    InvalidType(String),

    /// A record definition references a field type that was never declared.
    ///
    /// Field declarations refer to field types by nickname; the schema must
    /// declare the nickname before any record can use it.
    #[error("record '{record}', field '{field}': unknown field type '{ftype}'")]
    UnknownFieldType {
        /// Name of the record whose field triggered the failure
        record: String,
        /// Name of the offending field
        field: String,
        /// The undeclared field type nickname
        ftype: String,
    },

    /// A record or field name lookup failed.
    ///
    /// Holds the missing key and the name of the container (record or layout)
    /// in which it was searched.
    #[error("key '{key}' not found in '{container}'")]
    KeyNotFound {
        /// The name that was looked up
        key: String,
        /// The record or layout searched
        container: String,
    },

    /// Single-value access hit a name shared by more than one field.
    ///
    /// Duplicate field names are legal inside a record; scalar access over such
    /// a name is ambiguous and must go through the multi-field lookup instead.
    #[error("field name '{0}' is ambiguous, several fields share it")]
    AmbiguousName(String),

    /// Projection was requested over a field attribute that does not exist.
    ///
    /// See [`crate::schema::FieldAttr`] for the attribute names a projection
    /// can target.
    #[error("Field has no attribute named '{0}'")]
    UnknownAttribute(String),

    /// A raw value could not be converted to its typed form.
    ///
    /// Carries the offending value and the base kind the conversion targeted.
    /// Lenient callers can fall back to the raw string via
    /// [`crate::schema::FieldType::convert_lossy`].
    #[error("unable to convert value '{value}' to kind {kind}")]
    Conversion {
        /// The raw value that failed to convert
        value: String,
        /// Name of the base kind the conversion targeted
        kind: String,
    },

    /// The schema document or record structure is damaged.
    ///
    /// The error includes the source location where the malformation was
    /// detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur during file operations
    /// such as reading from disk, permission issues, or filesystem errors.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the quick-xml crate while parsing the schema document.
    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),
}

/// Specialized [`crate::Result`] type for this crate, using the common [`crate::Error`]
pub type Result<T> = std::result::Result<T, Error>;
