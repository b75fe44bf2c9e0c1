//! Fixed-width fields
//!
//! A [`Field`] is one named, typed, fixed-length slot within a record's line. On its own a field
//! only knows its identity and type; appending it to a [`crate::schema::Record`] assigns its
//! positional metadata (index, byte offset and `[lower, upper)` bounds) and makes it usable for
//! line slicing. After each decoded line the field holds both the untrimmed slice (`raw_value`)
//! and its whitespace-trimmed view (`value`).

use std::fmt;
use std::sync::Arc;

use crate::schema::basetype::TypedValue;
use crate::schema::element::Element;
use crate::schema::fieldtype::FieldType;
use crate::schema::template;
use crate::Result;

/// One fixed-width slot within a record.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use rbf::schema::{Field, FieldType};
///
/// let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
/// let mut f = Field::new("FIELD1", "This is field #1", ft, 5).unwrap();
/// assert_eq!(f.length(), 5);
/// assert_eq!(f.offset, 0);
///
/// f.set_raw_value(" 45  ");
/// assert_eq!(f.raw_value(), " 45  ");
/// assert_eq!(f.value(), "45");
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    /// Identity triple (name, description, length)
    pub element: Element,
    /// The schema type of this field, shared with its layout
    pub ftype: Arc<FieldType>,
    /// 0-based append order within the owning record
    pub index: usize,
    /// Byte offset within the owning record's line
    pub offset: usize,
    /// Start of the byte range this field occupies
    pub lower_bound: usize,
    /// End (exclusive) of the byte range this field occupies
    pub upper_bound: usize,
    raw_value: String,
    value: String,
}

impl Field {
    /// Create a new field. Positional metadata stays zero until the field is appended
    /// to a record.
    ///
    /// ## Arguments
    /// * 'name'        - Field name; must not be empty
    /// * 'description' - Free-form description
    /// * 'ftype'       - The field's schema type
    /// * 'length'      - Declared byte length
    ///
    /// # Errors
    /// Fails when `name` is empty.
    pub fn new(name: &str, description: &str, ftype: Arc<FieldType>, length: usize) -> Result<Field> {
        Ok(Field {
            element: Element::new(name, description, length)?,
            ftype,
            index: 0,
            offset: 0,
            lower_bound: 0,
            upper_bound: 0,
            raw_value: String::new(),
            value: String::new(),
        })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Field description.
    pub fn description(&self) -> &str {
        &self.element.description
    }

    /// Declared byte length.
    pub fn length(&self) -> usize {
        self.element.length
    }

    /// The untrimmed slice assigned by the last decoded line.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Whitespace-trimmed view of the raw value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Store a raw value and derive its trimmed view.
    pub fn set_raw_value(&mut self, s: &str) {
        self.raw_value = s.to_string();
        self.value = s.trim().to_string();
    }

    /// Convert the trimmed value to its typed form.
    ///
    /// # Errors
    /// Returns [`crate::Error::Conversion`] when the value does not parse as the field's kind.
    pub fn convert(&self) -> Result<TypedValue> {
        self.ftype.convert(&self.value)
    }

    /// Lenient conversion: falls back to the raw string on failure (see
    /// [`FieldType::convert_lossy`]).
    pub fn convert_lossy(&self) -> TypedValue {
        self.ftype.convert_lossy(&self.value)
    }

    /// Reset the field to its type's default value, rendered at the declared width.
    ///
    /// # Errors
    /// Fails when the type's format template is malformed.
    pub fn initialize(&mut self) -> Result<()> {
        self.reset(&self.ftype.zero())
    }

    /// Set the field from a typed value, rendered through the type's width-format template
    /// at the declared length.
    ///
    /// # Errors
    /// Fails when the template is malformed or the value cannot be coerced to it.
    pub fn reset(&mut self, new_value: &TypedValue) -> Result<()> {
        let rendered = template::render(self.ftype.format(), self.length(), new_value)?;
        self.set_raw_value(&rendered);
        Ok(())
    }
}

impl PartialEq for Field {
    /// Two fields are equal iff their identity triples and their field types are equal.
    /// Positional metadata and per-line values do not participate.
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element && self.ftype == other.ftype
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} value=<{}> raw_value=<{}> offset=<{}> index=<{}> bounds=<{}:{}>",
            self.element,
            self.ftype,
            self.value,
            self.raw_value,
            self.offset,
            self.index,
            self.lower_bound,
            self.upper_bound
        )
    }
}
