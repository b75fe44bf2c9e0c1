//! Common identity shared by fields and records
//!
//! Every named, sized object in a record-based file (a field, a record, the layout itself) starts
//! from the same identity triple: a name, a free-form description and a byte length. [`Element`]
//! holds that triple and enforces initial validity; [`crate::schema::Field`] and
//! [`crate::schema::Record`] embed it by composition.

use std::fmt;

use crate::Result;

/// The atomic identity of a schema object: name, description, byte length.
///
/// # Examples
///
/// ```rust
/// use rbf::schema::Element;
///
/// let e = Element::new("ELEM1", "This is element #1", 5).unwrap();
/// assert_eq!(e.name, "ELEM1");
/// assert_eq!(e.length, 5);
/// assert!(Element::new("", "unnamed", 5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Name of the element (never empty)
    pub name: String,
    /// Free-form description, may be empty
    pub description: String,
    /// Number of bytes the element occupies in a line
    pub length: usize,
}

impl Element {
    /// Create a new element, validating its identity.
    ///
    /// ## Arguments
    /// * 'name'        - Element name; must not be empty
    /// * 'description' - Free-form description; may be empty
    /// * 'length'      - Byte length of the element
    ///
    /// # Errors
    /// Fails when `name` is empty.
    pub fn new(name: &str, description: &str, length: usize) -> Result<Element> {
        if name.is_empty() {
            return Err(malformed_error!("element name is empty"));
        }

        Ok(Element {
            name: name.to_string(),
            description: description.to_string(),
            length,
        })
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name=<{}> description=<{}> length=<{}>",
            self.name, self.description, self.length
        )
    }
}
