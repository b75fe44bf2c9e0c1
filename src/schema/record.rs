//! Records: ordered field collections tiling one line format
//!
//! A [`Record`] defines one line format of a record-based file: an ordered sequence of
//! [`crate::schema::Field`]s packed contiguously with no separators. The record owns the offset
//! bookkeeping: appending a field assigns its index, byte offset and bounds, and grows the
//! record's total length so that the fields always exactly tile `[0, record.len())`.
//!
//! Duplicate field names are legal and meaningful (e.g. a repeated `COUNTRY` column), so lookup
//! by name always yields *all* fields bearing the name, in insertion order. Scalar access over a
//! name goes through [`Record::scalar`], which refuses ambiguous names.
//!
//! Structural mutation (`keep`/`delete`) automatically rebuilds offsets, so a reduced record
//! remains valid for [`Record::set_line`] / [`Record::line`] round-trips.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use strum::EnumString;

use crate::schema::basetype::TypedValue;
use crate::schema::element::Element;
use crate::schema::field::Field;
use crate::Result;

/// A field attribute that [`Record::project`] can extract across all fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FieldAttr {
    /// Field name
    Name,
    /// Field description
    Description,
    /// Declared byte length
    Length,
    /// Trimmed value
    Value,
    /// Untrimmed value
    RawValue,
    /// Byte offset within the record
    Offset,
    /// Append order
    Index,
    /// Field type nickname
    Type,
}

/// A value in the mapping built by [`Record::as_map`].
///
/// A field name seen exactly once stays a scalar; seen twice or more it becomes an ordered list
/// of its non-empty occurrences.
#[derive(Debug, Clone, PartialEq)]
pub enum MapValue {
    /// The name occurred once
    Scalar(TypedValue),
    /// The name occurred several times, values in insertion order
    List(Vec<TypedValue>),
}

impl MapValue {
    fn push(&mut self, value: TypedValue) {
        match self {
            MapValue::Scalar(first) => {
                let first = std::mem::replace(first, TypedValue::Str(String::new()));
                *self = MapValue::List(vec![first, value]);
            }
            MapValue::List(items) => items.push(value),
        }
    }
}

/// One line format: an ordered, contiguously packed sequence of fields.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use rbf::schema::{Field, FieldType, Record};
///
/// let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
/// let mut rec = Record::new("RECORD1", "Description for record #1").unwrap();
/// rec.push(Field::new("FIELD1", "", ft.clone(), 10).unwrap());
/// rec.push(Field::new("FIELD2", "", ft.clone(), 5).unwrap());
/// rec.push(Field::new("FIELD2", "", ft.clone(), 5).unwrap());
/// rec.push(Field::new("FIELD3", "", ft.clone(), 10).unwrap());
///
/// assert_eq!(rec.count(), 4);
/// assert_eq!(rec.len(), 30);
/// assert_eq!(rec.get_named("FIELD2").unwrap().len(), 2);
///
/// rec.set_line(&("A".repeat(10) + &"B".repeat(5) + &"C".repeat(5) + &"D".repeat(10))).unwrap();
/// assert_eq!(rec.scalar("FIELD1").unwrap(), "A".repeat(10));
/// ```
#[derive(Debug, Clone)]
pub struct Record {
    /// Identity triple; `length` is the sum of all field lengths
    pub element: Element,
    fields: Vec<Field>,
    by_name: HashMap<String, Vec<usize>>,
}

impl Record {
    /// Create a new, empty record.
    ///
    /// # Errors
    /// Fails when `name` is empty.
    pub fn new(name: &str, description: &str) -> Result<Record> {
        Ok(Record {
            element: Element::new(name, description, 0)?,
            fields: Vec::new(),
            by_name: HashMap::new(),
        })
    }

    /// Record name.
    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Record description.
    pub fn description(&self) -> &str {
        &self.element.description
    }

    /// Total byte length of one line of this record.
    pub fn len(&self) -> usize {
        self.element.length
    }

    /// True when the record holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields.
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    /// Append a field, assigning its index, offset and bounds.
    ///
    /// The field's offset is the record length before growth; insertion order is preserved for
    /// fields sharing a name.
    pub fn push(&mut self, mut field: Field) {
        field.index = self.fields.len();
        field.offset = self.element.length;
        field.lower_bound = field.offset;
        field.upper_bound = field.offset + field.length();

        self.element.length += field.length();

        self.by_name
            .entry(field.name().to_string())
            .or_default()
            .push(field.index);
        self.fields.push(field);
    }

    /// Access a field by position.
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Mutable access to a field by position.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.get_mut(index)
    }

    /// All fields, in index order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Iterate over fields in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// True when at least one field bears the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All fields bearing the given name, in insertion order.
    ///
    /// # Errors
    /// Returns [`crate::Error::KeyNotFound`] when no field bears the name.
    pub fn get_named(&self, name: &str) -> Result<Vec<&Field>> {
        match self.by_name.get(name) {
            Some(indices) => Ok(indices.iter().map(|&i| &self.fields[i]).collect()),
            None => Err(self.key_not_found(name)),
        }
    }

    /// The trimmed value of the single field bearing the given name.
    ///
    /// # Errors
    /// - [`crate::Error::KeyNotFound`] when no field bears the name
    /// - [`crate::Error::AmbiguousName`] when several fields share it
    pub fn scalar(&self, name: &str) -> Result<&str> {
        match self.by_name.get(name) {
            Some(indices) if indices.len() == 1 => Ok(self.fields[indices[0]].value()),
            Some(_) => Err(crate::Error::AmbiguousName(name.to_string())),
            None => Err(self.key_not_found(name)),
        }
    }

    /// Decode one line into all fields.
    ///
    /// The line is normalized first: truncated to the record length when longer, right-padded
    /// with spaces when shorter. Each field is then sliced from the normalized line by its byte
    /// bounds, independently of the others.
    ///
    /// # Errors
    /// Fails when a field bound would split a multi-byte UTF-8 sequence.
    pub fn set_line(&mut self, line: &str) -> Result<()> {
        let mut normalized;
        let line = if line.len() > self.element.length {
            match line.get(..self.element.length) {
                Some(cut) => cut,
                None => {
                    return Err(malformed_error!(
                        "record {}: line truncation at byte {} splits a UTF-8 sequence",
                        self.element.name,
                        self.element.length
                    ))
                }
            }
        } else if line.len() < self.element.length {
            normalized = line.to_string();
            normalized.push_str(&" ".repeat(self.element.length - line.len()));
            &normalized
        } else {
            line
        };

        for i in 0..self.fields.len() {
            let (lower, upper) = (self.fields[i].lower_bound, self.fields[i].upper_bound);
            let slice = match line.get(lower..upper) {
                Some(s) => s,
                None => {
                    return Err(malformed_error!(
                        "record {}: field bounds {}:{} split a UTF-8 sequence",
                        self.element.name,
                        lower,
                        upper
                    ))
                }
            };
            self.fields[i].set_raw_value(slice);
        }

        Ok(())
    }

    /// Encode the record back into one line: the concatenation of every field's raw value in
    /// index order. Exact inverse of [`Record::set_line`] against the normalized line.
    pub fn line(&self) -> String {
        let mut out = String::with_capacity(self.element.length);
        for field in &self.fields {
            out.push_str(field.raw_value());
        }
        out
    }

    /// Build a name-to-value mapping across all fields.
    ///
    /// Fields whose trimmed value is empty are skipped. A name seen once maps to a scalar; the
    /// second occurrence promotes the entry to a list and later occurrences append to it.
    ///
    /// ## Arguments
    /// * 'convert' - When true, values are typed via the lenient conversion path;
    ///   otherwise they stay [`TypedValue::Str`]
    pub fn as_map(&self, convert: bool) -> HashMap<String, MapValue> {
        let mut map: HashMap<String, MapValue> = HashMap::new();

        for field in &self.fields {
            if field.value().is_empty() {
                continue;
            }

            let value = if convert {
                field.convert_lossy()
            } else {
                TypedValue::Str(field.value().to_string())
            };

            match map.get_mut(field.name()) {
                Some(entry) => entry.push(value),
                None => {
                    map.insert(field.name().to_string(), MapValue::Scalar(value));
                }
            }
        }

        map
    }

    /// Delete every field whose name appears in `names`. Unknown names are ignored.
    ///
    /// Offsets, indices, bounds and the record length are rebuilt afterwards, so the record
    /// stays usable for [`Record::set_line`] / [`Record::line`].
    pub fn delete(&mut self, names: &[&str]) {
        self.fields.retain(|f| !names.contains(&f.name()));
        self.rebuild_offsets();
    }

    /// Keep only the fields whose name appears in `names`; delete the rest.
    ///
    /// Offsets are rebuilt as for [`Record::delete`].
    pub fn keep(&mut self, names: &[&str]) {
        self.fields.retain(|f| names.contains(&f.name()));
        self.rebuild_offsets();
    }

    /// Recompute index, offset, bounds, total length and the name index from the current
    /// field sequence.
    pub fn rebuild_offsets(&mut self) {
        self.by_name.clear();
        self.element.length = 0;

        for (index, field) in self.fields.iter_mut().enumerate() {
            field.index = index;
            field.offset = self.element.length;
            field.lower_bound = field.offset;
            field.upper_bound = field.offset + field.length();
            self.element.length += field.length();

            self.by_name
                .entry(field.name().to_string())
                .or_default()
                .push(index);
        }
    }

    /// Project one field attribute across all fields, in index order.
    pub fn project(&self, attr: FieldAttr) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| match attr {
                FieldAttr::Name => f.name().to_string(),
                FieldAttr::Description => f.description().to_string(),
                FieldAttr::Length => f.length().to_string(),
                FieldAttr::Value => f.value().to_string(),
                FieldAttr::RawValue => f.raw_value().to_string(),
                FieldAttr::Offset => f.offset.to_string(),
                FieldAttr::Index => f.index.to_string(),
                FieldAttr::Type => f.ftype.name.clone(),
            })
            .collect()
    }

    /// [`Record::project`] with the attribute given by name.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownAttribute`] when `attr` names no field attribute.
    pub fn project_named(&self, attr: &str) -> Result<Vec<String>> {
        let attr = FieldAttr::from_str(attr)
            .map_err(|_| crate::Error::UnknownAttribute(attr.to_string()))?;
        Ok(self.project(attr))
    }

    fn key_not_found(&self, key: &str) -> crate::Error {
        crate::Error::KeyNotFound {
            key: key.to_string(),
            container: self.element.name.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.element)?;
        for field in &self.fields {
            writeln!(f, "\t{field}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fieldtype::FieldType;
    use std::sync::Arc;

    fn sample() -> Record {
        let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
        let mut rec = Record::new("RECORD1", "Description of record 1").unwrap();
        rec.push(Field::new("FIELD1", "Description of field 1", ft.clone(), 10).unwrap());
        rec.push(Field::new("FIELD2", "Description of field 2", ft.clone(), 5).unwrap());
        rec.push(Field::new("FIELD2", "Description of field 2", ft.clone(), 5).unwrap());
        rec.push(Field::new("FIELD3", "Description of field 3", ft, 10).unwrap());
        rec
    }

    fn sample_line() -> String {
        "A".repeat(10) + &"B".repeat(5) + &"C".repeat(5) + &"D".repeat(10)
    }

    #[test]
    fn empty_name_rejected() {
        assert!(Record::new("", "Description of record 1").is_err());
    }

    #[test]
    fn identity_and_length() {
        let rec = sample();
        assert_eq!(rec.name(), "RECORD1");
        assert_eq!(rec.description(), "Description of record 1");
        assert_eq!(rec.len(), 30);
        assert_eq!(rec.count(), 4);
    }

    #[test]
    fn offsets_and_indices() {
        let rec = sample();
        let names = ["FIELD1", "FIELD2", "FIELD2", "FIELD3"];
        let offsets = [0, 10, 15, 20];

        for (i, f) in rec.iter().enumerate() {
            assert_eq!(f.name(), names[i]);
            assert_eq!(f.index, i);
            assert_eq!(f.offset, offsets[i]);
            assert_eq!(f.upper_bound - f.lower_bound, f.length());
        }
    }

    #[test]
    fn name_lookup() {
        let rec = sample();
        assert_eq!(rec.get_named("FIELD1").unwrap().len(), 1);
        assert_eq!(rec.get_named("FIELD2").unwrap().len(), 2);
        assert!(matches!(
            rec.get_named("FOO"),
            Err(crate::Error::KeyNotFound { .. })
        ));
        assert!(rec.contains("FIELD1"));
        assert!(!rec.contains("FOO"));
    }

    #[test]
    fn scalar_access() {
        let mut rec = sample();
        rec.set_line(&sample_line()).unwrap();

        assert_eq!(rec.scalar("FIELD1").unwrap(), "A".repeat(10));
        assert_eq!(rec.scalar("FIELD3").unwrap(), "D".repeat(10));
        assert!(matches!(
            rec.scalar("FIELD2"),
            Err(crate::Error::AmbiguousName(_))
        ));
        assert!(matches!(
            rec.scalar("FOO"),
            Err(crate::Error::KeyNotFound { .. })
        ));
    }

    #[test]
    fn line_round_trip() {
        let mut rec = sample();
        let line = sample_line();
        rec.set_line(&line).unwrap();
        assert_eq!(rec.line(), line);
        assert_eq!(rec.get(2).unwrap().value(), "C".repeat(5));
    }

    #[test]
    fn short_line_pads() {
        let mut rec = sample();
        rec.set_line("A".repeat(10).as_str()).unwrap();
        assert_eq!(rec.line().len(), 30);
        assert_eq!(rec.scalar("FIELD1").unwrap(), "A".repeat(10));
        assert_eq!(rec.scalar("FIELD3").unwrap(), "");
    }

    #[test]
    fn long_line_truncates() {
        let mut rec = sample();
        let line = sample_line() + "EXTRA";
        rec.set_line(&line).unwrap();
        assert_eq!(rec.line(), sample_line());
    }

    #[test]
    fn multibyte_line_slices_by_byte_bounds() {
        let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
        let mut rec = Record::new("R", "").unwrap();
        rec.push(Field::new("A", "", ft.clone(), 2).unwrap());
        rec.push(Field::new("B", "", ft.clone(), 2).unwrap());

        // 'é' is 2 bytes, so both field bounds land on character boundaries
        rec.set_line("éé").unwrap();
        assert_eq!(rec.scalar("A").unwrap(), "é");
        assert_eq!(rec.scalar("B").unwrap(), "é");

        // a bound inside a character is an error, not a slice
        let mut rec = Record::new("R", "").unwrap();
        rec.push(Field::new("A", "", ft.clone(), 1).unwrap());
        rec.push(Field::new("B", "", ft, 3).unwrap());
        assert!(matches!(
            rec.set_line("éab"),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn projection() {
        let mut rec = sample();
        rec.set_line(&sample_line()).unwrap();

        assert_eq!(
            rec.project_named("name").unwrap(),
            ["FIELD1", "FIELD2", "FIELD2", "FIELD3"]
        );
        assert_eq!(
            rec.project(FieldAttr::Value),
            [
                "A".repeat(10),
                "B".repeat(5),
                "C".repeat(5),
                "D".repeat(10)
            ]
        );
        assert!(matches!(
            rec.project_named("frobnicate"),
            Err(crate::Error::UnknownAttribute(_))
        ));
    }

    #[test]
    fn map_promotes_duplicates_and_skips_empties() {
        let ft = Arc::new(FieldType::new("A/N", "string").unwrap());
        let mut rec = Record::new("R", "").unwrap();
        rec.push(Field::new("A", "", ft.clone(), 1).unwrap());
        rec.push(Field::new("B", "", ft.clone(), 1).unwrap());
        rec.push(Field::new("A", "", ft, 1).unwrap());

        rec.set_line("X Y").unwrap();
        let map = rec.as_map(false);

        assert_eq!(map.len(), 1);
        assert_eq!(
            map["A"],
            MapValue::List(vec![
                TypedValue::Str("X".to_string()),
                TypedValue::Str("Y".to_string())
            ])
        );
        assert!(!map.contains_key("B"));
    }

    #[test]
    fn map_scalar_for_unique_names() {
        let mut rec = sample();
        rec.set_line(&sample_line()).unwrap();
        let map = rec.as_map(false);

        assert_eq!(
            map["FIELD1"],
            MapValue::Scalar(TypedValue::Str("A".repeat(10)))
        );
        assert_eq!(
            map["FIELD2"],
            MapValue::List(vec![
                TypedValue::Str("B".repeat(5)),
                TypedValue::Str("C".repeat(5))
            ])
        );
    }

    #[test]
    fn delete_rebuilds_offsets() {
        let mut rec = sample();
        rec.delete(&["FIELD2", "FIELD1"]);

        assert!(!rec.contains("FIELD1"));
        assert!(!rec.contains("FIELD2"));
        assert!(rec.contains("FIELD3"));
        assert_eq!(rec.len(), 10);

        let f = rec.get(0).unwrap();
        assert_eq!(f.index, 0);
        assert_eq!(f.offset, 0);
        assert_eq!(f.upper_bound, 10);

        // still usable for decoding after the structural mutation
        rec.set_line(&"Z".repeat(10)).unwrap();
        assert_eq!(rec.scalar("FIELD3").unwrap(), "Z".repeat(10));
    }

    #[test]
    fn keep_rebuilds_offsets() {
        let mut rec = sample();
        rec.keep(&["FIELD2"]);

        assert!(!rec.contains("FIELD1"));
        assert!(rec.contains("FIELD2"));
        assert!(!rec.contains("FIELD3"));
        assert_eq!(rec.len(), 10);
        assert_eq!(rec.get(1).unwrap().offset, 5);

        rec.set_line("BBBBBCCCCC").unwrap();
        assert_eq!(rec.line(), "BBBBBCCCCC");
    }
}
