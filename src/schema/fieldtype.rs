//! Schema-level field types
//!
//! A schema does not reference base kinds directly; it declares nicknames over them
//! (`<fieldtype name="A/N" type="string"/>`) and may attach extra formatting metadata: strftime
//! patterns for date and time kinds, or overrides for the kind's validation pattern and width
//! template. [`FieldType`] is that nickname. Field types are built once at schema load, then
//! shared read-only by every field declared over them (`Arc<FieldType>`).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::schema::basetype::{BaseKind, TypeDescriptor, TypedValue};
use crate::Result;

/// Default strftime pattern for `date` kinds when the schema sets none.
pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d";
/// Default strftime pattern for `time` kinds when the schema sets none.
pub const DEFAULT_TIME_FORMAT: &str = "%H%M%S";

/// A named schema alias over one base kind, with optional format metadata.
///
/// # Examples
///
/// ```rust
/// use rbf::schema::{BaseKind, FieldType, TypedValue};
///
/// let ft = FieldType::new("A/N", "string").unwrap();
/// assert_eq!(ft.name, "A/N");
/// assert_eq!(ft.kind, BaseKind::String);
///
/// let ft = FieldType::new("I", "integer").unwrap();
/// assert_eq!(ft.convert("00000-6").unwrap(), TypedValue::Int(-6));
///
/// assert!(FieldType::new("X", "blob").is_err());
/// ```
#[derive(Debug)]
pub struct FieldType {
    /// Schema nickname, e.g. "A/N"
    pub name: String,
    /// The base kind this nickname resolves to
    pub kind: BaseKind,
    /// strftime pattern for `date` kinds
    pub date_format: String,
    /// strftime pattern for `time` kinds
    pub time_format: String,
    /// Schema override for the kind's validation pattern
    pub pattern_override: Option<String>,
    /// Schema override for the kind's width-format template
    pub format_override: Option<String>,
    /// Schema attributes this model has no dedicated slot for
    pub extra: HashMap<String, String>,
    regex_override: OnceLock<Option<Regex>>,
}

impl FieldType {
    /// Create a new field type from its schema nickname and base kind name.
    ///
    /// ## Arguments
    /// * 'name' - The schema nickname (e.g. "A/N", "I", "D")
    /// * 'kind' - Base kind name; must be one of the registry kinds
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidType`] when `kind` is not a registry kind.
    pub fn new(name: &str, kind: &str) -> Result<FieldType> {
        let kind =
            BaseKind::from_str(kind).map_err(|_| crate::Error::InvalidType(kind.to_string()))?;

        Ok(FieldType {
            name: name.to_string(),
            kind,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            pattern_override: None,
            format_override: None,
            extra: HashMap::new(),
            regex_override: OnceLock::new(),
        })
    }

    /// The registry descriptor behind this field type.
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.kind.descriptor()
    }

    /// The width-format template in effect (schema override or kind default).
    pub fn format(&self) -> &str {
        match &self.format_override {
            Some(f) => f,
            None => self.descriptor().format,
        }
    }

    /// The validation pattern in effect (schema override or kind default).
    pub fn pattern(&self) -> &str {
        match &self.pattern_override {
            Some(p) => p,
            None => self.descriptor().pattern,
        }
    }

    /// The default raw value new fields of this type are initialized from.
    pub fn zero(&self) -> TypedValue {
        match self.kind {
            BaseKind::Integer => TypedValue::Int(0),
            BaseKind::Decimal => TypedValue::Dec(0.0),
            _ => TypedValue::Str(self.descriptor().zero_raw.to_string()),
        }
    }

    /// Convert a raw value to its typed form according to this field type.
    ///
    /// Date and time kinds parse with this type's strftime patterns. Numeric kinds first strip
    /// all leading `'0'` characters so zero-padded signed values like `"00000-6"` still parse;
    /// a value that is all zeros converts as `"0"`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Conversion`] when the value does not parse as the base kind.
    pub fn convert(&self, value: &str) -> Result<TypedValue> {
        let desc = self.descriptor();

        match self.kind {
            BaseKind::Date => desc.convert(value, &self.date_format),
            BaseKind::Time => desc.convert(value, &self.time_format),
            BaseKind::Integer | BaseKind::Decimal => {
                let stripped = value.trim_start_matches('0');
                if stripped.is_empty() {
                    desc.convert("0", "")
                } else {
                    desc.convert(stripped, "")
                }
            }
            BaseKind::String => desc.convert(value, ""),
        }
    }

    /// Lenient variant of [`FieldType::convert`]: on failure, log a warning and hand back the
    /// original value as [`TypedValue::Str`] instead of an error.
    pub fn convert_lossy(&self, value: &str) -> TypedValue {
        match self.convert(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(ftype = %self.name, %e, "conversion fell back to raw value");
                TypedValue::Str(value.to_string())
            }
        }
    }

    /// Test a candidate against the validation pattern in effect (prefix semantics).
    pub fn matches(&self, value: &str) -> bool {
        match self.override_regex() {
            Some(re) => re.find(value).is_some_and(|m| m.start() == 0),
            None => self.descriptor().matches(value),
        }
    }

    fn override_regex(&self) -> Option<&Regex> {
        self.regex_override
            .get_or_init(|| {
                self.pattern_override
                    .as_ref()
                    .and_then(|p| Regex::new(p).ok())
            })
            .as_ref()
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name=<{}> kind=<{}>", self.name, self.kind)
    }
}
