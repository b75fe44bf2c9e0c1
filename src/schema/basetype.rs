//! Base type registry for field kinds
//!
//! Every field in a record-based file ultimately stores text, but that text represents one of a
//! fixed set of base kinds: `string`, `integer`, `decimal`, `date` or `time`. This module exposes
//! the process-wide registry of those kinds: for each kind an immutable [`TypeDescriptor`] holding
//! its canonical zero value, validation pattern, width-format template and conversion routine.
//!
//! The registry is constant and lazily initialized; nothing mutates it at runtime. Schema-level
//! aliases over these kinds live in [`crate::schema::FieldType`].

use std::fmt;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use strum::{Display, EnumString};

use crate::Result;

/// The fixed set of base kinds a field can hold.
///
/// Kind names match the lowercase spelling used by schema documents
/// (`type="integer"` etc).
///
/// # Examples
///
/// ```rust
/// use std::str::FromStr;
/// use rbf::schema::BaseKind;
///
/// assert_eq!(BaseKind::from_str("decimal").unwrap(), BaseKind::Decimal);
/// assert!(BaseKind::from_str("float").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BaseKind {
    /// Free text, stored as-is
    String,
    /// Whole numbers, converted to `i64`
    Integer,
    /// Fractional numbers, converted to `f64`
    Decimal,
    /// Calendar dates, converted with a strftime pattern
    Date,
    /// Wall-clock times, converted with a strftime pattern
    Time,
}

/// A scalar value produced by converting a raw field substring.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Untyped text (also the lenient-conversion fallback)
    Str(String),
    /// A converted integer
    Int(i64),
    /// A converted decimal
    Dec(f64),
    /// A converted calendar date
    Date(NaiveDate),
    /// A converted wall-clock time
    Time(NaiveTime),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Str(v) => write!(f, "{v}"),
            TypedValue::Int(v) => write!(f, "{v}"),
            TypedValue::Dec(v) => write!(f, "{v}"),
            TypedValue::Date(v) => write!(f, "{v}"),
            TypedValue::Time(v) => write!(f, "{v}"),
        }
    }
}

/// Immutable descriptor for one base kind.
///
/// Holds the canonical storage behaviour of the kind: its default ("zero") raw value, the
/// validation pattern candidate values are matched against, and the printf-style width template
/// used to render values at a field's declared width (see [`crate::schema::template`]).
///
/// # Examples
///
/// ```rust
/// use rbf::schema::BaseKind;
///
/// let desc = BaseKind::Integer.descriptor();
/// assert_eq!(desc.zero_raw, "0");
/// assert!(desc.matches("0042"));
/// assert!(!desc.matches("x42"));
/// ```
pub struct TypeDescriptor {
    /// The kind this descriptor belongs to
    pub kind: BaseKind,
    /// Default raw value used when a field is initialized
    pub zero_raw: &'static str,
    /// Validation pattern, matched with prefix semantics
    pub pattern: &'static str,
    /// printf-style template with `*` width placeholders
    pub format: &'static str,
    regex: OnceLock<Regex>,
}

static STRING_DESC: TypeDescriptor = TypeDescriptor {
    kind: BaseKind::String,
    zero_raw: "",
    pattern: r"[\w/\*\.,\-]+",
    format: "%-*.*s",
    regex: OnceLock::new(),
};

static INTEGER_DESC: TypeDescriptor = TypeDescriptor {
    kind: BaseKind::Integer,
    zero_raw: "0",
    pattern: "[0-9]+",
    format: "%0*.*d",
    regex: OnceLock::new(),
};

static DECIMAL_DESC: TypeDescriptor = TypeDescriptor {
    kind: BaseKind::Decimal,
    zero_raw: "0",
    pattern: "[0-9]+",
    format: "%0*.2g",
    regex: OnceLock::new(),
};

static DATE_DESC: TypeDescriptor = TypeDescriptor {
    kind: BaseKind::Date,
    zero_raw: "0",
    pattern: "[0-9]+",
    format: "",
    regex: OnceLock::new(),
};

static TIME_DESC: TypeDescriptor = TypeDescriptor {
    kind: BaseKind::Time,
    zero_raw: "0",
    pattern: "[0-9]+",
    format: "",
    regex: OnceLock::new(),
};

impl BaseKind {
    /// Get the registry descriptor for this kind.
    pub fn descriptor(self) -> &'static TypeDescriptor {
        match self {
            BaseKind::String => &STRING_DESC,
            BaseKind::Integer => &INTEGER_DESC,
            BaseKind::Decimal => &DECIMAL_DESC,
            BaseKind::Date => &DATE_DESC,
            BaseKind::Time => &TIME_DESC,
        }
    }
}

impl TypeDescriptor {
    /// Convert a raw value to a [`TypedValue`] according to this kind.
    ///
    /// ## Arguments
    /// * 'value' - The raw string to convert
    /// * 'aux'   - Auxiliary format pattern; only consulted for `date` and `time` kinds,
    ///   where it carries the strftime pattern the value is parsed with
    ///
    /// # Errors
    /// Returns [`crate::Error::Conversion`] when the value does not parse as this kind.
    pub fn convert(&self, value: &str, aux: &str) -> Result<TypedValue> {
        match self.kind {
            BaseKind::String => Ok(TypedValue::Str(value.to_string())),
            BaseKind::Integer => match value.parse::<i64>() {
                Ok(n) => Ok(TypedValue::Int(n)),
                Err(_) => Err(self.conversion_error(value)),
            },
            BaseKind::Decimal => match value.parse::<f64>() {
                Ok(n) => Ok(TypedValue::Dec(n)),
                Err(_) => Err(self.conversion_error(value)),
            },
            BaseKind::Date => match NaiveDate::parse_from_str(value, aux) {
                Ok(d) => Ok(TypedValue::Date(d)),
                Err(_) => Err(self.conversion_error(value)),
            },
            BaseKind::Time => match NaiveTime::parse_from_str(value, aux) {
                Ok(t) => Ok(TypedValue::Time(t)),
                Err(_) => Err(self.conversion_error(value)),
            },
        }
    }

    /// Test a candidate against this kind's validation pattern.
    ///
    /// Matching uses prefix semantics: the candidate matches when the pattern matches starting
    /// at position 0, without requiring it to consume the whole string.
    pub fn matches(&self, value: &str) -> bool {
        self.regex()
            .find(value)
            .is_some_and(|m| m.start() == 0)
    }

    fn regex(&self) -> &Regex {
        self.regex
            .get_or_init(|| Regex::new(self.pattern).expect("built-in kind pattern is valid"))
    }

    fn conversion_error(&self, value: &str) -> crate::Error {
        crate::Error::Conversion {
            value: value.to_string(),
            kind: self.kind.to_string(),
        }
    }
}
