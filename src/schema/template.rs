//! Width-format templates
//!
//! Default and reset values for a field are produced by rendering a printf-style template at the
//! field's declared width. Templates come from the base kind registry (e.g. `%-*.*s` for strings,
//! `%0*.*d` for integers) or from a schema-level `format` override, and use `*` as a placeholder
//! for the width: rendering substitutes the field length for every `*` before formatting.
//!
//! The supported grammar is the subset the schemas actually use:
//! `%[-][0][*][.(*|digits)]{s,d,f,g}`. An empty template renders the value as text, right-padded
//! with spaces and truncated to the width.
//!
//! Widths and precisions are byte budgets, matching the byte offsets fields are sliced by.
//! Truncation backs up to the nearest character boundary, so a rendered value never ends in a
//! split character; space padding then brings it to the exact byte width.

use crate::schema::basetype::TypedValue;
use crate::Result;

/// Render a value through a width-format template.
///
/// ## Arguments
/// * 'template' - printf-style template with `*` width placeholders; may be empty
/// * 'width'    - The field length substituted for each `*`
/// * 'value'    - The value to format
///
/// # Errors
/// Returns an error if the template is malformed or if the value cannot be coerced to the
/// template's conversion kind (e.g. `%d` over non-numeric text).
///
/// # Examples
///
/// ```rust
/// use rbf::schema::template::render;
/// use rbf::schema::TypedValue;
///
/// assert_eq!(render("%-*.*s", 10, &TypedValue::Str("AAA".into())).unwrap(), "AAA       ");
/// assert_eq!(render("%0*d", 10, &TypedValue::Int(314)).unwrap(), "0000000314");
/// ```
pub fn render(template: &str, width: usize, value: &TypedValue) -> Result<String> {
    if template.is_empty() {
        let mut s = value.to_string();
        truncate_bytes(&mut s, width);
        return Ok(pad(&s, width, Justify::Left, ' '));
    }

    let spec = Spec::parse(template, width)?;

    let body = match spec.conv {
        's' => {
            let mut s = value.to_string();
            if let Some(prec) = spec.precision {
                truncate_bytes(&mut s, prec);
            }
            s
        }
        'd' => {
            let n = as_int(value)?;
            // precision on %d means minimum digits, which collapses to zero padding here
            if spec.zero || spec.precision.is_some() {
                return Ok(pad_signed(&n.to_string(), spec.width, '0', spec.left));
            }
            n.to_string()
        }
        'f' => {
            let n = as_dec(value)?;
            format!("{:.*}", spec.precision.unwrap_or(6), n)
        }
        'g' => {
            let n = as_dec(value)?;
            general(n, spec.precision.unwrap_or(6))
        }
        other => {
            return Err(malformed_error!(
                "unsupported conversion '{}' in format template '{}'",
                other,
                template
            ))
        }
    };

    let fill = if spec.zero && spec.conv != 's' && !spec.left {
        '0'
    } else {
        ' '
    };
    let justify = if spec.left { Justify::Left } else { Justify::Right };

    if fill == '0' {
        Ok(pad_signed(&body, spec.width, '0', false))
    } else {
        Ok(pad(&body, spec.width, justify, fill))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Justify {
    Left,
    Right,
}

struct Spec {
    left: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    conv: char,
}

impl Spec {
    fn parse(template: &str, star: usize) -> Result<Spec> {
        let mut chars = template.chars().peekable();

        if chars.next() != Some('%') {
            return Err(malformed_error!(
                "format template '{}' does not start with '%'",
                template
            ));
        }

        let mut spec = Spec {
            left: false,
            zero: false,
            width: 0,
            precision: None,
            conv: '\0',
        };

        while let Some(&c) = chars.peek() {
            match c {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }

        if chars.peek() == Some(&'*') {
            chars.next();
            spec.width = star;
        } else {
            let mut digits = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if !digits.is_empty() {
                spec.width = digits.parse().unwrap_or(0);
            }
        }

        if chars.peek() == Some(&'.') {
            chars.next();
            if chars.peek() == Some(&'*') {
                chars.next();
                spec.precision = Some(star);
            } else {
                let mut digits = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() {
                        digits.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                spec.precision = Some(digits.parse().unwrap_or(0));
            }
        }

        match chars.next() {
            Some(c) if matches!(c, 's' | 'd' | 'f' | 'g') => spec.conv = c,
            Some(c) => {
                return Err(malformed_error!(
                    "unsupported conversion '{}' in format template '{}'",
                    c,
                    template
                ))
            }
            None => {
                return Err(malformed_error!(
                    "format template '{}' has no conversion character",
                    template
                ))
            }
        }

        Ok(spec)
    }
}

fn as_int(value: &TypedValue) -> Result<i64> {
    match value {
        TypedValue::Int(n) => Ok(*n),
        TypedValue::Dec(d) => Ok(*d as i64),
        TypedValue::Str(s) => s.parse::<i64>().map_err(|_| crate::Error::Conversion {
            value: s.clone(),
            kind: "integer".to_string(),
        }),
        other => Err(crate::Error::Conversion {
            value: other.to_string(),
            kind: "integer".to_string(),
        }),
    }
}

fn as_dec(value: &TypedValue) -> Result<f64> {
    match value {
        TypedValue::Dec(d) => Ok(*d),
        TypedValue::Int(n) => Ok(*n as f64),
        TypedValue::Str(s) => s.parse::<f64>().map_err(|_| crate::Error::Conversion {
            value: s.clone(),
            kind: "decimal".to_string(),
        }),
        other => Err(crate::Error::Conversion {
            value: other.to_string(),
            kind: "decimal".to_string(),
        }),
    }
}

// cut at the largest char boundary within the byte budget
fn truncate_bytes(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

fn pad(s: &str, width: usize, justify: Justify, fill: char) -> String {
    let len = s.len();
    if len >= width {
        return s.to_string();
    }

    let filler: String = std::iter::repeat(fill).take(width - len).collect();
    match justify {
        Justify::Left => format!("{s}{filler}"),
        Justify::Right => format!("{filler}{s}"),
    }
}

// zero padding has to land between the sign and the digits
fn pad_signed(s: &str, width: usize, fill: char, left: bool) -> String {
    if left {
        return pad(s, width, Justify::Left, ' ');
    }
    if s.len() >= width {
        return s.to_string();
    }

    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let filler: String = std::iter::repeat(fill)
        .take(width - sign.len() - digits.len())
        .collect();
    format!("{sign}{filler}{digits}")
}

// %g semantics without the '#' flag: 'prec' significant digits, trailing zeros stripped,
// exponential notation outside [1e-4, 10^prec)
fn general(value: f64, prec: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let prec = prec.max(1);
    let exp = value.abs().log10().floor() as i32;

    if exp < -4 || exp >= prec as i32 {
        format!("{:.*e}", prec - 1, value)
    } else {
        let decimals = (prec as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    }
}
