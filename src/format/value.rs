//! Logging arguments and the native values formatters produce.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::style::StyleToken;

/// One element of a logging call.
///
/// # Example
///
/// ```rust
/// use isolog::{log_args, Arg, BLUE};
/// use serde_json::json;
///
/// let args = log_args![BLUE, "count: ", 3, json!({ "a": 1 })];
/// assert_eq!(args[0], Arg::Style(BLUE));
/// assert_eq!(args[2], Arg::Number(3.0));
/// assert!(matches!(args[3], Arg::Value(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Style(StyleToken),
    Text(String),
    Number(f64),
    /// Anything that is not text or a number.
    Value(Value),
}

impl Arg {
    /// Text and numbers are primitives; they can live inside a styled header.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Arg::Text(_) | Arg::Number(_))
    }

    /// The textual form of a primitive, `None` for tokens and opaque values.
    pub fn primitive_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Arg::Text(text) => Some(Cow::Borrowed(text)),
            Arg::Number(n) => Some(Cow::Owned(format_number(*n))),
            Arg::Style(_) | Arg::Value(_) => None,
        }
    }

    pub fn token(&self) -> Option<StyleToken> {
        match self {
            Arg::Style(token) => Some(*token),
            _ => None,
        }
    }
}

impl From<StyleToken> for Arg {
    fn from(token: StyleToken) -> Self {
        Arg::Style(token)
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Arg::Text(text)
    }
}

impl From<&String> for Arg {
    fn from(text: &String) -> Self {
        Arg::Text(text.clone())
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(n: $ty) -> Self {
                    Arg::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Value(Value::Bool(b))
    }
}

/// JSON strings and numbers become primitives; everything else stays opaque.
impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Arg::Text(text),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Arg::Number(f),
                None => Arg::Value(Value::Number(n)),
            },
            other => Arg::Value(other),
        }
    }
}

impl From<&Value> for Arg {
    fn from(value: &Value) -> Self {
        Arg::from(value.clone())
    }
}

/// A value handed to the native console.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Text(String),
    Number(f64),
    /// Passed through untouched so a rich console can render it.
    Value(Value),
}

impl LogValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LogValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Text(text) => f.write_str(text),
            LogValue::Number(n) => f.write_str(&format_number(*n)),
            LogValue::Value(value) => f.write_str(&canonical(value)),
        }
    }
}

impl From<&str> for LogValue {
    fn from(text: &str) -> Self {
        LogValue::Text(text.to_string())
    }
}

impl From<String> for LogValue {
    fn from(text: String) -> Self {
        LogValue::Text(text)
    }
}

/// Canonical, compact JSON rendering of an opaque value.
pub fn canonical(value: &Value) -> String {
    value.to_string()
}

/// Renders a number the way a JavaScript console would.
///
/// Integral values print without a fractional part. Magnitudes outside
/// `[1e-6, 1e21)` use exponent form with an explicit sign.
///
/// ```rust
/// use isolog::format_number;
///
/// assert_eq!(format_number(42.0), "42");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(1.5), "1.5");
/// assert_eq!(format_number(f64::NAN), "NaN");
/// assert_eq!(format_number(1e21), "1e+21");
/// ```
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if !(1e-6..1e21).contains(&n.abs()) {
        exponent_form(n)
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

fn exponent_form(n: f64) -> String {
    let text = format!("{:e}", n);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::RED;
    use serde_json::json;

    #[test]
    fn test_primitive_classification() {
        assert!(Arg::from("x").is_primitive());
        assert!(Arg::from(1).is_primitive());
        assert!(!Arg::from(RED).is_primitive());
        assert!(!Arg::from(json!({"a": 1})).is_primitive());
        assert!(!Arg::from(true).is_primitive());
    }

    #[test]
    fn test_json_scalars_become_primitives() {
        assert_eq!(Arg::from(json!("hi")), Arg::Text("hi".into()));
        assert_eq!(Arg::from(json!(7)), Arg::Number(7.0));
        assert_eq!(Arg::from(json!(null)), Arg::Value(Value::Null));
        assert_eq!(Arg::from(json!([1, 2])), Arg::Value(json!([1, 2])));
    }

    #[test]
    fn test_primitive_text() {
        assert_eq!(Arg::from(12u8).primitive_text().as_deref(), Some("12"));
        assert_eq!(Arg::from(0.25).primitive_text().as_deref(), Some("0.25"));
        assert_eq!(Arg::from(RED).primitive_text(), None);
    }

    #[test]
    fn test_format_number_edges() {
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e-6), "0.000001");
    }

    #[test]
    fn test_log_value_display() {
        assert_eq!(LogValue::Number(2.0).to_string(), "2");
        assert_eq!(
            LogValue::Value(json!({"my-object": "isLogged"})).to_string(),
            r#"{"my-object":"isLogged"}"#
        );
        assert_eq!(LogValue::from("x").as_text(), Some("x"));
    }
}
