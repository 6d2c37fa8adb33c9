//! Typed key/value annotations for structured log calls.
//!
//! ```rust
//! use sugarlog::Field;
//!
//! let fields = [
//!     Field::string("user", "alice"),
//!     Field::u16("port", 8080),
//!     Field::bool("tls", true),
//! ];
//! # let _ = fields;
//! ```

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Number, Value};

/// The value carried by a [`Field`].
///
/// This is a closed set. Values without a dedicated representation go through
/// [`Field::any`], which stores their `Debug` rendering as
/// [`FieldValue::Unstructured`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    /// Every field after a namespace is nested under the namespace's key.
    Namespace,
    Unstructured(String),
}

/// A single key/value annotation attached to a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    /// Build a field from a key and an already typed value.
    pub fn new(key: impl Into<Cow<'static, str>>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// The key this field is rendered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The typed value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// A boolean field.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    /// A string field.
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    /// A signed integer field. Every signed width is stored as `i64`.
    pub fn i8(key: impl Into<Cow<'static, str>>, value: i8) -> Self {
        Self::new(key, FieldValue::Int(value.into()))
    }

    /// A signed 16-bit integer field.
    pub fn i16(key: impl Into<Cow<'static, str>>, value: i16) -> Self {
        Self::new(key, FieldValue::Int(value.into()))
    }

    /// A signed 32-bit integer field.
    pub fn i32(key: impl Into<Cow<'static, str>>, value: i32) -> Self {
        Self::new(key, FieldValue::Int(value.into()))
    }

    /// A signed 64-bit integer field.
    pub fn i64(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    /// A pointer-sized signed integer field.
    pub fn isize(key: impl Into<Cow<'static, str>>, value: isize) -> Self {
        Self::new(key, FieldValue::Int(value as i64))
    }

    /// An unsigned integer field. Every unsigned width is stored as `u64`.
    pub fn u8(key: impl Into<Cow<'static, str>>, value: u8) -> Self {
        Self::new(key, FieldValue::Uint(value.into()))
    }

    /// An unsigned 16-bit integer field.
    pub fn u16(key: impl Into<Cow<'static, str>>, value: u16) -> Self {
        Self::new(key, FieldValue::Uint(value.into()))
    }

    /// An unsigned 32-bit integer field.
    pub fn u32(key: impl Into<Cow<'static, str>>, value: u32) -> Self {
        Self::new(key, FieldValue::Uint(value.into()))
    }

    /// An unsigned 64-bit integer field.
    pub fn u64(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, FieldValue::Uint(value))
    }

    /// A pointer-sized unsigned integer field.
    pub fn usize(key: impl Into<Cow<'static, str>>, value: usize) -> Self {
        Self::new(key, FieldValue::Uint(value as u64))
    }

    /// A 32-bit float field, widened to `f64`.
    pub fn f32(key: impl Into<Cow<'static, str>>, value: f32) -> Self {
        Self::new(key, FieldValue::Float(value.into()))
    }

    /// A float field. NaN and infinities are rendered as strings.
    pub fn f64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::Float(value))
    }

    /// Open a nested object: all fields that follow are placed under `key`.
    pub fn namespace(key: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, FieldValue::Namespace)
    }

    /// Fallback for values with no typed constructor; records the value's
    /// `Debug` output as an unstructured string.
    pub fn any(key: impl Into<Cow<'static, str>>, value: &impl fmt::Debug) -> Self {
        Self::new(key, FieldValue::Unstructured(format!("{:?}", value)))
    }
}

impl FieldValue {
    fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::String(s) | FieldValue::Unstructured(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Uint(u) => Value::Number((*u).into()),
            FieldValue::Float(f) => match Number::from_f64(*f) {
                Some(n) => Value::Number(n),
                None if f.is_nan() => Value::String("NaN".to_string()),
                None if *f > 0.0 => Value::String("+Inf".to_string()),
                None => Value::String("-Inf".to_string()),
            },
            FieldValue::Namespace => Value::Object(Map::new()),
        }
    }
}

/// Encode fields into a JSON object, preserving call order.
///
/// A namespace field swallows the rest of the slice into a nested object.
/// Repeated keys keep their first position but take the last value.
pub fn encode_fields(fields: &[Field]) -> Map<String, Value> {
    let mut map = Map::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        if field.value == FieldValue::Namespace {
            let nested = encode_fields(&fields[i + 1..]);
            map.insert(field.key.to_string(), Value::Object(nested));
            break;
        }
        map.insert(field.key.to_string(), field.value.to_json());
    }
    map
}

/// Render fields as the text of a JSON object, or an empty string when
/// there are none.
pub fn render_fields(fields: &[Field]) -> String {
    if fields.is_empty() {
        return String::new();
    }
    Value::Object(encode_fields(fields)).to_string()
}
