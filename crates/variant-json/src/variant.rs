//! The dynamically-typed JSON value tree.
//!
//! A [`Variant`] owns its children, so a tree can never contain cycles. Objects
//! keep insertion order and replace the value on a duplicate key. The reserved
//! keys [`TYPE_HINT_KEY`] and [`COMBINE_INDEX_KEY`] are ordinary entries here;
//! only the decoder and the merge engine give them meaning.

use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

use crate::decoder::{self, Decode};
use crate::encoder;
use crate::error::{DecodeError, MergeError};
use crate::merge;
use crate::number::Number;
use crate::options::EncodeOptions;

/// Object key carrying the concrete type name of an encoded object.
pub const TYPE_HINT_KEY: &str = "@type";

/// Object key carrying an array element's alignment key for merging.
pub const COMBINE_INDEX_KEY: &str = "@index";

/// Ordered string-keyed map used for JSON objects.
pub type Map = IndexMap<String, Variant>;

static NULL: Variant = Variant::Null;

/// Any JSON value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Vec<Variant>),
    Object(Map),
}

impl Variant {
    /// Short name of this node's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Variant::Null => "null",
            Variant::Boolean(_) => "boolean",
            Variant::Number(_) => "number",
            Variant::String(_) => "string",
            Variant::Array(_) => "array",
            Variant::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Variant::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Variant>> {
        match self {
            Variant::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Variant>> {
        match self {
            Variant::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Variant::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Variant::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` when this is an object.
    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// The `@type` entry of an object, if it is a string.
    pub fn type_hint(&self) -> Option<&str> {
        self.get(TYPE_HINT_KEY).and_then(Variant::as_str)
    }

    /// Text form of a leaf value: strings verbatim, numbers as their literal,
    /// booleans as `true`/`false`. Containers and null have none.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Variant::String(s) => Some(Cow::Borrowed(s)),
            Variant::Number(n) => Some(Cow::Owned(n.to_string())),
            Variant::Boolean(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Variant::Null | Variant::Array(_) | Variant::Object(_) => None,
        }
    }

    /// A copy with every non-finite float replaced by `Null`.
    fn finite_only(&self) -> Variant {
        match self {
            Variant::Number(Number::Float(f)) if !f.is_finite() => Variant::Null,
            Variant::Array(items) => Variant::Array(items.iter().map(Variant::finite_only).collect()),
            Variant::Object(map) => Variant::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.finite_only()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Decode this tree into a typed value.
    pub fn make<T: Decode>(&self) -> Result<T, DecodeError> {
        decoder::decode(self)
    }

    /// Encode this tree as JSON text. Variants never carry injected hints or indices.
    pub fn dump(&self, options: EncodeOptions) -> Result<String, crate::error::EncodeError> {
        encoder::encode(self, options)
    }

    /// Overlay `incoming` on top of this tree in place.
    pub fn merge(&mut self, incoming: Variant) -> Result<(), MergeError> {
        merge::merge_into(self, incoming)
    }
}

impl Index<&str> for Variant {
    type Output = Variant;

    /// Missing keys and non-objects index to `Null`.
    fn index(&self, key: &str) -> &Variant {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Variant {
    type Output = Variant;

    /// Out-of-range positions and non-arrays index to `Null`.
    fn index(&self, index: usize) -> &Variant {
        self.as_array()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }
}

/// Compact JSON. Non-finite floats have no JSON form and are written as `null`.
impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match encoder::encode(self, EncodeOptions::DEFAULT) {
            Ok(text) => text,
            Err(_) => encoder::encode(&self.finite_only(), EncodeOptions::DEFAULT)
                .map_err(|_| fmt::Error)?,
        };
        f.write_str(&text)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Boolean(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Number(Number::Signed(i64::from(value)))
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Number(Number::Signed(value))
    }
}

impl From<u64> for Variant {
    fn from(value: u64) -> Self {
        Variant::Number(Number::Unsigned(value))
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Number(Number::Float(value))
    }
}

impl From<Number> for Variant {
    fn from(value: Number) -> Self {
        Variant::Number(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(value: Vec<Variant>) -> Self {
        Variant::Array(value)
    }
}

impl From<Map> for Variant {
    fn from(value: Map) -> Self {
        Variant::Object(value)
    }
}

impl FromIterator<(String, Variant)> for Variant {
    fn from_iter<I: IntoIterator<Item = (String, Variant)>>(iter: I) -> Self {
        Variant::Object(iter.into_iter().collect())
    }
}

impl FromIterator<Variant> for Variant {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        Variant::Array(iter.into_iter().collect())
    }
}

/// Bridge from the parser's value tree; number literals go through [`Number::parse`].
///
/// Relies on serde_json's `arbitrary_precision` feature so that
/// `Number::to_string` returns the literal exactly as written.
impl From<serde_json::Value> for Variant {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Variant::Null,
            serde_json::Value::Bool(b) => Variant::Boolean(b),
            serde_json::Value::Number(n) => Variant::Number(Number::parse(&n.to_string())),
            serde_json::Value::String(s) => Variant::String(s),
            serde_json::Value::Array(items) => {
                Variant::Array(items.into_iter().map(Variant::from).collect())
            }
            serde_json::Value::Object(map) => Variant::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Variant::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Lossy for numbers `serde_json` cannot hold: `NaN` and infinite floats
/// become `Value::Null`, matching how [`Variant`]'s `Display` writes them.
impl From<&Variant> for serde_json::Value {
    fn from(value: &Variant) -> Self {
        match value {
            Variant::Null => serde_json::Value::Null,
            Variant::Boolean(b) => serde_json::Value::Bool(*b),
            Variant::Number(n) => n
                .to_string()
                .parse::<serde_json::Number>()
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Variant::String(s) => serde_json::Value::String(s.clone()),
            Variant::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Variant::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}
