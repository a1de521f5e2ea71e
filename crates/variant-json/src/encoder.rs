//! Walks typed values (or a [`Variant`] tree) and writes JSON text.
//!
//! Values describe themselves through the [`Encode`] trait; the [`Encoder`]
//! owns the output buffer, the active [`EncodeOptions`] and the indentation
//! state. Dispatch by shape happens through trait impls:
//!
//! - **Scalars**: `null`, booleans, numbers, escaped strings
//! - **Enums**: variant name, or ordinal with `ENUMS_AS_INTS`
//! - **Lists and sets**: `[...]`, each element optionally tagged with `@index`
//! - **Maps**: `{...}` keyed by [`MapKey::to_key`]
//! - **Mapped objects**: `{...}` with an optional `@type` and `@index` first,
//!   then one entry per resolved member
//!
//! # Example
//! ```
//! use variant_json::{encode, EncodeOptions};
//!
//! let json = encode(&vec![3, 1, 4], EncodeOptions::DEFAULT).unwrap();
//! assert_eq!(json, "[3,1,4]");
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

use crate::decoder::MapKey;
use crate::error::EncodeError;
use crate::member::{Mapped, MappedEnum, MemberKind};
use crate::number::{format_f32, format_f64};
use crate::options::EncodeOptions;
use crate::resolver::{resolve, Direction};
use crate::variant::{Variant, COMBINE_INDEX_KEY, TYPE_HINT_KEY};

#[cfg(windows)]
const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
const NEWLINE: &str = "\n";

/// Per-value encoding context handed down from the enclosing container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hints {
    /// Write `@type` into this value's object even when type hints are off.
    pub force_type_hint: bool,
    /// Position of this value in its enclosing array, when `@index` should be written.
    pub combine_index: Option<usize>,
}

/// A value that can be written as JSON.
pub trait Encode {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError>;
}

/// Encode `value` as JSON text.
///
/// Top-level values carry no forced hint and no combine index; `@index` is only
/// ever written for objects inside arrays.
pub fn encode<T: Encode + ?Sized>(value: &T, options: EncodeOptions) -> Result<String, EncodeError> {
    let mut encoder = Encoder::new(options);
    value.encode(&mut encoder, Hints::default())?;
    Ok(encoder.finish())
}

/// JSON text writer holding the output buffer and indentation state.
#[derive(Debug)]
pub struct Encoder {
    out: String,
    options: EncodeOptions,
    indent: usize,
}

impl Encoder {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            out: String::new(),
            options,
            indent: 0,
        }
    }

    pub fn options(&self) -> EncodeOptions {
        self.options
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn write_null(&mut self) {
        self.out.push_str("null");
    }

    pub fn write_bool(&mut self, value: bool) {
        self.out.push_str(if value { "true" } else { "false" });
    }

    /// Append an already-formatted number literal.
    pub fn write_number(&mut self, literal: &str) {
        self.out.push_str(literal);
    }

    /// Write a quoted string. Only printable ASCII is written verbatim; every
    /// other UTF-16 code unit becomes a `\uxxxx` escape.
    pub fn write_str(&mut self, value: &str) {
        self.out.push('"');
        for unit in value.encode_utf16() {
            match unit {
                0x22 => self.out.push_str("\\\""),
                0x5c => self.out.push_str("\\\\"),
                0x08 => self.out.push_str("\\b"),
                0x0c => self.out.push_str("\\f"),
                0x0a => self.out.push_str("\\n"),
                0x0d => self.out.push_str("\\r"),
                0x09 => self.out.push_str("\\t"),
                0x20..=0x7e => self.out.push(char::from(unit as u8)),
                _ => self.out.push_str(&format!("\\u{unit:04x}")),
            }
        }
        self.out.push('"');
    }

    pub fn write_empty_array(&mut self) {
        self.out.push_str("[]");
    }

    pub fn write_empty_object(&mut self) {
        self.out.push_str("{}");
    }

    pub fn begin_object(&mut self) {
        self.out.push('{');
        self.open_scope();
    }

    pub fn end_object(&mut self) {
        self.close_scope();
        self.out.push('}');
    }

    pub fn begin_array(&mut self) {
        self.out.push('[');
        self.open_scope();
    }

    pub fn end_array(&mut self) {
        self.close_scope();
        self.out.push(']');
    }

    /// Start an array element: a comma unless `first`, then the indent.
    pub fn begin_element(&mut self, first: bool) {
        if !first {
            self.out.push(',');
            if self.options.pretty_print() {
                self.out.push_str(NEWLINE);
            }
        }
        if self.options.pretty_print() {
            self.push_indent();
        }
    }

    /// Start an object entry: separator, quoted key and colon.
    pub fn begin_entry(&mut self, first: bool, key: &str) {
        self.begin_element(first);
        self.write_str(key);
        self.out.push(':');
        if self.options.pretty_print() {
            self.out.push(' ');
        }
    }

    fn open_scope(&mut self) {
        if self.options.pretty_print() {
            self.out.push_str(NEWLINE);
            self.indent += 1;
        }
    }

    fn close_scope(&mut self) {
        if self.options.pretty_print() {
            self.out.push_str(NEWLINE);
            self.indent = self.indent.saturating_sub(1);
            self.push_indent();
        }
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    /// Write a list-like sequence. With `COMBINABLE`, each element learns its position.
    pub fn encode_seq<'a, E, I>(&mut self, items: I, hints: Hints) -> Result<(), EncodeError>
    where
        E: Encode + ?Sized + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            self.write_empty_array();
            return Ok(());
        }

        self.begin_array();
        for (i, item) in items.enumerate() {
            let item_hints = self.element_hints(hints, i);
            self.begin_element(i == 0);
            item.encode(self, item_hints)?;
        }
        self.end_array();
        Ok(())
    }

    /// Write a map. Values inherit a forced type hint but never a combine index.
    pub fn encode_map<'a, K, V, I>(&mut self, entries: I, hints: Hints) -> Result<(), EncodeError>
    where
        K: MapKey + 'a,
        V: Encode + ?Sized + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            self.write_empty_object();
            return Ok(());
        }

        let value_hints = Hints {
            force_type_hint: hints.force_type_hint,
            combine_index: None,
        };
        self.begin_object();
        for (i, (key, value)) in entries.enumerate() {
            self.begin_entry(i == 0, &key.to_key());
            value.encode(self, value_hints)?;
        }
        self.end_object();
        Ok(())
    }

    /// Write a mapped object: `@type`, `@index`, then its resolved members.
    pub fn encode_object<T: Mapped>(&mut self, value: &T, hints: Hints) -> Result<(), EncodeError> {
        value.before_encode();

        let plan = resolve::<T>(self.options, Direction::Encode);
        let members = T::members();

        self.begin_object();
        let mut first = true;

        if hints.force_type_hint || self.options.type_hints() {
            self.begin_entry(first, TYPE_HINT_KEY);
            self.write_str(T::TYPE_NAME);
            first = false;
        }

        if let Some(index) = hints.combine_index {
            self.begin_entry(first, COMBINE_INDEX_KEY);
            self.write_number(&index.to_string());
            first = false;
        }

        for resolved in plan.iter().filter(|m| m.included) {
            let Some(get) = members.get(resolved.slot).and_then(|m| m.get) else {
                continue;
            };
            // Only fields carry the combine index further down.
            let child_hints = Hints {
                force_type_hint: resolved.force_type_hint,
                combine_index: match resolved.kind {
                    MemberKind::Field => hints.combine_index,
                    MemberKind::Property => None,
                },
            };
            self.begin_entry(first, resolved.key);
            get(value, self, child_hints)?;
            first = false;
        }

        self.end_object();
        Ok(())
    }

    /// Write an enum as its name, or as its ordinal with `ENUMS_AS_INTS`.
    pub fn encode_enum<E: MappedEnum>(&mut self, value: E) {
        if self.options.enums_as_ints() {
            self.write_number(&value.ordinal().to_string());
        } else {
            self.write_str(value.name());
        }
    }

    pub(crate) fn element_hints(&self, hints: Hints, position: usize) -> Hints {
        Hints {
            force_type_hint: hints.force_type_hint,
            combine_index: self.options.combinable().then_some(position),
        }
    }
}

// ============================================================================
// Scalars
// ============================================================================

impl Encode for bool {
    fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
        encoder.write_bool(*self);
        Ok(())
    }
}

macro_rules! encode_integer {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
                    encoder.write_number(&self.to_string());
                    Ok(())
                }
            }
        )*
    };
}

encode_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Encode for f64 {
    fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
        if !self.is_finite() {
            return Err(EncodeError::UnsupportedType {
                type_name: "f64",
                detail: format!("{self} has no JSON representation"),
            });
        }
        encoder.write_number(&format_f64(*self));
        Ok(())
    }
}

impl Encode for f32 {
    fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
        if !self.is_finite() {
            return Err(EncodeError::UnsupportedType {
                type_name: "f32",
                detail: format!("{self} has no JSON representation"),
            });
        }
        encoder.write_number(&format_f32(*self));
        Ok(())
    }
}

impl Encode for BigDecimal {
    fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
        encoder.write_number(&self.to_string());
        Ok(())
    }
}

impl Encode for char {
    fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
        let mut buf = [0u8; 4];
        encoder.write_str(self.encode_utf8(&mut buf));
        Ok(())
    }
}

impl Encode for str {
    fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
        encoder.write_str(self);
        Ok(())
    }
}

impl Encode for String {
    fn encode(&self, encoder: &mut Encoder, _hints: Hints) -> Result<(), EncodeError> {
        encoder.write_str(self);
        Ok(())
    }
}

// ============================================================================
// Wrappers
// ============================================================================

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        match self {
            Some(value) => value.encode(encoder, hints),
            None => {
                encoder.write_null();
                Ok(())
            }
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        (**self).encode(encoder, hints)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        (**self).encode(encoder, hints)
    }
}

impl<T: Encode + ?Sized> Encode for Arc<T> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        (**self).encode(encoder, hints)
    }
}

// ============================================================================
// Lists, sets and maps
// ============================================================================

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_seq(self, hints)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_seq(self, hints)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_seq(self, hints)
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_seq(self, hints)
    }
}

impl<T: Encode, S: BuildHasher> Encode for HashSet<T, S> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_seq(self, hints)
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_seq(self, hints)
    }
}

impl<K: MapKey, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_map(self, hints)
    }
}

impl<K: MapKey, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_map(self, hints)
    }
}

impl<K: MapKey, V: Encode, S: BuildHasher> Encode for IndexMap<K, V, S> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        encoder.encode_map(self, hints)
    }
}

// ============================================================================
// Variant trees
// ============================================================================

/// Variants are written as-is: objects are plain maps, so no `@type` or
/// `@index` is ever injected.
impl Encode for Variant {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        match self {
            Variant::Null => encoder.write_null(),
            Variant::Boolean(b) => encoder.write_bool(*b),
            Variant::Number(n) => n.encode(encoder, hints)?,
            Variant::String(s) => encoder.write_str(s),
            Variant::Array(items) => encoder.encode_seq(items, hints)?,
            Variant::Object(map) => encoder.encode_map(map, hints)?,
        }
        Ok(())
    }
}

impl Encode for crate::number::Number {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        match self {
            crate::number::Number::Float(f) => f.encode(encoder, hints),
            other => {
                encoder.write_number(&other.to_string());
                Ok(())
            }
        }
    }
}
