//! Rebuilds typed values from a [`Variant`] tree.
//!
//! Every target type implements [`Decode`]. The free function [`decode`]
//! handles `null` first (falling back to [`Decode::default_value`]) and hands
//! everything else to the impl. Scalars coerce loosely: numbers round into
//! integers, booleans become `1`/`0`, strings are parsed.
//!
//! Mapped objects go through [`decode_object`], which honours `@type` hints via
//! the [`registry`](crate::registry), assigns resolved members, then runs the
//! type's after-decode hooks.

use std::any::type_name;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

use crate::error::DecodeError;
use crate::member::{AfterDecode, Mapped, MappedEnum};
use crate::options::EncodeOptions;
use crate::registry;
use crate::resolver::{resolve, Direction};
use crate::variant::Variant;

/// A type that can be rebuilt from a [`Variant`].
pub trait Decode: Sized {
    /// Decode a non-null variant.
    fn decode(variant: &Variant) -> Result<Self, DecodeError>;

    /// The value a `null` decodes to; `None` makes `null` an error.
    fn default_value() -> Option<Self> {
        None
    }
}

/// Decode `variant` into `T`.
pub fn decode<T: Decode>(variant: &Variant) -> Result<T, DecodeError> {
    if variant.is_null() {
        return T::default_value().ok_or(DecodeError::UnexpectedNull {
            target: type_name::<T>(),
        });
    }
    T::decode(variant)
}

/// Converts map keys to and from their object-key text.
pub trait MapKey: Sized {
    fn to_key(&self) -> String;
    fn from_key(key: &str) -> Result<Self, DecodeError>;
}

fn describe(variant: &Variant) -> String {
    match variant.to_text() {
        Some(text) => format!("{} `{}`", variant.kind(), text),
        None => variant.kind().to_string(),
    }
}

fn conversion<T>(variant: &Variant) -> DecodeError {
    DecodeError::Conversion {
        target: type_name::<T>(),
        found: describe(variant),
    }
}

// ============================================================================
// Scalars
// ============================================================================

fn to_integer<T>(variant: &Variant) -> Result<i128, DecodeError> {
    let value = match variant {
        Variant::Number(n) => n.to_i128_rounded(),
        Variant::Boolean(b) => Some(i128::from(*b)),
        Variant::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    value.ok_or_else(|| conversion::<T>(variant))
}

macro_rules! decode_integer {
    ($($ty:ty),*) => {
        $(
            impl Decode for $ty {
                fn decode(variant: &Variant) -> Result<Self, DecodeError> {
                    let wide = to_integer::<$ty>(variant)?;
                    <$ty>::try_from(wide).map_err(|_| conversion::<$ty>(variant))
                }

                fn default_value() -> Option<Self> {
                    Some(0)
                }
            }

            impl MapKey for $ty {
                fn to_key(&self) -> String {
                    self.to_string()
                }

                fn from_key(key: &str) -> Result<Self, DecodeError> {
                    key.trim().parse().map_err(|_| DecodeError::Conversion {
                        target: type_name::<$ty>(),
                        found: format!("key `{key}`"),
                    })
                }
            }
        )*
    };
}

decode_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Decode for f64 {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        match variant {
            Variant::Number(n) => Ok(n.as_f64()),
            Variant::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Variant::String(s) => s.trim().parse().map_err(|_| conversion::<f64>(variant)),
            _ => Err(conversion::<f64>(variant)),
        }
    }

    fn default_value() -> Option<Self> {
        Some(0.0)
    }
}

impl Decode for f32 {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        f64::decode(variant)
            .map(|value| value as f32)
            .map_err(|_| conversion::<f32>(variant))
    }

    fn default_value() -> Option<Self> {
        Some(0.0)
    }
}

impl Decode for bool {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        match variant {
            Variant::Boolean(b) => Ok(*b),
            Variant::Number(n) => Ok(n.as_f64() != 0.0),
            Variant::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
            Variant::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(conversion::<bool>(variant)),
        }
    }

    fn default_value() -> Option<Self> {
        Some(false)
    }
}

impl MapKey for bool {
    fn to_key(&self) -> String {
        self.to_string()
    }

    fn from_key(key: &str) -> Result<Self, DecodeError> {
        bool::decode(&Variant::from(key))
    }
}

impl Decode for String {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        variant
            .to_text()
            .map(|text| text.into_owned())
            .ok_or_else(|| conversion::<String>(variant))
    }

    fn default_value() -> Option<Self> {
        Some(String::new())
    }
}

impl MapKey for String {
    fn to_key(&self) -> String {
        self.clone()
    }

    fn from_key(key: &str) -> Result<Self, DecodeError> {
        Ok(key.to_string())
    }
}

impl Decode for char {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        let decoded = match variant {
            Variant::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            Variant::Number(n) => n
                .as_u64()
                .and_then(|code| u32::try_from(code).ok())
                .and_then(char::from_u32),
            _ => None,
        };
        decoded.ok_or_else(|| conversion::<char>(variant))
    }

    fn default_value() -> Option<Self> {
        Some('\0')
    }
}

impl MapKey for char {
    fn to_key(&self) -> String {
        self.to_string()
    }

    fn from_key(key: &str) -> Result<Self, DecodeError> {
        char::decode(&Variant::from(key))
    }
}

impl Decode for BigDecimal {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        let decoded = match variant {
            Variant::Number(n) => n.to_decimal(),
            Variant::Boolean(b) => Some(BigDecimal::from(u8::from(*b))),
            Variant::String(s) => BigDecimal::from_str(s.trim()).ok(),
            _ => None,
        };
        decoded.ok_or_else(|| conversion::<BigDecimal>(variant))
    }

    fn default_value() -> Option<Self> {
        Some(BigDecimal::from(0))
    }
}

// ============================================================================
// Wrappers and trees
// ============================================================================

impl<T: Decode> Decode for Option<T> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        T::decode(variant).map(Some)
    }

    fn default_value() -> Option<Self> {
        Some(None)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        T::decode(variant).map(Box::new)
    }

    fn default_value() -> Option<Self> {
        T::default_value().map(Box::new)
    }
}

impl Decode for Variant {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        Ok(variant.clone())
    }

    fn default_value() -> Option<Self> {
        Some(Variant::Null)
    }
}

// ============================================================================
// Lists and sets
// ============================================================================

/// Decode every element of an array, tagging failures with their position.
pub(crate) fn decode_elements<T, C>(variant: &Variant, target: &'static str) -> Result<C, DecodeError>
where
    T: Decode,
    C: FromIterator<T>,
{
    let items = variant.as_array().ok_or(DecodeError::ExpectedArray {
        target,
        found: variant.kind(),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode(item).map_err(|e| e.in_element(i)))
        .collect()
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_elements(variant, type_name::<Self>())
    }

    fn default_value() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_elements(variant, type_name::<Self>())
    }

    fn default_value() -> Option<Self> {
        Some(VecDeque::new())
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        let items: Vec<T> = decode_elements(variant, type_name::<Self>())?;
        let found = items.len();
        items.try_into().map_err(|_| DecodeError::LengthMismatch {
            target: type_name::<Self>(),
            expected: N,
            found,
        })
    }
}

impl<T, S> Decode for HashSet<T, S>
where
    T: Decode + Eq + Hash,
    S: BuildHasher + Default,
{
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_elements(variant, type_name::<Self>())
    }

    fn default_value() -> Option<Self> {
        Some(HashSet::default())
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_elements(variant, type_name::<Self>())
    }

    fn default_value() -> Option<Self> {
        Some(BTreeSet::new())
    }
}

// ============================================================================
// Maps
// ============================================================================

fn decode_entries<K, V, C>(variant: &Variant, target: &'static str) -> Result<C, DecodeError>
where
    K: MapKey,
    V: Decode,
    C: FromIterator<(K, V)>,
{
    let map = variant.as_object().ok_or(DecodeError::ExpectedObject {
        target,
        found: variant.kind(),
    })?;
    map.iter()
        .map(|(key, value)| {
            let decoded_key = K::from_key(key).map_err(|e| e.in_member(target, key))?;
            let decoded_value = decode(value).map_err(|e| e.in_member(target, key))?;
            Ok((decoded_key, decoded_value))
        })
        .collect()
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_entries(variant, type_name::<Self>())
    }

    fn default_value() -> Option<Self> {
        Some(HashMap::default())
    }
}

impl<K: MapKey + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_entries(variant, type_name::<Self>())
    }

    fn default_value() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<K, V, S> Decode for IndexMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        decode_entries(variant, type_name::<Self>())
    }

    fn default_value() -> Option<Self> {
        Some(IndexMap::default())
    }
}

// ============================================================================
// Enums and mapped objects
// ============================================================================

/// Decode an enum from its name or its ordinal.
pub fn decode_enum<E: MappedEnum>(variant: &Variant) -> Result<E, DecodeError> {
    let decoded = match variant {
        Variant::String(s) => E::from_name(s),
        Variant::Number(n) => n.as_i64().and_then(E::from_ordinal),
        _ => None,
    };
    decoded.ok_or_else(|| DecodeError::InvalidEnumValue {
        target: E::TYPE_NAME,
        value: variant
            .to_text()
            .map(|text| text.into_owned())
            .unwrap_or_else(|| variant.kind().to_string()),
    })
}

/// Decode a mapped object, following its `@type` hint when it names another type.
pub fn decode_object<T: Mapped>(variant: &Variant) -> Result<T, DecodeError> {
    if !matches!(variant, Variant::Object(_)) {
        return Err(DecodeError::ExpectedObject {
            target: T::TYPE_NAME,
            found: variant.kind(),
        });
    }

    match variant.type_hint() {
        Some(hint) if hint != T::TYPE_NAME => registry::construct::<T>(hint, variant, T::TYPE_NAME),
        _ => decode_members(variant),
    }
}

/// Build a `T` from an object's entries without looking at its type hint.
pub(crate) fn decode_members<T: Mapped>(variant: &Variant) -> Result<T, DecodeError> {
    let map = variant.as_object().ok_or(DecodeError::ExpectedObject {
        target: T::TYPE_NAME,
        found: variant.kind(),
    })?;

    let plan = resolve::<T>(EncodeOptions::DEFAULT, Direction::Decode);
    let members = T::members();
    let mut instance = T::default();

    for resolved in plan.iter().filter(|m| m.included) {
        let Some(value) = map.get(resolved.key) else {
            continue;
        };
        let Some(set) = members.get(resolved.slot).and_then(|m| m.set) else {
            continue;
        };
        set(&mut instance, value).map_err(|e| e.in_member(T::TYPE_NAME, resolved.key))?;
    }

    for hook in T::after_decode_hooks() {
        match hook {
            AfterDecode::Plain(hook) => hook(&mut instance),
            AfterDecode::WithSource(hook) => hook(&mut instance, variant),
        }
    }

    Ok(instance)
}

/// Decode a trait-object style target whose concrete type comes from `@type`.
///
/// `B` is usually `Box<dyn Trait>`; concrete types are declared assignable to it
/// with [`register_as`](crate::register_as). `target` names the base in errors.
pub fn decode_polymorphic<B: 'static>(variant: &Variant, target: &'static str) -> Result<B, DecodeError> {
    let hint = polymorphic_hint(variant, target)?;
    let hint = hint.ok_or(DecodeError::MissingTypeHint { target })?;
    registry::construct::<B>(hint, variant, target)
}

/// Like [`decode_polymorphic`], but objects without a hint go to `fallback`.
pub fn decode_polymorphic_or<B: 'static>(
    variant: &Variant,
    target: &'static str,
    fallback: fn(&Variant) -> Result<B, DecodeError>,
) -> Result<B, DecodeError> {
    match polymorphic_hint(variant, target)? {
        Some(hint) => registry::construct::<B>(hint, variant, target),
        None => fallback(variant),
    }
}

fn polymorphic_hint<'a>(variant: &'a Variant, target: &'static str) -> Result<Option<&'a str>, DecodeError> {
    if !matches!(variant, Variant::Object(_)) {
        return Err(DecodeError::ExpectedObject {
            target,
            found: variant.kind(),
        });
    }
    Ok(variant.type_hint())
}
