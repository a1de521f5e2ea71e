//! Static member tables describing how a type maps to and from JSON objects.
//!
//! Each mapped type lists its fields and properties once, as a table of
//! [`Member`] descriptors with accessor functions and declared [`Modifier`]s.
//! The [`resolver`](crate::resolver) turns that table plus an
//! [`EncodeOptions`](crate::EncodeOptions) into the members that actually
//! take part in an encode or decode.
//!
//! ```
//! use variant_json::{field, object_codec, Mapped, Member, Modifier};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     cached_len: f64,
//! }
//!
//! impl Mapped for Point {
//!     const TYPE_NAME: &'static str = "geometry.Point";
//!
//!     fn members() -> &'static [Member<Self>] {
//!         const MEMBERS: &[Member<Point>] = &[
//!             field!(Point, x),
//!             field!(Point, y).with(&[Modifier::Alias("Y")]),
//!             field!(Point, cached_len).with(&[Modifier::Exclude]),
//!         ];
//!         MEMBERS
//!     }
//! }
//! object_codec!(Point);
//! ```

use crate::encoder::{Encoder, Hints};
use crate::error::{DecodeError, EncodeError};
use crate::variant::Variant;

/// Writes one member's value.
pub type EncodeFn<T> = fn(&T, &mut Encoder, Hints) -> Result<(), EncodeError>;

/// Decodes a variant and stores it into one member.
pub type DecodeFn<T> = fn(&mut T, &Variant) -> Result<(), DecodeError>;

/// A declarative per-member directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Never map this member; stops evaluation of later modifiers.
    Exclude,
    /// Map this member even if the default rules would skip it.
    Include,
    /// Use this key instead of the member name.
    Alias(&'static str),
    /// Always write `@type` into this member's object value.
    ForceTypeHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Plain stored data; included by default when public.
    Field,
    /// Accessor pair; only included on request.
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// One entry in a type's member table.
pub struct Member<T: 'static> {
    pub name: &'static str,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub modifiers: &'static [Modifier],
    pub(crate) get: Option<EncodeFn<T>>,
    pub(crate) set: Option<DecodeFn<T>>,
}

impl<T: 'static> Member<T> {
    /// A public field. Fields are always readable and writable.
    pub const fn field(name: &'static str, get: EncodeFn<T>, set: DecodeFn<T>) -> Self {
        Self {
            name,
            kind: MemberKind::Field,
            visibility: Visibility::Public,
            modifiers: &[],
            get: Some(get),
            set: Some(set),
        }
    }

    /// A public property; a missing getter or setter makes it write- or read-only.
    pub const fn property(
        name: &'static str,
        get: Option<EncodeFn<T>>,
        set: Option<DecodeFn<T>>,
    ) -> Self {
        Self {
            name,
            kind: MemberKind::Property,
            visibility: Visibility::Public,
            modifiers: &[],
            get,
            set,
        }
    }

    #[must_use]
    pub const fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Attach modifiers, evaluated in the given order.
    #[must_use]
    pub const fn with(mut self, modifiers: &'static [Modifier]) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub const fn readable(&self) -> bool {
        self.get.is_some()
    }

    pub const fn writable(&self) -> bool {
        self.set.is_some()
    }
}

/// A post-decode callback, run after every member has been assigned.
pub enum AfterDecode<T: 'static> {
    Plain(fn(&mut T)),
    /// Receives the object the instance was decoded from.
    WithSource(fn(&mut T, &Variant)),
}

/// A struct-like type with a static member table.
///
/// `Default` stands in for "allocate without running constructors": decoding
/// starts from `T::default()` and only overwrites members present in the input.
pub trait Mapped: Default + 'static {
    /// Fully-qualified name written as the `@type` hint.
    const TYPE_NAME: &'static str;

    fn members() -> &'static [Member<Self>];

    /// Called right before this value's members are written.
    fn before_encode(&self) {}

    /// Callbacks run in order once decoding has assigned every member.
    fn after_decode_hooks() -> &'static [AfterDecode<Self>] {
        &[]
    }
}

/// A field-less enum mapped by name, or by ordinal with
/// [`EncodeOptions::ENUMS_AS_INTS`](crate::EncodeOptions::ENUMS_AS_INTS).
pub trait MappedEnum: Copy + PartialEq + 'static {
    const TYPE_NAME: &'static str;

    /// Every variant with its name, in declaration order.
    const VARIANTS: &'static [(&'static str, Self)];

    fn ordinal(self) -> i64;

    fn name(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, variant)| *variant == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }

    /// Match a variant name exactly, or an ordinal written as digits.
    fn from_name(text: &str) -> Option<Self> {
        if let Some((_, variant)) = Self::VARIANTS.iter().find(|(name, _)| *name == text) {
            return Some(*variant);
        }
        let ordinal = text.trim().parse::<i64>().ok()?;
        Self::from_ordinal(ordinal)
    }

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .map(|(_, variant)| *variant)
            .find(|variant| variant.ordinal() == ordinal)
    }
}
