//! Mapping configuration.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Independently combinable encoder switches.
///
/// ```
/// use variant_json::EncodeOptions;
///
/// let options = EncodeOptions::PRETTY_PRINT | EncodeOptions::NO_TYPE_HINTS;
/// assert!(options.pretty_print());
/// assert!(!options.type_hints());
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EncodeOptions(u8);

impl EncodeOptions {
    pub const DEFAULT: Self = Self(0);
    /// Indent with tabs and break lines after brackets and commas.
    pub const PRETTY_PRINT: Self = Self(1 << 1);
    /// Don't write `@type` unless a member forces it.
    pub const NO_TYPE_HINTS: Self = Self(1 << 2);
    /// Include private fields by default.
    pub const ENCODE_PRIVATE: Self = Self(1 << 3);
    /// Skip member modifiers entirely; only the public/private rule applies.
    pub const IGNORE_MODIFIERS: Self = Self(1 << 4);
    /// Write an `@index` entry into every object that is an array element.
    pub const COMBINABLE: Self = Self(1 << 5);
    /// Write enums as their ordinal instead of their name.
    pub const ENUMS_AS_INTS: Self = Self(1 << 6);
    /// Include readable public properties by default.
    pub const INCLUDE_PUBLIC_PROPERTIES: Self = Self(1 << 7);

    /// Bits that influence member resolution; the resolver cache keys on these.
    pub(crate) const RESOLUTION_MASK: u8 =
        Self::ENCODE_PRIVATE.0 | Self::IGNORE_MODIFIERS.0 | Self::INCLUDE_PUBLIC_PROPERTIES.0;

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & !1)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn pretty_print(self) -> bool {
        self.contains(Self::PRETTY_PRINT)
    }

    pub const fn type_hints(self) -> bool {
        !self.contains(Self::NO_TYPE_HINTS)
    }

    pub const fn encode_private(self) -> bool {
        self.contains(Self::ENCODE_PRIVATE)
    }

    pub const fn ignore_modifiers(self) -> bool {
        self.contains(Self::IGNORE_MODIFIERS)
    }

    pub const fn combinable(self) -> bool {
        self.contains(Self::COMBINABLE)
    }

    pub const fn enums_as_ints(self) -> bool {
        self.contains(Self::ENUMS_AS_INTS)
    }

    pub const fn include_public_properties(self) -> bool {
        self.contains(Self::INCLUDE_PUBLIC_PROPERTIES)
    }
}

impl BitOr for EncodeOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for EncodeOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(EncodeOptions, &str); 7] = [
            (EncodeOptions::PRETTY_PRINT, "PRETTY_PRINT"),
            (EncodeOptions::NO_TYPE_HINTS, "NO_TYPE_HINTS"),
            (EncodeOptions::ENCODE_PRIVATE, "ENCODE_PRIVATE"),
            (EncodeOptions::IGNORE_MODIFIERS, "IGNORE_MODIFIERS"),
            (EncodeOptions::COMBINABLE, "COMBINABLE"),
            (EncodeOptions::ENUMS_AS_INTS, "ENUMS_AS_INTS"),
            (EncodeOptions::INCLUDE_PUBLIC_PROPERTIES, "INCLUDE_PUBLIC_PROPERTIES"),
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            f.write_str("EncodeOptions(DEFAULT)")
        } else {
            write!(f, "EncodeOptions({})", set.join(" | "))
        }
    }
}
