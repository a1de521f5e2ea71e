//! Declarative helpers for building member tables and codec impls.

/// A [`Member`](crate::Member) descriptor for a plain struct field.
///
/// The field's type must implement [`Encode`](crate::Encode) and
/// [`Decode`](crate::Decode).
#[macro_export]
macro_rules! field {
    ($ty:ty, $name:ident) => {
        $crate::Member::<$ty>::field(
            stringify!($name),
            |this, encoder, hints| $crate::Encode::encode(&this.$name, encoder, hints),
            |this, variant| {
                this.$name = $crate::decode(variant)?;
                Ok(())
            },
        )
    };
}

/// A [`Member`](crate::Member) descriptor for an accessor pair.
///
/// `get` is a `fn(&T) -> V` and `set` a `fn(&mut T, V)`; omitting `set` makes
/// the property read-only.
///
/// ```
/// use variant_json::{property, Member};
///
/// #[derive(Default)]
/// struct Temperature {
///     kelvin: f64,
/// }
///
/// impl Temperature {
///     fn celsius(&self) -> f64 {
///         self.kelvin - 273.15
///     }
///
///     fn set_celsius(&mut self, value: f64) {
///         self.kelvin = value + 273.15;
///     }
/// }
///
/// const CELSIUS: Member<Temperature> =
///     property!(Temperature, "celsius", get = Temperature::celsius, set = Temperature::set_celsius);
/// assert!(CELSIUS.readable() && CELSIUS.writable());
/// ```
#[macro_export]
macro_rules! property {
    ($ty:ty, $name:literal, get = $get:path) => {
        $crate::Member::<$ty>::property(
            $name,
            Some(|this, encoder, hints| $crate::Encode::encode(&$get(this), encoder, hints)),
            None,
        )
    };
    ($ty:ty, $name:literal, get = $get:path, set = $set:path) => {
        $crate::Member::<$ty>::property(
            $name,
            Some(|this, encoder, hints| $crate::Encode::encode(&$get(this), encoder, hints)),
            Some(|this, variant| {
                $set(this, $crate::decode(variant)?);
                Ok(())
            }),
        )
    };
    ($ty:ty, $name:literal, set = $set:path) => {
        $crate::Member::<$ty>::property(
            $name,
            None,
            Some(|this, variant| {
                $set(this, $crate::decode(variant)?);
                Ok(())
            }),
        )
    };
}

/// Implement [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for a
/// [`Mapped`](crate::Mapped) type.
#[macro_export]
macro_rules! object_codec {
    ($ty:ty) => {
        impl $crate::Encode for $ty {
            fn encode(
                &self,
                encoder: &mut $crate::Encoder,
                hints: $crate::Hints,
            ) -> ::std::result::Result<(), $crate::EncodeError> {
                encoder.encode_object(self, hints)
            }
        }

        impl $crate::Decode for $ty {
            fn decode(variant: &$crate::Variant) -> ::std::result::Result<Self, $crate::DecodeError> {
                $crate::decode_object(variant)
            }

            fn default_value() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(<$ty as ::std::default::Default>::default())
            }
        }
    };
}

/// Implement [`Encode`](crate::Encode), [`Decode`](crate::Decode) and
/// [`MapKey`](crate::MapKey) for a [`MappedEnum`](crate::MappedEnum) type.
///
/// `null` decodes to the first variant.
#[macro_export]
macro_rules! enum_codec {
    ($ty:ty) => {
        impl $crate::Encode for $ty {
            fn encode(
                &self,
                encoder: &mut $crate::Encoder,
                _hints: $crate::Hints,
            ) -> ::std::result::Result<(), $crate::EncodeError> {
                encoder.encode_enum(*self);
                Ok(())
            }
        }

        impl $crate::Decode for $ty {
            fn decode(variant: &$crate::Variant) -> ::std::result::Result<Self, $crate::DecodeError> {
                $crate::decode_enum(variant)
            }

            fn default_value() -> ::std::option::Option<Self> {
                <$ty as $crate::MappedEnum>::VARIANTS
                    .first()
                    .map(|(_, variant)| *variant)
            }
        }

        impl $crate::MapKey for $ty {
            fn to_key(&self) -> ::std::string::String {
                <$ty as $crate::MappedEnum>::name(*self).to_string()
            }

            fn from_key(key: &str) -> ::std::result::Result<Self, $crate::DecodeError> {
                <$ty as $crate::MappedEnum>::from_name(key).ok_or_else(|| {
                    $crate::DecodeError::InvalidEnumValue {
                        target: <$ty as $crate::MappedEnum>::TYPE_NAME,
                        value: key.to_string(),
                    }
                })
            }
        }
    };
}
