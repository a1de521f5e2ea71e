//! # variant-json
//!
//! Maps between typed Rust values, a dynamically-typed JSON tree ([`Variant`])
//! and JSON text, and merges partial JSON documents on top of each other.
//!
//! Typed values describe their members once, in a static table, instead of
//! relying on runtime reflection. The encoder can embed a `@type` hint so that
//! polymorphic values decode back into the right concrete type, and a
//! `@index` per array element so that later documents can patch individual
//! elements through [`combine`].
//!
//! ## Quick start
//!
//! ```rust
//! use variant_json::{dump, field, from_str, object_codec, EncodeOptions, Mapped, Member};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Player {
//!     name: String,
//!     score: u32,
//! }
//!
//! impl Mapped for Player {
//!     const TYPE_NAME: &'static str = "game.Player";
//!
//!     fn members() -> &'static [Member<Self>] {
//!         const MEMBERS: &[Member<Player>] = &[field!(Player, name), field!(Player, score)];
//!         MEMBERS
//!     }
//! }
//! object_codec!(Player);
//!
//! let player = Player { name: "Alice".into(), score: 95 };
//! let json = dump(&player, EncodeOptions::NO_TYPE_HINTS).unwrap();
//! assert_eq!(json, r#"{"name":"Alice","score":95}"#);
//!
//! let back: Player = from_str(&json).unwrap();
//! assert_eq!(back, player);
//! ```
//!
//! ## Modules
//!
//! - [`variant`]: the `Variant` value tree
//! - [`number`]: numeric literals and the tiered numeric parser
//! - [`parse`]: JSON text → `Variant`
//! - [`member`]: member tables, modifiers and the `Mapped`/`MappedEnum` traits
//! - [`resolver`]: which members take part in an encode or decode
//! - [`encoder`]: typed values → JSON text
//! - [`decoder`]: `Variant` → typed values
//! - [`registry`]: `@type` name → constructor lookup
//! - [`array`]: fixed-rank rectangular arrays
//! - [`merge`]: overlay merge of variant trees
//! - [`error`]: error types

#[macro_use]
mod macros;

pub mod array;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod member;
pub mod merge;
pub mod number;
pub mod options;
pub mod parse;
pub mod registry;
pub mod resolver;
pub mod variant;

pub use array::{can_be_multi_rank_array, MultiArray};
pub use decoder::{
    decode, decode_enum, decode_object, decode_polymorphic, decode_polymorphic_or, Decode, MapKey,
};
pub use encoder::{encode, Encode, Encoder, Hints};
pub use error::{DecodeError, EncodeError, Error, MergeError, ParseError, Result};
pub use member::{AfterDecode, Mapped, MappedEnum, Member, MemberKind, Modifier, Visibility};
pub use merge::combine;
pub use number::Number;
pub use options::EncodeOptions;
pub use parse::load;
pub use registry::{is_registered, register, register_as, registered_type};
pub use resolver::{resolve, resolve_members, Direction, EncodableMember};
pub use variant::{Map, Variant, COMBINE_INDEX_KEY, TYPE_HINT_KEY};

/// Encode a value as JSON text; same as [`encode`].
pub fn dump<T: Encode + ?Sized>(value: &T, options: EncodeOptions) -> Result<String> {
    Ok(encode(value, options)?)
}

/// Parse JSON text and decode it into `T`.
pub fn from_str<T: Decode>(text: &str) -> Result<T> {
    let variant = load(text)?;
    Ok(decode(&variant)?)
}
