//! Error types for parsing, encoding, decoding and merging.
//!
//! Each pipeline stage has its own error enum so callers can tell a malformed
//! document apart from a mapping failure. [`Error`] unifies them for the
//! convenience entry points in the crate root.

use thiserror::Error;

/// The input text was not valid JSON.
#[derive(Error, Debug)]
#[error("JSON parse error: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// Errors raised while turning a value into JSON text.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The value has no JSON representation (e.g. `NaN` or an infinite float).
    #[error("cannot encode value of type `{type_name}`: {detail}")]
    UnsupportedType {
        type_name: &'static str,
        detail: String,
    },
}

/// Errors raised while rebuilding a typed value from a [`Variant`](crate::Variant).
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("expected an object when decoding `{target}`, found {found}")]
    ExpectedObject {
        target: &'static str,
        found: &'static str,
    },

    #[error("expected an array when decoding `{target}`, found {found}")]
    ExpectedArray {
        target: &'static str,
        found: &'static str,
    },

    #[error("`{value}` is not a valid value of enum `{target}`")]
    InvalidEnumValue { target: &'static str, value: String },

    /// Nested arrays were irregular, too shallow, or did not have the requested dimensions.
    #[error("JSON data does not fit a rank-{rank} array of `{target}`")]
    MultiRankShapeMismatch { target: &'static str, rank: usize },

    #[error("could not resolve type hint `{hint}`")]
    UnknownTypeHint { hint: String },

    #[error("type `{hint}` is not assignable to `{target}`")]
    TypeHintNotAssignable { hint: String, target: &'static str },

    /// A trait-object target was decoded from an object without a usable `@type`.
    #[error("`{target}` needs a type hint to choose a concrete type")]
    MissingTypeHint { target: &'static str },

    #[error("cannot convert {found} into `{target}`")]
    Conversion { target: &'static str, found: String },

    #[error("null cannot be decoded into `{target}`")]
    UnexpectedNull { target: &'static str },

    #[error("expected {expected} elements for `{target}`, found {found}")]
    LengthMismatch {
        target: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("in member `{key}` of `{target}`: {source}")]
    Member {
        target: &'static str,
        key: String,
        #[source]
        source: Box<DecodeError>,
    },

    #[error("in element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// The innermost error, with member and element context peeled off.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Member { source, .. } | DecodeError::Element { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    pub(crate) fn in_member(self, target: &'static str, key: &str) -> Self {
        DecodeError::Member {
            target,
            key: key.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_element(self, index: usize) -> Self {
        DecodeError::Element {
            index,
            source: Box::new(self),
        }
    }
}

/// Errors raised by the merge engine.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("nothing to combine")]
    Empty,

    #[error("cannot merge {incoming} into {base} at `{path}`")]
    ShapeMismatch {
        path: String,
        base: &'static str,
        incoming: &'static str,
    },

    #[error("`@index` at `{path}` must be an integer, found {found}")]
    InvalidIndex { path: String, found: String },
}

/// Any failure from the crate's top-level entry points.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Convenience alias used by the crate-level helpers.
pub type Result<T> = std::result::Result<T, Error>;
