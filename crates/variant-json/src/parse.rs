//! JSON text → [`Variant`].
//!
//! Tokenizing is delegated to `serde_json`; with its `arbitrary_precision`
//! feature every number reaches [`Number::parse`](crate::Number::parse) as the
//! literal text, so the tiered numeric policy sees exactly what was written.

use crate::error::ParseError;
use crate::variant::Variant;

/// Parse JSON text into a variant tree.
///
/// `@type` and `@index` are ordinary keys at this stage.
pub fn load(text: &str) -> Result<Variant, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(Variant::from(value))
}
