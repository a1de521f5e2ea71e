//! Overlay merge of variant trees.
//!
//! [`combine`] folds a sequence of trees left to right, layering each one on
//! top of the result so far:
//!
//! - **Objects** merge key by key; keys missing from the base are copied over.
//! - **Arrays** align elements by their `@index` entry instead of position.
//!   Matching elements merge recursively, unmatched ones are appended, and
//!   incoming elements without an `@index` are dropped.
//! - **Scalars** of the same kind are replaced by the incoming value. `null`
//!   on either side is replaced by, or replaces, a scalar or another `null`.
//!
//! Any other pairing is a [`MergeError::ShapeMismatch`] carrying a JSON
//! pointer to the offending node.
//!
//! # Example
//! ```
//! use variant_json::{combine, load};
//!
//! let base = load(r#"{"people":[{"@index":0,"name":"Jenny"},{"@index":1,"name":"Frank"}]}"#).unwrap();
//! let patch = load(r#"{"people":[{"@index":1,"name":"Mike"}]}"#).unwrap();
//!
//! let merged = combine([base, patch]).unwrap();
//! assert_eq!(merged["people"][1]["name"].as_str(), Some("Mike"));
//! ```

use std::mem::discriminant;

use tracing::debug;

use crate::error::MergeError;
use crate::variant::{Variant, COMBINE_INDEX_KEY};

/// Merge every tree into the first one, in order.
pub fn combine<I>(variants: I) -> Result<Variant, MergeError>
where
    I: IntoIterator<Item = Variant>,
{
    let mut variants = variants.into_iter();
    let mut base = variants.next().ok_or(MergeError::Empty)?;
    for incoming in variants {
        merge_into(&mut base, incoming)?;
    }
    Ok(base)
}

/// Layer `incoming` on top of `base` in place.
pub(crate) fn merge_into(base: &mut Variant, incoming: Variant) -> Result<(), MergeError> {
    let mut path = String::new();
    merge_at(base, incoming, &mut path)
}

fn merge_at(base: &mut Variant, incoming: Variant, path: &mut String) -> Result<(), MergeError> {
    match (base, incoming) {
        (Variant::Object(base_map), Variant::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match base_map.get_mut(&key) {
                    Some(existing) => within(path, &key, |path| merge_at(existing, value, path))?,
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (Variant::Array(base_items), Variant::Array(incoming_items)) => {
            merge_arrays(base_items, incoming_items, path)
        }
        (slot, incoming)
            if (slot.is_null() && (incoming.is_null() || is_scalar(&incoming)))
                || (incoming.is_null() && is_scalar(slot))
                || (is_scalar(slot) && discriminant(&*slot) == discriminant(&incoming)) =>
        {
            *slot = incoming;
            Ok(())
        }
        (slot, incoming) => Err(MergeError::ShapeMismatch {
            path: path.clone(),
            base: slot.kind(),
            incoming: incoming.kind(),
        }),
    }
}

fn merge_arrays(
    base_items: &mut Vec<Variant>,
    incoming_items: Vec<Variant>,
    path: &mut String,
) -> Result<(), MergeError> {
    let mut base_indices = base_items
        .iter()
        .enumerate()
        .map(|(slot, candidate)| {
            combine_index(candidate).map_err(|found| MergeError::InvalidIndex {
                path: format!("{path}/{slot}/{COMBINE_INDEX_KEY}"),
                found,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (position, item) in incoming_items.into_iter().enumerate() {
        let index = combine_index(&item).map_err(|found| MergeError::InvalidIndex {
            path: format!("{path}/{position}/{COMBINE_INDEX_KEY}"),
            found,
        })?;
        let Some(index) = index else {
            debug!(path = %path, position, "dropping array element without @index");
            continue;
        };

        match base_indices.iter().position(|candidate| *candidate == Some(index)) {
            Some(slot) => {
                // Both sides already agree on the index; its spelling may differ.
                let mut item = item;
                if let Some(map) = item.as_object_mut() {
                    map.shift_remove(COMBINE_INDEX_KEY);
                }
                within(path, &slot.to_string(), |path| {
                    merge_at(&mut base_items[slot], item, path)
                })?;
            }
            None => {
                debug!(path = %path, index = %index, "appending array element");
                base_items.push(item);
                base_indices.push(Some(index));
            }
        }
    }
    Ok(())
}

/// The `@index` of an array element, if it is an object carrying one.
///
/// Fails with a description of the value when `@index` is not an integer.
fn combine_index(item: &Variant) -> Result<Option<i128>, String> {
    let Some(value) = item.get(COMBINE_INDEX_KEY) else {
        return Ok(None);
    };
    let index = match value {
        Variant::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Variant::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    index.map(Some).ok_or_else(|| match value.to_text() {
        Some(text) => format!("{} `{}`", value.kind(), text),
        None => value.kind().to_string(),
    })
}

fn is_scalar(variant: &Variant) -> bool {
    matches!(
        variant,
        Variant::Boolean(_) | Variant::Number(_) | Variant::String(_)
    )
}

/// Run `f` with `segment` appended to the JSON pointer `path`.
fn within<T>(path: &mut String, segment: &str, f: impl FnOnce(&mut String) -> T) -> T {
    let len = path.len();
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            _ => path.push(c),
        }
    }
    let result = f(path);
    path.truncate(len);
    result
}
