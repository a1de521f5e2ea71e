//! Rectangular arrays of a fixed rank.
//!
//! A [`MultiArray`] encodes as one level of `[...]` per rank, visited in
//! row-major order, and only decodes from perfectly regular nested arrays.

use std::any::type_name;
use std::ops::{Index, IndexMut};

use crate::decoder::{decode, Decode};
use crate::encoder::{Encode, Encoder, Hints};
use crate::error::{DecodeError, EncodeError};
use crate::variant::Variant;

/// A `RANK`-dimensional array stored in row-major order.
///
/// ```
/// use variant_json::{encode, EncodeOptions, MultiArray};
///
/// let grid = MultiArray::from_fn([2, 3], |[row, col]| row * 3 + col + 1);
/// assert_eq!(grid[[1, 2]], 6);
/// assert_eq!(encode(&grid, EncodeOptions::DEFAULT).unwrap(), "[[1,2,3],[4,5,6]]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MultiArray<T, const RANK: usize> {
    dims: [usize; RANK],
    data: Vec<T>,
}

impl<T, const RANK: usize> MultiArray<T, RANK> {
    /// An array of the given dimensions filled with `T::default()`.
    pub fn new(dims: [usize; RANK]) -> Self
    where
        T: Default + Clone,
    {
        Self {
            dims,
            data: vec![T::default(); element_count(&dims)],
        }
    }

    /// Build every element from its index.
    pub fn from_fn(dims: [usize; RANK], mut f: impl FnMut([usize; RANK]) -> T) -> Self {
        let data = (0..element_count(&dims))
            .map(|flat| f(unflatten(&dims, flat)))
            .collect();
        Self { dims, data }
    }

    /// Wrap row-major `data`; `None` when its length doesn't match `dims`.
    pub fn from_vec(dims: [usize; RANK], data: Vec<T>) -> Option<Self> {
        (data.len() == element_count(&dims)).then_some(Self { dims, data })
    }

    pub fn dims(&self) -> [usize; RANK] {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: [usize; RANK]) -> Option<&T> {
        let offset = self.offset(index)?;
        self.data.get(offset)
    }

    pub fn get_mut(&mut self, index: [usize; RANK]) -> Option<&mut T> {
        let offset = self.offset(index)?;
        self.data.get_mut(offset)
    }

    /// Elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn offset(&self, index: [usize; RANK]) -> Option<usize> {
        let mut offset = 0;
        for (i, dim) in index.iter().zip(self.dims.iter()) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }

    /// Decode and require exactly `dims`.
    pub fn decode_shaped(variant: &Variant, dims: [usize; RANK]) -> Result<Self, DecodeError>
    where
        T: Decode,
    {
        let array = decode::<Self>(variant)?;
        if array.dims != dims {
            return Err(DecodeError::MultiRankShapeMismatch {
                target: type_name::<Self>(),
                rank: RANK,
            });
        }
        Ok(array)
    }
}

fn element_count(dims: &[usize]) -> usize {
    dims.iter().product()
}

fn unflatten<const RANK: usize>(dims: &[usize; RANK], mut flat: usize) -> [usize; RANK] {
    let mut index = [0; RANK];
    for (slot, dim) in index.iter_mut().zip(dims.iter()).rev() {
        *slot = flat % dim;
        flat /= dim;
    }
    index
}

impl<T, const RANK: usize> Index<[usize; RANK]> for MultiArray<T, RANK> {
    type Output = T;

    fn index(&self, index: [usize; RANK]) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {index:?} out of bounds for dimensions {:?}", self.dims),
        }
    }
}

impl<T, const RANK: usize> IndexMut<[usize; RANK]> for MultiArray<T, RANK> {
    fn index_mut(&mut self, index: [usize; RANK]) -> &mut T {
        let dims = self.dims;
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index {index:?} out of bounds for dimensions {dims:?}"),
        }
    }
}

impl<'a, T, const RANK: usize> IntoIterator for &'a MultiArray<T, RANK> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Check that `variant` is a regular nested array `dims.len()` levels deep and
/// record the length found at each level.
///
/// Every node at a given depth must have the same number of children. An
/// empty array leaves the deeper dimensions at zero.
pub fn can_be_multi_rank_array(variant: &Variant, dims: &mut [usize]) -> bool {
    if dims.is_empty() {
        return false;
    }
    let mut seen = vec![None; dims.len()];
    if !check_level(variant, 0, &mut seen) {
        return false;
    }
    for (dim, found) in dims.iter_mut().zip(seen) {
        *dim = found.unwrap_or(0);
    }
    true
}

fn check_level(node: &Variant, depth: usize, seen: &mut [Option<usize>]) -> bool {
    let Some(items) = node.as_array() else {
        return false;
    };
    match seen[depth] {
        Some(expected) if expected != items.len() => return false,
        Some(_) => {}
        None => seen[depth] = Some(items.len()),
    }
    if depth + 1 == seen.len() {
        return true;
    }
    items.iter().all(|child| check_level(child, depth + 1, seen))
}

impl<T: Encode, const RANK: usize> MultiArray<T, RANK> {
    fn encode_level(
        &self,
        encoder: &mut Encoder,
        hints: Hints,
        depth: usize,
        prefix: usize,
    ) -> Result<(), EncodeError> {
        let dim = self.dims[depth];
        if dim == 0 {
            encoder.write_empty_array();
            return Ok(());
        }

        encoder.begin_array();
        for i in 0..dim {
            let offset = prefix * dim + i;
            encoder.begin_element(i == 0);
            if depth + 1 == RANK {
                let item_hints = encoder.element_hints(hints, i);
                self.data[offset].encode(encoder, item_hints)?;
            } else {
                self.encode_level(encoder, hints, depth + 1, offset)?;
            }
        }
        encoder.end_array();
        Ok(())
    }
}

impl<T: Encode, const RANK: usize> Encode for MultiArray<T, RANK> {
    fn encode(&self, encoder: &mut Encoder, hints: Hints) -> Result<(), EncodeError> {
        if RANK == 0 {
            return match self.data.first() {
                Some(item) => item.encode(encoder, hints),
                None => {
                    encoder.write_null();
                    Ok(())
                }
            };
        }
        self.encode_level(encoder, hints, 0, 0)
    }
}

impl<T: Decode, const RANK: usize> Decode for MultiArray<T, RANK> {
    fn decode(variant: &Variant) -> Result<Self, DecodeError> {
        let target = type_name::<Self>();
        if !matches!(variant, Variant::Array(_)) {
            return Err(DecodeError::ExpectedArray {
                target,
                found: variant.kind(),
            });
        }

        let mut dims = [0; RANK];
        if !can_be_multi_rank_array(variant, &mut dims) {
            return Err(DecodeError::MultiRankShapeMismatch { target, rank: RANK });
        }

        let mut data = Vec::with_capacity(element_count(&dims));
        collect_leaves(variant, RANK, &mut data)?;
        Ok(Self { dims, data })
    }

    fn default_value() -> Option<Self> {
        Some(Self {
            dims: [0; RANK],
            data: Vec::new(),
        })
    }
}

fn collect_leaves<T: Decode>(node: &Variant, levels: usize, out: &mut Vec<T>) -> Result<(), DecodeError> {
    let items = node.as_array().map(Vec::as_slice).unwrap_or_default();
    for item in items {
        if levels == 1 {
            let position = out.len();
            out.push(decode(item).map_err(|e| e.in_element(position))?);
        } else {
            collect_leaves(item, levels - 1, out)?;
        }
    }
    Ok(())
}
