//! Conversion between per-dimension indices and linear storage offsets.
//!
//! Storage is row-major: the last dimension varies fastest. Every dimension has
//! its own lower bound, which may be negative, so index `lb[d]` is the first
//! element of dimension `d` and `lb[d] + len[d] - 1` the last.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{ArrayError, ShapeMismatch};

/// Maps `indices` to a linear offset.
///
/// Fails with `RankMismatch` when the number of indices differs from the rank
/// and with `OutOfRange` when an index falls outside its dimension.
pub fn flatten(
    indices: &[isize],
    lengths: &[usize],
    lower_bounds: &[isize],
) -> Result<usize, ArrayError> {
    check_rank(lengths, lower_bounds)?;
    if indices.len() != lengths.len() {
        return Err(ArrayError::rank(lengths.len(), indices.len()));
    }

    let mut offset = 0usize;
    for ((&index, &length), &lower_bound) in indices.iter().zip(lengths).zip(lower_bounds) {
        let relative = index
            .checked_sub(lower_bound)
            .filter(|&r| r >= 0 && (r as usize) < length)
            .ok_or(ArrayError::OutOfRange { name: "indices", value: index })?;
        // The element count fits in usize, so no prefix of the offset overflows.
        offset = offset * length + relative as usize;
    }
    Ok(offset)
}

/// Inverse of `flatten`.
pub fn unflatten(
    offset: usize,
    lengths: &[usize],
    lower_bounds: &[isize],
) -> Result<Vec<isize>, ArrayError> {
    check_rank(lengths, lower_bounds)?;
    let count = lengths.iter().try_fold(1usize, |acc, &len| acc.checked_mul(len));
    if lengths.contains(&0) || count.is_some_and(|count| offset >= count) {
        return Err(ArrayError::OutOfRange {
            name: "offset",
            value: offset as isize,
        });
    }

    let mut indices = vec![0isize; lengths.len()];
    let mut remaining = offset;
    for d in (0..lengths.len()).rev() {
        let length = lengths[d];
        indices[d] = lower_bounds[d] + (remaining % length) as isize;
        remaining /= length;
    }
    Ok(indices)
}

fn check_rank(lengths: &[usize], lower_bounds: &[isize]) -> Result<(), ArrayError> {
    if lengths.len() != lower_bounds.len() {
        return Err(ArrayError::rank(lengths.len(), lower_bounds.len()));
    }
    if lengths.is_empty() {
        return Err(ArrayError::rank(1, 0));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    lengths: Vec<usize>,
    lower_bounds: Vec<isize>,
    count: usize,
}

impl Shape {
    pub fn new(lengths: Vec<usize>, lower_bounds: Vec<isize>) -> Result<Self, ArrayError> {
        check_rank(&lengths, &lower_bounds)?;

        let mut count = 1usize;
        for (dim, (&length, &lower_bound)) in lengths.iter().zip(&lower_bounds).enumerate() {
            // Searches report a miss as one below the lower bound.
            if lower_bound == isize::MIN {
                return Err(ArrayError::OutOfRange { name: "lower_bounds", value: lower_bound });
            }
            if isize::try_from(length).ok().and_then(|l| lower_bound.checked_add(l)).is_none() {
                return Err(ArrayError::InvalidRange {
                    offset: lower_bound,
                    length,
                    available: (isize::MAX as usize).saturating_sub(lower_bound.max(0) as usize),
                });
            }
            count = count
                .checked_mul(length)
                .filter(|&c| c <= isize::MAX as usize)
                .ok_or(ArrayError::OutOfRange { name: "lengths", value: dim as isize })?;
        }

        Ok(Shape {
            lengths,
            lower_bounds,
            count,
        })
    }

    pub fn vector(length: usize) -> Self {
        Shape {
            lengths: vec![length],
            lower_bounds: vec![0],
            count: length,
        }
    }

    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn lower_bounds(&self) -> &[isize] {
        &self.lower_bounds
    }

    pub fn length(&self, dim: usize) -> Result<usize, ArrayError> {
        self.lengths
            .get(dim)
            .copied()
            .ok_or(ArrayError::OutOfRange { name: "dimension", value: dim as isize })
    }

    pub fn lower_bound(&self, dim: usize) -> Result<isize, ArrayError> {
        self.lower_bounds
            .get(dim)
            .copied()
            .ok_or(ArrayError::OutOfRange { name: "dimension", value: dim as isize })
    }

    /// Last valid index of `dim`; one below the lower bound when the dimension
    /// is empty.
    pub fn upper_bound(&self, dim: usize) -> Result<isize, ArrayError> {
        // `new` keeps `lower_bound + length` representable and the lower bound
        // above `isize::MIN`.
        Ok(self.lower_bound(dim)? + self.length(dim)? as isize - 1)
    }

    /// One below the lower bound of `dim`, the index searches report for a miss.
    pub fn not_found(&self, dim: usize) -> Result<isize, ArrayError> {
        Ok(self.lower_bound(dim)? - 1)
    }

    pub fn flatten(&self, indices: &[isize]) -> Result<usize, ArrayError> {
        flatten(indices, &self.lengths, &self.lower_bounds)
    }

    pub fn unflatten(&self, offset: usize) -> Result<Vec<isize>, ArrayError> {
        unflatten(offset, &self.lengths, &self.lower_bounds)
    }

    pub fn require_vector(&self) -> Result<(), ArrayError> {
        match self.rank() {
            1 => Ok(()),
            found => Err(ArrayError::RankMismatch(ShapeMismatch::Rank { expected: 1, found })),
        }
    }
}
