use alloc::string::String;

/// Failure reported by a comparator or by an element's natural ordering.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum CompareError {
    #[error("type `{type_name}` has no natural ordering")]
    Unsupported { type_name: String },

    #[error("cannot compare a `{left}` with a `{right}`")]
    Mismatch { left: String, right: String },

    #[error("{0}")]
    Failed(String),
}

/// Why a sort or search gave up on its comparator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparerFailure {
    #[error(transparent)]
    Raised(#[from] CompareError),

    #[error("inconsistent results drove an access outside the range")]
    Inconsistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShapeMismatch {
    #[error("expected rank {expected}, found rank {found}")]
    Rank { expected: usize, found: usize },

    #[error("keys start at {keys} but items start at {items}")]
    LowerBound { keys: isize, items: isize },
}

/// Sort and reverse may leave their range in an intermediate permutation when
/// they fail part way through; no element is ever lost or duplicated. Searches
/// never mutate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ArrayError {
    #[error("required argument `{name}` is null")]
    NullArgument { name: &'static str },

    #[error("argument `{name}` is out of range: {value}")]
    OutOfRange { name: &'static str, value: isize },

    #[error("rank mismatch: {0}")]
    RankMismatch(ShapeMismatch),

    #[error("offset {offset} and length {length} exceed the {available} available elements")]
    InvalidRange {
        offset: isize,
        length: usize,
        available: usize,
    },

    #[error("comparer failed: {0}")]
    ComparerFailed(#[source] ComparerFailure),

    #[error("element type `{type_name}` has no natural ordering")]
    UnsupportedCapability { type_name: String },

    #[error("expected a value of type `{expected}`, found `{found}`")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("arrays have different lengths: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

impl ArrayError {
    pub fn rank(expected: usize, found: usize) -> Self {
        ArrayError::RankMismatch(ShapeMismatch::Rank { expected, found })
    }

    pub fn inconsistent() -> Self {
        ArrayError::ComparerFailed(ComparerFailure::Inconsistent)
    }

    pub fn is_comparer_failure(&self) -> bool {
        matches!(self, ArrayError::ComparerFailed(_))
    }
}
