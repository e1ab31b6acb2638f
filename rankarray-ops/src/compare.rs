use core::cmp::Ordering;

use rankarray::{ArrayError, CompareError, NaturalOrder};

/// Three-way comparison as seen by the engines.
///
/// Any failure is already translated into the `ArrayError` the caller sees.
pub trait Comparer<T> {
    fn compare(&mut self, a: &T, b: &T) -> Result<Ordering, ArrayError>;

    fn less(&mut self, a: &T, b: &T) -> Result<bool, ArrayError> {
        Ok(self.compare(a, b)? == Ordering::Less)
    }
}

pub type CompareFn<'c, T> = &'c mut dyn FnMut(&T, &T) -> Result<Ordering, CompareError>;
pub type OrderingFn<'c, T> = &'c mut dyn FnMut(&T, &T) -> i32;

enum Mode<'c, T> {
    Natural(fn(&T, &T) -> Result<Ordering, CompareError>),
    Custom(CompareFn<'c, T>),
    Ordering(OrderingFn<'c, T>),
}

pub struct Comparison<'c, T> {
    mode: Mode<'c, T>,
}

impl<'c, T: NaturalOrder> Comparison<'c, T> {
    pub fn natural() -> Self {
        Comparison {
            mode: Mode::Natural(T::natural_cmp),
        }
    }

    pub fn new(custom: Option<CompareFn<'c, T>>) -> Self {
        match custom {
            Some(f) => Comparison::custom(f),
            None => Comparison::natural(),
        }
    }
}

impl<'c, T> Comparison<'c, T> {
    pub fn custom(f: CompareFn<'c, T>) -> Self {
        Comparison { mode: Mode::Custom(f) }
    }

    /// Adapts a function whose sign gives the relative order.
    pub fn ordering(f: OrderingFn<'c, T>) -> Self {
        Comparison { mode: Mode::Ordering(f) }
    }

    pub fn is_natural(&self) -> bool {
        matches!(self.mode, Mode::Natural(_))
    }
}

impl<'c, T> Comparer<T> for Comparison<'c, T> {
    fn compare(&mut self, a: &T, b: &T) -> Result<Ordering, ArrayError> {
        let result = match &mut self.mode {
            Mode::Natural(f) => f(a, b),
            Mode::Custom(f) => f(a, b),
            Mode::Ordering(f) => return Ok(f(a, b).cmp(&0)),
        };
        result.map_err(|error| {
            tracing::debug!(%error, "comparer failed");
            match error {
                CompareError::Unsupported { type_name } if self.is_natural() => {
                    ArrayError::UnsupportedCapability { type_name }
                }
                error => ArrayError::ComparerFailed(error.into()),
            }
        })
    }
}

/// Compares `(key, item)` pairs by key alone.
pub struct ByKey<C>(pub C);

impl<K, I, C: Comparer<K>> Comparer<(K, I)> for ByKey<C> {
    fn compare(&mut self, a: &(K, I), b: &(K, I)) -> Result<Ordering, ArrayError> {
        self.0.compare(&a.0, &b.0)
    }
}

impl<'r, T, C: Comparer<T> + ?Sized> Comparer<T> for &'r mut C {
    fn compare(&mut self, a: &T, b: &T) -> Result<Ordering, ArrayError> {
        (**self).compare(a, b)
    }
}

/// Turns a slot access that fell outside the range into a comparer failure.
pub(crate) fn in_range<T>(slot: Option<T>) -> Result<T, ArrayError> {
    slot.ok_or_else(|| {
        tracing::trace!("slot access outside range");
        ArrayError::inconsistent()
    })
}
