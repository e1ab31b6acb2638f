//! Ranges are `(index, length)` pairs. Searches report indices relative to
//! the slice and `-1` when nothing matches.

use alloc::vec::Vec;
use core::cmp::Ordering;

use rankarray::{
    ArrayError, CompareError, NaturalOrder, Parallel, StructuralEq, TypedView, TypedViewMut,
};

use crate::compare::{ByKey, Comparer, Comparison};
use crate::{introsort, search};

fn invalid_range(index: usize, length: usize, available: usize) -> ArrayError {
    ArrayError::InvalidRange {
        offset: index as isize,
        length,
        available,
    }
}

fn range_mut<T>(
    slice: &mut [T],
    index: usize,
    length: usize,
) -> Result<TypedViewMut<'_, T>, ArrayError> {
    let available = slice.len();
    TypedViewMut::from_slice(slice)
        .range(index, length)
        .ok_or(invalid_range(index, length, available))
}

fn range<T>(slice: &[T], index: usize, length: usize) -> Result<TypedView<'_, T>, ArrayError> {
    TypedView::from_slice(slice)
        .range(index, length)
        .ok_or(invalid_range(index, length, slice.len()))
}

fn to_index(found: Option<usize>, base: usize) -> isize {
    found.map_or(-1, |i| (base + i) as isize)
}

fn sort_in<T: Clone>(
    slice: &mut [T],
    index: usize,
    length: usize,
    mut cmp: Comparison<'_, T>,
) -> Result<(), ArrayError> {
    introsort::sort(&mut range_mut(slice, index, length)?, &mut cmp)
}

pub fn sort<T: NaturalOrder + Clone>(slice: &mut [T]) -> Result<(), ArrayError> {
    let len = slice.len();
    sort_in(slice, 0, len, Comparison::natural())
}

pub fn sort_range<T: NaturalOrder + Clone>(
    slice: &mut [T],
    index: usize,
    length: usize,
) -> Result<(), ArrayError> {
    sort_in(slice, index, length, Comparison::natural())
}

pub fn sort_by<T, F>(slice: &mut [T], mut compare: F) -> Result<(), ArrayError>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<Ordering, CompareError>,
{
    let len = slice.len();
    sort_in(slice, 0, len, Comparison::custom(&mut compare))
}

pub fn sort_range_by<T, F>(
    slice: &mut [T],
    index: usize,
    length: usize,
    mut compare: F,
) -> Result<(), ArrayError>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<Ordering, CompareError>,
{
    sort_in(slice, index, length, Comparison::custom(&mut compare))
}

/// Sorts with a function whose sign gives the relative order of two elements.
pub fn sort_by_ordering<T, F>(slice: &mut [T], mut ordering: F) -> Result<(), ArrayError>
where
    T: Clone,
    F: FnMut(&T, &T) -> i32,
{
    let len = slice.len();
    sort_in(slice, 0, len, Comparison::ordering(&mut ordering))
}

fn sort_pair_with<K: Clone, I: Clone>(
    keys: &mut [K],
    items: Option<&mut [I]>,
    index: usize,
    length: usize,
    cmp: Comparison<'_, K>,
) -> Result<(), ArrayError> {
    let Some(items) = items else {
        return sort_in(keys, index, length, cmp);
    };
    let keys = range_mut(keys, index, length)?;
    let items = range_mut(items, index, length)?;
    let mut pair = Parallel::new(keys, items).ok_or(invalid_range(index, length, length))?;
    introsort::sort(&mut pair, &mut ByKey(cmp))
}

/// Sorts `keys`, applying every move to `items` as well. `items` may be longer
/// than `keys`.
pub fn sort_pair<K, I>(keys: &mut [K], items: Option<&mut [I]>) -> Result<(), ArrayError>
where
    K: NaturalOrder + Clone,
    I: Clone,
{
    let len = keys.len();
    sort_pair_with(keys, items, 0, len, Comparison::natural())
}

pub fn sort_pair_range<K, I>(
    keys: &mut [K],
    items: Option<&mut [I]>,
    index: usize,
    length: usize,
) -> Result<(), ArrayError>
where
    K: NaturalOrder + Clone,
    I: Clone,
{
    sort_pair_with(keys, items, index, length, Comparison::natural())
}

pub fn sort_pair_by<K, I, F>(
    keys: &mut [K],
    items: Option<&mut [I]>,
    mut compare: F,
) -> Result<(), ArrayError>
where
    K: Clone,
    I: Clone,
    F: FnMut(&K, &K) -> Result<Ordering, CompareError>,
{
    let len = keys.len();
    sort_pair_with(keys, items, 0, len, Comparison::custom(&mut compare))
}

fn binary_search_with<T: Clone>(
    slice: &[T],
    index: usize,
    length: usize,
    value: &T,
    cmp: &mut impl Comparer<T>,
) -> Result<isize, ArrayError> {
    let found = search::binary_search(&range(slice, index, length)?, value, cmp)?;
    Ok(search::encode(found, index as isize))
}

/// Searches a sorted slice. Returns the index of a match, or the bitwise
/// complement of the index of the first element greater than `value`.
pub fn binary_search<T: NaturalOrder + Clone>(slice: &[T], value: &T) -> Result<isize, ArrayError> {
    binary_search_with(slice, 0, slice.len(), value, &mut Comparison::natural())
}

pub fn binary_search_range<T: NaturalOrder + Clone>(
    slice: &[T],
    index: usize,
    length: usize,
    value: &T,
) -> Result<isize, ArrayError> {
    binary_search_with(slice, index, length, value, &mut Comparison::natural())
}

pub fn binary_search_by<T, F>(slice: &[T], value: &T, mut compare: F) -> Result<isize, ArrayError>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<Ordering, CompareError>,
{
    binary_search_with(slice, 0, slice.len(), value, &mut Comparison::custom(&mut compare))
}

pub fn index_of<T: StructuralEq>(slice: &[T], value: &T) -> isize {
    to_index(slice.iter().position(|e| e.structural_eq(value)), 0)
}

pub fn index_of_range<T: StructuralEq>(
    slice: &[T],
    value: &T,
    start: usize,
    count: usize,
) -> Result<isize, ArrayError> {
    let window = check_forward(slice.len(), start, count)?;
    Ok(to_index(slice[window].iter().position(|e| e.structural_eq(value)), start))
}

pub fn last_index_of<T: StructuralEq>(slice: &[T], value: &T) -> isize {
    to_index(slice.iter().rposition(|e| e.structural_eq(value)), 0)
}

/// Last index of `value` among the `count` elements ending at `start`.
///
/// An empty slice only accepts a `start` of `-1` or `0` and a `count` of `0`.
pub fn last_index_of_range<T: StructuralEq>(
    slice: &[T],
    value: &T,
    start: isize,
    count: usize,
) -> Result<isize, ArrayError> {
    if slice.is_empty() {
        if start != -1 && start != 0 {
            return Err(ArrayError::OutOfRange { name: "start_index", value: start });
        }
        if count != 0 {
            return Err(ArrayError::OutOfRange { name: "count", value: count as isize });
        }
        return Ok(-1);
    }
    let first = check_backward(slice.len(), start, count)?;
    let found = slice[first..first + count].iter().rposition(|e| e.structural_eq(value));
    Ok(to_index(found, first))
}

fn check_forward(
    len: usize,
    start: usize,
    count: usize,
) -> Result<core::ops::Range<usize>, ArrayError> {
    if start > len {
        return Err(ArrayError::OutOfRange { name: "start_index", value: start as isize });
    }
    if count > len - start {
        return Err(ArrayError::OutOfRange { name: "count", value: count as isize });
    }
    Ok(start..start + count)
}

/// First index of the `count` elements ending at `start` in a non-empty slice.
fn check_backward(len: usize, start: isize, count: usize) -> Result<usize, ArrayError> {
    let last = usize::try_from(start)
        .ok()
        .filter(|&s| s < len)
        .ok_or(ArrayError::OutOfRange { name: "start_index", value: start })?;
    if count > last + 1 {
        return Err(ArrayError::OutOfRange { name: "count", value: count as isize });
    }
    Ok(last + 1 - count)
}

pub fn reverse<T: Clone>(slice: &mut [T]) -> Result<(), ArrayError> {
    let len = slice.len();
    reverse_range(slice, 0, len)
}

pub fn reverse_range<T: Clone>(
    slice: &mut [T],
    index: usize,
    length: usize,
) -> Result<(), ArrayError> {
    crate::reverse::reverse(&mut range_mut(slice, index, length)?)
}

pub fn find<T: Clone, P: FnMut(&T) -> bool>(slice: &[T], mut pred: P) -> Option<T> {
    slice.iter().find(|e| pred(e)).cloned()
}

pub fn find_range<T, P>(
    slice: &[T],
    start: usize,
    count: usize,
    mut pred: P,
) -> Result<Option<T>, ArrayError>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    let window = check_forward(slice.len(), start, count)?;
    Ok(slice[window].iter().find(|e| pred(e)).cloned())
}

pub fn find_last<T: Clone, P: FnMut(&T) -> bool>(slice: &[T], mut pred: P) -> Option<T> {
    slice.iter().rev().find(|e| pred(e)).cloned()
}

pub fn find_last_range<T, P>(
    slice: &[T],
    start: isize,
    count: usize,
    mut pred: P,
) -> Result<Option<T>, ArrayError>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    let window = check_find_backward(slice.len(), start, count)?;
    Ok(slice[window].iter().rev().find(|e| pred(e)).cloned())
}

pub fn find_index<T, P: FnMut(&T) -> bool>(slice: &[T], pred: P) -> isize {
    to_index(slice.iter().position(pred), 0)
}

pub fn find_index_range<T, P>(
    slice: &[T],
    start: usize,
    count: usize,
    pred: P,
) -> Result<isize, ArrayError>
where
    P: FnMut(&T) -> bool,
{
    let window = check_forward(slice.len(), start, count)?;
    Ok(to_index(slice[window].iter().position(pred), start))
}

pub fn find_last_index<T, P: FnMut(&T) -> bool>(slice: &[T], pred: P) -> isize {
    to_index(slice.iter().rposition(pred), 0)
}

pub fn find_last_index_range<T, P>(
    slice: &[T],
    start: isize,
    count: usize,
    pred: P,
) -> Result<isize, ArrayError>
where
    P: FnMut(&T) -> bool,
{
    let window = check_find_backward(slice.len(), start, count)?;
    let first = window.start;
    Ok(to_index(slice[window].iter().rposition(pred), first))
}

/// The `count` elements ending at `start`. An empty slice only accepts a
/// `start` of `-1`, and then a `count` of `0`.
fn check_find_backward(
    len: usize,
    start: isize,
    count: usize,
) -> Result<core::ops::Range<usize>, ArrayError> {
    if len == 0 {
        if start != -1 {
            return Err(ArrayError::OutOfRange { name: "start_index", value: start });
        }
        if count != 0 {
            return Err(ArrayError::OutOfRange { name: "count", value: count as isize });
        }
        return Ok(0..0);
    }
    let first = check_backward(len, start, count)?;
    Ok(first..first + count)
}

pub fn find_all<T: Clone, P: FnMut(&T) -> bool>(slice: &[T], mut pred: P) -> Vec<T> {
    slice.iter().filter(|e| pred(e)).cloned().collect()
}

pub fn for_each<T, F: FnMut(&T)>(slice: &[T], action: F) {
    slice.iter().for_each(action);
}

/// Whether every element matches; `true` for an empty slice.
pub fn true_for_all<T, P: FnMut(&T) -> bool>(slice: &[T], pred: P) -> bool {
    slice.iter().all(pred)
}

pub fn exists<T, P: FnMut(&T) -> bool>(slice: &[T], pred: P) -> bool {
    slice.iter().any(pred)
}

pub fn convert_all<T, U, F: FnMut(&T) -> U>(slice: &[T], converter: F) -> Vec<U> {
    slice.iter().map(converter).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rankarray::ComparerFailure;

    #[test]
    fn concrete_scenarios() {
        let mut data = [5, 3, 3, 1, 4];
        sort(&mut data).unwrap();
        assert_eq!(data, [1, 3, 3, 4, 5]);

        assert_eq!(binary_search(&[1, 3, 5, 7, 9], &6), Ok(-4));

        let mut four = [1, 2, 3, 4];
        reverse(&mut four).unwrap();
        assert_eq!(four, [4, 3, 2, 1]);
        reverse(&mut four).unwrap();
        assert_eq!(four, [1, 2, 3, 4]);

        assert_eq!(index_of(&[1, 2, 3, 2, 1], &2), 1);
        assert_eq!(last_index_of(&[1, 2, 3, 2, 1], &2), 3);
    }

    #[test]
    fn always_equal_then_failing_comparer() {
        let mut data: Vec<u64> = (0..20).collect();
        let mut calls = 0u32;
        let result = sort_by(&mut data, |_, _| {
            calls += 1;
            if calls <= 5 {
                Ok(Ordering::Equal)
            } else {
                Err(CompareError::Failed("boom".to_string()))
            }
        });
        assert_eq!(
            result,
            Err(ArrayError::ComparerFailed(ComparerFailure::Raised(CompareError::Failed(
                "boom".to_string()
            ))))
        );
    }

    #[test]
    fn ranges_and_orderings() {
        let mut data = [9, 8, 7, 6, 5];
        sort_range(&mut data, 1, 3).unwrap();
        assert_eq!(data, [9, 6, 7, 8, 5]);
        assert_eq!(
            sort_range(&mut data, 4, 2),
            Err(ArrayError::InvalidRange { offset: 4, length: 2, available: 5 })
        );
        sort_range_by(&mut data, 0, 5, |a: &i32, b: &i32| Ok(b.cmp(a))).unwrap();
        assert_eq!(data, [9, 8, 7, 6, 5]);
        sort_by_ordering(&mut data, |a, b| a - b).unwrap();
        assert_eq!(data, [5, 6, 7, 8, 9]);

        let mut words: Vec<String> =
            ["pear", "Apple", "fig"].iter().map(|s| s.to_string()).collect();
        sort(&mut words).unwrap();
        assert_eq!(words, ["Apple", "fig", "pear"]);
        sort_by(&mut words, |a: &String, b: &String| {
            Ok(a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        })
        .unwrap();
        assert_eq!(words, ["fig", "pear", "Apple"]);
    }

    #[test]
    fn paired_sorts() {
        let mut keys = [3, 1, 2];
        let mut items = ["three", "one", "two", "spare"];
        sort_pair(&mut keys, Some(&mut items[..])).unwrap();
        assert_eq!(keys, [1, 2, 3]);
        assert_eq!(items, ["one", "two", "three", "spare"]);

        sort_pair_by(&mut keys, Some(&mut items[..]), |a: &i32, b: &i32| Ok(b.cmp(a))).unwrap();
        assert_eq!(items, ["three", "two", "one", "spare"]);

        sort_pair_range(&mut keys, Some(&mut items[..]), 1, 2).unwrap();
        assert_eq!(keys, [3, 1, 2]);
        assert_eq!(items, ["three", "one", "two", "spare"]);

        sort_pair_range(&mut keys, None::<&mut [()]>, 0, 3).unwrap();
        assert_eq!(keys, [1, 2, 3]);

        let mut short = ['x'];
        assert_eq!(
            sort_pair(&mut keys, Some(&mut short[..])),
            Err(ArrayError::InvalidRange { offset: 0, length: 3, available: 1 })
        );
    }

    #[test]
    fn searches() {
        let data = [1.0, 2.0, f64::NAN, 2.0];
        assert_eq!(index_of(&data, &f64::NAN), 2);
        assert_eq!(index_of_range(&data, &2.0, 2, 2), Ok(3));
        assert_eq!(index_of_range(&data, &2.0, 4, 0), Ok(-1));
        assert_eq!(
            index_of_range(&data, &2.0, 5, 0),
            Err(ArrayError::OutOfRange { name: "start_index", value: 5 })
        );
        assert_eq!(
            index_of_range(&data, &2.0, 2, 3),
            Err(ArrayError::OutOfRange { name: "count", value: 3 })
        );
        assert_eq!(last_index_of_range(&data, &2.0, 2, 3), Ok(1));
        assert_eq!(
            last_index_of_range(&data, &2.0, 4, 1),
            Err(ArrayError::OutOfRange { name: "start_index", value: 4 })
        );
        assert_eq!(
            last_index_of_range(&data, &2.0, 1, 3),
            Err(ArrayError::OutOfRange { name: "count", value: 3 })
        );

        let sorted = [10u8, 20, 30, 40];
        assert_eq!(binary_search_range(&sorted, 1, 2, &30), Ok(2));
        assert_eq!(binary_search_range(&sorted, 1, 2, &35), Ok(!3));
        assert_eq!(binary_search_by(&sorted, &20, |a: &u8, b: &u8| Ok(a.cmp(b))), Ok(1));
        assert!(binary_search_range(&sorted, 3, 2, &30).is_err());
    }

    #[test]
    fn empty_slice_boundaries() {
        let empty: [i32; 0] = [];
        assert_eq!(last_index_of_range(&empty, &1, -1, 0), Ok(-1));
        assert_eq!(last_index_of_range(&empty, &1, 0, 0), Ok(-1));
        assert_eq!(
            last_index_of_range(&empty, &1, 1, 0),
            Err(ArrayError::OutOfRange { name: "start_index", value: 1 })
        );
        assert_eq!(
            last_index_of_range(&empty, &1, 0, 1),
            Err(ArrayError::OutOfRange { name: "count", value: 1 })
        );
        assert_eq!(find_last_index_range(&empty, -1, 0, |_| true), Ok(-1));
        assert_eq!(
            find_last_index_range(&empty, 0, 0, |_| true),
            Err(ArrayError::OutOfRange { name: "start_index", value: 0 })
        );
        assert_eq!(find_last_range(&empty, -1, 0, |_| true), Ok(None));
        assert_eq!(
            find_last_range(&empty, -1, 1, |_| true),
            Err(ArrayError::OutOfRange { name: "count", value: 1 })
        );
        assert_eq!(last_index_of(&empty, &1), -1);
        assert_eq!(binary_search(&empty, &1), Ok(-1));
    }

    #[test]
    fn predicates() {
        let data = [3, 8, -2, 8, 5];
        let even = |x: &i32| x % 2 == 0;
        assert_eq!(find(&data, even), Some(8));
        assert_eq!(find_last(&data, even), Some(8));
        assert_eq!(find(&data, |&x| x > 100), None);
        assert_eq!(find_index(&data, even), 1);
        assert_eq!(find_index_range(&data, 2, 3, even), Ok(2));
        assert_eq!(find_last_index(&data, even), 3);
        assert_eq!(find_last_index_range(&data, 2, 3, even), Ok(2));
        assert_eq!(find_last_index_range(&data, 4, 1, even), Ok(-1));
        assert_eq!(find_range(&data, 2, 3, |&x| x > 4), Ok(Some(8)));
        assert_eq!(find_range(&data, 4, 1, even), Ok(None));
        assert_eq!(find_range(&data, 5, 0, even), Ok(None));
        assert_eq!(
            find_range(&data, 6, 0, even),
            Err(ArrayError::OutOfRange { name: "start_index", value: 6 })
        );
        assert_eq!(find_last_range(&data, 2, 2, |&x| x > 0), Ok(Some(8)));
        assert_eq!(find_last_range(&data, 4, 5, |&x| x > 4), Ok(Some(5)));
        assert_eq!(
            find_last_range(&data, 1, 3, even),
            Err(ArrayError::OutOfRange { name: "count", value: 3 })
        );
        assert_eq!(find_all(&data, even), vec![8, -2, 8]);
        assert!(exists(&data, |&x| x < 0));
        assert!(!true_for_all(&data, even));
        assert!(true_for_all(&[] as &[i32], even));

        let mut seen = Vec::new();
        for_each(&data, |&x| seen.push(x));
        assert_eq!(seen, data);
        assert_eq!(convert_all(&data, |&x| i64::from(x) * 10), vec![30, 80, -20, 80, 50]);
    }

    #[test]
    fn shuffled_strings() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut words: Vec<String> = (0..300).map(|i| alloc::format!("w{:04}", i)).collect();
        let expected = words.clone();
        words.shuffle(&mut rng);
        sort(&mut words).unwrap();
        assert_eq!(words, expected);
    }

    #[quickcheck]
    fn sorted_range_is_ordered_permutation(
        mut data: Vec<i64>,
        index: usize,
        length: usize,
    ) -> bool {
        let index = if data.is_empty() { 0 } else { index % data.len() };
        let length = length % (data.len() - index + 1);
        let original = data.clone();
        sort_range(&mut data, index, length).unwrap();

        let mut expected = original[index..index + length].to_vec();
        expected.sort_unstable();
        data[index..index + length] == expected[..]
            && data[..index] == original[..index]
            && data[index + length..] == original[index + length..]
    }

    #[quickcheck]
    fn reverse_range_twice_is_identity(data: Vec<u8>, index: usize) -> bool {
        let index = if data.is_empty() { 0 } else { index % data.len() };
        let length = data.len() - index;
        let mut copy = data.clone();
        reverse_range(&mut copy, index, length).unwrap();
        reverse_range(&mut copy, index, length).unwrap();
        copy == data
    }

    #[quickcheck]
    fn binary_search_finds_present_values(mut data: Vec<i32>, pick: usize) -> bool {
        if data.is_empty() {
            return true;
        }
        data.sort_unstable();
        let value = data[pick % data.len()];
        match binary_search(&data, &value) {
            Ok(i) => i >= 0 && data[i as usize] == value,
            Err(_) => false,
        }
    }
}
