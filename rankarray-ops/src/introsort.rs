//! Introspective sort over any `SlotsMut` layout.
//!
//! Quicksort with median-of-three pivots, insertion sort for small partitions
//! and heapsort once the depth budget runs out. Elements only ever move through
//! `swap`, so a failure part way through leaves the range a permutation of
//! what it was.

use core::cmp::Ordering;

use rankarray::{ArrayError, Slots, SlotsMut};

use crate::compare::{in_range, Comparer};

/// Partitions of at most this many elements are insertion sorted.
pub const INSERTION_THRESHOLD: usize = 16;

pub fn sort<S, C>(slots: &mut S, cmp: &mut C) -> Result<(), ArrayError>
where
    S: SlotsMut + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    let len = slots.len();
    if len < 2 {
        return Ok(());
    }
    let depth = 2 * (len.ilog2() + 1);
    introsort(slots, cmp, 0, len - 1, depth)
}

fn read<S: Slots + ?Sized>(slots: &S, index: usize) -> Result<S::Elem, ArrayError> {
    in_range(slots.read(index))
}

fn swap<S: SlotsMut + ?Sized>(slots: &mut S, a: usize, b: usize) -> Result<(), ArrayError> {
    in_range(slots.swap(a, b))
}

fn swap_if_greater<S, C>(slots: &mut S, cmp: &mut C, a: usize, b: usize) -> Result<(), ArrayError>
where
    S: SlotsMut + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    if a != b && cmp.compare(&read(slots, a)?, &read(slots, b)?)? == Ordering::Greater {
        swap(slots, a, b)?;
    }
    Ok(())
}

/// Sorts `[lo, hi]`. The larger side of each partition is sorted by a
/// recursive call, which spends one unit of `depth`; the smaller side is
/// sorted by the loop for free.
fn introsort<S, C>(
    slots: &mut S,
    cmp: &mut C,
    mut lo: usize,
    mut hi: usize,
    depth: u32,
) -> Result<(), ArrayError>
where
    S: SlotsMut + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    while hi > lo {
        let size = hi - lo + 1;
        if size <= INSERTION_THRESHOLD {
            return match size {
                2 => swap_if_greater(slots, cmp, lo, hi),
                3 => {
                    swap_if_greater(slots, cmp, lo, hi - 1)?;
                    swap_if_greater(slots, cmp, lo, hi)?;
                    swap_if_greater(slots, cmp, hi - 1, hi)
                }
                _ => insertion_sort(slots, cmp, lo, hi),
            };
        }

        if depth == 0 {
            tracing::trace!(lo, hi, "depth budget exhausted, switching to heapsort");
            return heapsort(slots, cmp, lo, hi);
        }

        let pivot = partition(slots, cmp, lo, hi)?;
        if pivot - lo < hi - pivot {
            if pivot < hi {
                introsort(slots, cmp, pivot + 1, hi, depth - 1)?;
            }
            if pivot == lo {
                return Ok(());
            }
            hi = pivot - 1;
        } else {
            if pivot > lo {
                introsort(slots, cmp, lo, pivot - 1, depth - 1)?;
            }
            lo = pivot + 1;
        }
    }
    Ok(())
}

/// Partitions `[lo, hi]` (at least three slots) around the median of its
/// first, middle and last elements and returns the pivot's final index.
fn partition<S, C>(slots: &mut S, cmp: &mut C, lo: usize, hi: usize) -> Result<usize, ArrayError>
where
    S: SlotsMut + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    let mid = lo + ((hi - lo) >> 1);
    swap_if_greater(slots, cmp, lo, mid)?;
    swap_if_greater(slots, cmp, lo, hi)?;
    swap_if_greater(slots, cmp, mid, hi)?;

    let pivot = read(slots, mid)?;
    swap(slots, mid, hi - 1)?;

    let mut left = lo;
    let mut right = hi - 1;
    while left < right {
        loop {
            left += 1;
            // The pivot at hi - 1 stops a consistent comparer.
            if left >= hi {
                return Err(ArrayError::inconsistent());
            }
            if !cmp.less(&read(slots, left)?, &pivot)? {
                break;
            }
        }
        loop {
            // As does the element at lo.
            if right == lo {
                return Err(ArrayError::inconsistent());
            }
            right -= 1;
            if !cmp.less(&pivot, &read(slots, right)?)? {
                break;
            }
        }
        if left >= right {
            break;
        }
        swap(slots, left, right)?;
    }

    if left != hi - 1 {
        swap(slots, left, hi - 1)?;
    }
    Ok(left)
}

fn insertion_sort<S, C>(slots: &mut S, cmp: &mut C, lo: usize, hi: usize) -> Result<(), ArrayError>
where
    S: SlotsMut + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    for i in lo + 1..=hi {
        let item = read(slots, i)?;
        let mut j = i;
        while j > lo && cmp.less(&item, &read(slots, j - 1)?)? {
            swap(slots, j - 1, j)?;
            j -= 1;
        }
    }
    Ok(())
}

/// Heapsort of `[lo, hi]`, the fallback once quicksort degenerates.
pub(crate) fn heapsort<S, C>(
    slots: &mut S,
    cmp: &mut C,
    lo: usize,
    hi: usize,
) -> Result<(), ArrayError>
where
    S: SlotsMut + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    let n = hi - lo + 1;
    for i in (1..=n / 2).rev() {
        sift_down(slots, cmp, i, n, lo)?;
    }
    for i in (2..=n).rev() {
        swap(slots, lo, lo + i - 1)?;
        sift_down(slots, cmp, 1, i - 1, lo)?;
    }
    Ok(())
}

// Heap positions are one-based: the children of `i` are `2i` and `2i + 1`.
fn sift_down<S, C>(
    slots: &mut S,
    cmp: &mut C,
    mut i: usize,
    n: usize,
    lo: usize,
) -> Result<(), ArrayError>
where
    S: SlotsMut + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    while i <= n / 2 {
        let mut child = 2 * i;
        if child < n && cmp.less(&read(slots, lo + child - 1)?, &read(slots, lo + child)?)? {
            child += 1;
        }
        if !cmp.less(&read(slots, lo + i - 1)?, &read(slots, lo + child - 1)?)? {
            break;
        }
        swap(slots, lo + i - 1, lo + child - 1)?;
        i = child;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{ByKey, Comparison};
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rankarray::{CompareError, ComparerFailure, Parallel, TypedViewMut};

    fn sorted_copy(mut v: Vec<i32>) -> Vec<i32> {
        v.sort_unstable();
        v
    }

    fn introsorted(mut v: Vec<i32>) -> Vec<i32> {
        sort(&mut TypedViewMut::from_slice(&mut v), &mut Comparison::natural()).unwrap();
        v
    }

    #[test]
    fn small_inputs() {
        assert_eq!(introsorted(vec![5, 3, 3, 1, 4]), vec![1, 3, 3, 4, 5]);
        assert_eq!(introsorted(vec![]), Vec::<i32>::new());
        assert_eq!(introsorted(vec![1]), vec![1]);
        assert_eq!(introsorted(vec![2, 1]), vec![1, 2]);
        assert_eq!(introsorted(vec![3, 1, 2]), vec![1, 2, 3]);
    }

    #[test]
    fn seeded_inputs_across_thresholds() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for len in [15, 16, 17, 33, 100, 1000, 4096] {
            let data: Vec<i32> = (0..len).map(|_| rng.gen_range(-50..50)).collect();
            assert_eq!(introsorted(data.clone()), sorted_copy(data));
        }
    }

    #[test]
    fn adversarial_shapes() {
        let ascending: Vec<i32> = (0..500).collect();
        let descending: Vec<i32> = (0..500).rev().collect();
        let organ: Vec<i32> = (0..250).chain((0..250).rev()).collect();
        let constant = vec![7; 300];
        for data in [ascending, descending, organ, constant] {
            assert_eq!(introsorted(data.clone()), sorted_copy(data));
        }
    }

    #[test]
    fn heapsort_subrange() {
        let mut data = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
        let mut view = TypedViewMut::from_slice(&mut data);
        heapsort(&mut view, &mut Comparison::natural(), 2, 7).unwrap();
        assert_eq!(data, vec![9, 8, 2, 3, 4, 5, 6, 7, 1, 0]);
    }

    fn counted<F>(mut data: Vec<i32>, run: F) -> (Vec<i32>, usize)
    where
        F: FnOnce(&mut TypedViewMut<'_, i32>, &mut Comparison<'_, i32>) -> Result<(), ArrayError>,
    {
        let mut calls = 0;
        let mut counting = |a: &i32, b: &i32| -> Result<Ordering, CompareError> {
            calls += 1;
            Ok(a.cmp(b))
        };
        let mut view = TypedViewMut::from_slice(&mut data);
        run(&mut view, &mut Comparison::custom(&mut counting)).unwrap();
        (data, calls)
    }

    #[test]
    fn exhausted_budget_falls_back_to_heapsort() {
        let mut rng = StdRng::seed_from_u64(3);
        let data: Vec<i32> = (0..300).map(|_| rng.gen_range(-1000..1000)).collect();
        let last = data.len() - 1;

        let (heaped, heap_calls) = counted(data.clone(), |s, c| heapsort(s, c, 0, last));
        let (fallen_back, intro_calls) = counted(data.clone(), |s, c| introsort(s, c, 0, last, 0));
        assert_eq!(fallen_back, sorted_copy(data.clone()));
        assert_eq!(fallen_back, heaped);
        assert_eq!(intro_calls, heap_calls);

        // One partition, then the larger side runs out of budget.
        let (once, _) = counted(data.clone(), |s, c| introsort(s, c, 0, last, 1));
        assert_eq!(once, sorted_copy(data));
    }

    #[test]
    fn failing_comparer_aborts_with_permutation() {
        let mut data: Vec<i32> = (0..20).rev().collect();
        let mut calls = 0;
        let mut flaky = |_: &i32, _: &i32| -> Result<Ordering, CompareError> {
            calls += 1;
            if calls > 10 {
                Err(CompareError::Failed("tired".to_string()))
            } else {
                Ok(Ordering::Equal)
            }
        };
        let mut view = TypedViewMut::from_slice(&mut data);
        let result = sort(&mut view, &mut Comparison::custom(&mut flaky));
        assert_eq!(
            result,
            Err(ArrayError::ComparerFailed(ComparerFailure::Raised(CompareError::Failed(
                "tired".to_string()
            ))))
        );
        assert_eq!(sorted_copy(data), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn random_comparer_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let mut data: Vec<i32> = (0..200).collect();
            let mut coin = |_: &i32, _: &i32| -> Result<Ordering, CompareError> {
                Ok(match rng.gen_range(0..3) {
                    0 => Ordering::Less,
                    1 => Ordering::Equal,
                    _ => Ordering::Greater,
                })
            };
            let mut view = TypedViewMut::from_slice(&mut data);
            let result = sort(&mut view, &mut Comparison::custom(&mut coin));
            assert!(result.is_ok() || result == Err(ArrayError::inconsistent()));
            assert_eq!(sorted_copy(data), (0..200).collect::<Vec<_>>());
        }
    }

    #[test]
    fn parallel_moves_items_with_keys() {
        let mut keys = vec![3u8, 1, 2, 1];
        let mut items = vec!['c', 'a', 'b', 'a'];
        {
            let mut pair = Parallel::new(
                TypedViewMut::from_slice(&mut keys),
                TypedViewMut::from_slice(&mut items),
            )
            .unwrap();
            sort(&mut pair, &mut ByKey(Comparison::natural())).unwrap();
        }
        assert_eq!(keys, vec![1, 1, 2, 3]);
        assert_eq!(items, vec!['a', 'a', 'b', 'c']);
    }

    #[quickcheck]
    fn sorts_to_a_sorted_permutation(data: Vec<i32>) -> bool {
        introsorted(data.clone()) == sorted_copy(data)
    }

    #[quickcheck]
    fn sorts_floats_with_nan_first(data: Vec<f64>) -> bool {
        let mut sorted = data.clone();
        sort(&mut TypedViewMut::from_slice(&mut sorted), &mut Comparison::natural()).unwrap();
        let nans = data.iter().filter(|x| x.is_nan()).count();
        sorted[..nans].iter().all(|x| x.is_nan()) && sorted[nans..].windows(2).all(|w| w[0] <= w[1])
    }
}
