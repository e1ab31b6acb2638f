use core::cmp::Ordering;

use rankarray::{ArrayError, Slots};

use crate::compare::{in_range, Comparer};

/// Bisects a layout sorted under `cmp` for `value`.
///
/// Returns `Ok(index)` of a match, or `Err(insert)` with the position the
/// value would be inserted at to keep the layout sorted.
pub fn binary_search<S, C>(
    slots: &S,
    value: &S::Elem,
    cmp: &mut C,
) -> Result<Result<usize, usize>, ArrayError>
where
    S: Slots + ?Sized,
    C: Comparer<S::Elem> + ?Sized,
{
    let mut lo = 0;
    let mut hi = slots.len();
    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        let element = in_range(slots.read(mid))?;
        match cmp.compare(&element, value)? {
            Ordering::Equal => return Ok(Ok(mid)),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    Ok(Err(lo))
}

/// Encodes a binary search result the way the public surfaces report it: the
/// match index, or the bitwise complement of the insertion point.
pub fn encode(found: Result<usize, usize>, base: isize) -> isize {
    match found {
        Ok(index) => base + index as isize,
        Err(insert) => !(base + insert as isize),
    }
}

pub fn position<S, F>(slots: &S, mut pred: F) -> Option<usize>
where
    S: Slots + ?Sized,
    F: FnMut(&S::Elem) -> bool,
{
    (0..slots.len()).find(|&i| slots.read(i).is_some_and(|e| pred(&e)))
}

pub fn rposition<S, F>(slots: &S, mut pred: F) -> Option<usize>
where
    S: Slots + ?Sized,
    F: FnMut(&S::Elem) -> bool,
{
    (0..slots.len()).rev().find(|&i| slots.read(i).is_some_and(|e| pred(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Comparison;
    use alloc::vec;
    use alloc::vec::Vec;
    use quickcheck_macros::quickcheck;
    use rankarray::{Array, Boxed, StructuralEq, TypedView, Value};

    #[test]
    fn finds_or_reports_insertion_point() {
        let data = [1, 3, 5, 7];
        let view = TypedView::from_slice(&data);
        let mut cmp = Comparison::natural();
        assert_eq!(binary_search(&view, &5, &mut cmp), Ok(Ok(2)));
        assert_eq!(binary_search(&view, &4, &mut cmp), Ok(Err(2)));
        assert_eq!(binary_search(&view, &0, &mut cmp), Ok(Err(0)));
        assert_eq!(binary_search(&view, &9, &mut cmp), Ok(Err(4)));
        assert_eq!(encode(Ok(2), 0), 2);
        assert_eq!(encode(Err(3), 0), -4);
        assert_eq!(encode(Err(0), 10), -11);
    }

    #[test]
    fn boxed_layout_searches_values() {
        let array = Array::from_values(
            rankarray::ElementType::Object,
            vec![Value::Null, Value::str("apple"), Value::str("cherry")],
        )
        .unwrap();
        let window = Boxed::whole(&array);
        let mut cmp = Comparison::natural();
        assert_eq!(binary_search(&window, &Value::Null, &mut cmp), Ok(Ok(0)));
        assert_eq!(binary_search(&window, &Value::str("banana"), &mut cmp), Ok(Err(2)));
        let err = binary_search(&window, &Value::I32(3), &mut cmp).unwrap_err();
        assert!(err.is_comparer_failure());
    }

    #[test]
    fn scans_from_either_end() {
        let data = [2.0, f64::NAN, 2.0, 5.0];
        let view = TypedView::from_slice(&data);
        assert_eq!(position(&view, |x| x.structural_eq(&f64::NAN)), Some(1));
        assert_eq!(position(&view, |&x| x == 2.0), Some(0));
        assert_eq!(rposition(&view, |&x| x == 2.0), Some(2));
        assert_eq!(rposition(&view, |&x| x > 9.0), None);
    }

    #[quickcheck]
    fn agrees_with_slice_search(mut data: Vec<i16>, needle: i16) -> bool {
        data.sort_unstable();
        let view = TypedView::from_slice(&data);
        let found = binary_search(&view, &needle, &mut Comparison::natural()).unwrap();
        match found {
            Ok(index) => data[index] == needle,
            Err(insert) => {
                !data.contains(&needle)
                    && data[..insert].iter().all(|&x| x < needle)
                    && data[insert..].iter().all(|&x| x > needle)
            }
        }
    }
}
