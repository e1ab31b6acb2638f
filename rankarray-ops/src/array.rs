//! Operations over `Array` handles. Indices are in the array's own index space
//! and arguments are checked in a fixed order before anything is touched.

use core::cmp::Ordering;

use rankarray::{
    with_primitive, Array, ArrayError, Boxed, BoxedMut, ElementType, Parallel, Primitive,
    ShapeMismatch, Slots, StructuralEq, Value,
};

use crate::compare::{ByKey, CompareFn, Comparer, Comparison, OrderingFn};
use crate::dispatch::Path;
use crate::{introsort, search};

fn invalid_range(index: isize, length: usize, available: usize) -> ArrayError {
    ArrayError::InvalidRange {
        offset: index,
        length,
        available,
    }
}

/// Storage offset of `(index, length)` after checking it lies inside the
/// first dimension.
fn offset_range(array: &Array, index: isize, length: usize) -> Result<usize, ArrayError> {
    let lower_bound = array.lower_bound(0)?;
    if index < lower_bound {
        return Err(ArrayError::OutOfRange { name: "index", value: index });
    }
    let offset = index.abs_diff(lower_bound);
    match offset.checked_add(length) {
        Some(end) if end <= array.len() => Ok(offset),
        _ => Err(invalid_range(index, length, array.len())),
    }
}

fn window(array: &Array, offset: usize, length: usize) -> Result<Boxed<'_, Array>, ArrayError> {
    let available = array.len();
    Boxed::new(array, offset, length).ok_or(invalid_range(offset as isize, length, available))
}

fn window_mut(
    array: &mut Array,
    offset: usize,
    length: usize,
) -> Result<BoxedMut<'_, Array>, ArrayError> {
    let available = array.len();
    BoxedMut::new(array, offset, length).ok_or(invalid_range(offset as isize, length, available))
}

fn decode<T: Primitive>(array: &Array, value: &Value) -> Result<T, ArrayError> {
    T::from_value(value).ok_or_else(|| ArrayError::TypeMismatch {
        expected: array.element_type().name(),
        found: alloc::string::ToString::to_string(value.type_name()),
    })
}

pub fn sort(array: &mut Array) -> Result<(), ArrayError> {
    let (index, length) = (array.lower_bound(0)?, array.len());
    sort_pair_range(array, None, index, length, None)
}

pub fn sort_range(
    array: &mut Array,
    index: isize,
    length: usize,
    comparer: Option<CompareFn<'_, Value>>,
) -> Result<(), ArrayError> {
    sort_pair_range(array, None, index, length, comparer)
}

pub fn sort_with(array: &mut Array, ordering: OrderingFn<'_, Value>) -> Result<(), ArrayError> {
    let (index, length) = (array.lower_bound(0)?, array.len());
    sort_impl(array, None, index, length, Comparison::ordering(ordering))
}

/// Sorts `keys`, applying every move to `items` as well.
pub fn sort_pair(
    keys: &mut Array,
    items: Option<&mut Array>,
    comparer: Option<CompareFn<'_, Value>>,
) -> Result<(), ArrayError> {
    let (index, length) = (keys.lower_bound(0)?, keys.len());
    sort_pair_range(keys, items, index, length, comparer)
}

/// Sorts `length` keys starting at `index`, together with the items at the
/// same positions.
///
/// The range may be left in an intermediate permutation when the comparer
/// fails.
pub fn sort_pair_range(
    keys: &mut Array,
    items: Option<&mut Array>,
    index: isize,
    length: usize,
    comparer: Option<CompareFn<'_, Value>>,
) -> Result<(), ArrayError> {
    sort_impl(keys, items, index, length, Comparison::new(comparer))
}

fn sort_impl(
    keys: &mut Array,
    items: Option<&mut Array>,
    index: isize,
    length: usize,
    mut cmp: Comparison<'_, Value>,
) -> Result<(), ArrayError> {
    if keys.rank() != 1 {
        return Err(ArrayError::rank(1, keys.rank()));
    }
    if let Some(items) = &items {
        if items.rank() != keys.rank() {
            return Err(ArrayError::rank(keys.rank(), items.rank()));
        }
        let (k, i) = (keys.lower_bound(0)?, items.lower_bound(0)?);
        if k != i {
            return Err(ArrayError::RankMismatch(ShapeMismatch::LowerBound { keys: k, items: i }));
        }
    }
    let offset = offset_range(keys, index, length)?;
    if let Some(items) = &items {
        if offset + length > items.len() {
            return Err(invalid_range(index, length, items.len()));
        }
    }
    if length < 2 {
        return Ok(());
    }

    let same_type = items.as_ref().map_or(true, |i| i.element_type() == keys.element_type());
    match Path::select("sort", keys, cmp.is_natural() && same_type) {
        Path::Typed(kind) => {
            with_primitive!(kind, T => sort_typed::<T>(keys, items, offset, length))
        }
        Path::Generic => sort_boxed(keys, items, offset, length, &mut cmp),
    }
}

fn sort_typed<T: Primitive>(
    keys: &mut Array,
    items: Option<&mut Array>,
    offset: usize,
    length: usize,
) -> Result<(), ArrayError> {
    let mut keys = keys.view_range_mut::<T>(offset, length)?;
    let mut cmp = Comparison::<T>::natural();
    match items {
        None => introsort::sort(&mut keys, &mut cmp),
        Some(items) => {
            let items = items.view_range_mut::<T>(offset, length)?;
            let mut pair = Parallel::new(keys, items)
                .ok_or(invalid_range(offset as isize, length, length))?;
            introsort::sort(&mut pair, &mut ByKey(cmp))
        }
    }
}

fn sort_boxed(
    keys: &mut Array,
    items: Option<&mut Array>,
    offset: usize,
    length: usize,
    cmp: &mut Comparison<'_, Value>,
) -> Result<(), ArrayError> {
    let mut keys = window_mut(keys, offset, length)?;
    match items {
        None => introsort::sort(&mut keys, cmp),
        Some(items) => {
            let items = window_mut(items, offset, length)?;
            let mut pair = Parallel::new(keys, items)
                .ok_or(invalid_range(offset as isize, length, length))?;
            introsort::sort(&mut pair, &mut ByKey(cmp))
        }
    }
}

/// Returns the index of a match, or the bitwise complement of the index of the
/// first element greater than `value`.
pub fn binary_search(array: &Array, value: &Value) -> Result<isize, ArrayError> {
    let (index, length) = (array.lower_bound(0)?, array.len());
    binary_search_range(array, index, length, value, None)
}

pub fn binary_search_range(
    array: &Array,
    index: isize,
    length: usize,
    value: &Value,
    comparer: Option<CompareFn<'_, Value>>,
) -> Result<isize, ArrayError> {
    let offset = offset_range(array, index, length)?;
    array.shape().require_vector()?;

    let mut cmp = Comparison::new(comparer);
    if let Path::Typed(kind) = Path::select("binary_search", array, cmp.is_natural()) {
        // Null orders before every primitive.
        if value.is_null() {
            return Ok(!index);
        }
        if array.element_type().accepts(value) {
            return with_primitive!(kind, T => {
                let view = array.view_range::<T>(offset, length)?;
                let needle = decode::<T>(array, value)?;
                let found = search::binary_search(&view, &needle, &mut Comparison::<T>::natural())?;
                Ok(search::encode(found, index))
            });
        }
    }
    let found = search::binary_search(&window(array, offset, length)?, value, &mut cmp)?;
    Ok(search::encode(found, index))
}

pub fn index_of(array: &Array, value: &Value) -> Result<isize, ArrayError> {
    let (start, count) = (array.lower_bound(0)?, array.len());
    index_of_range(array, value, start, count)
}

pub fn index_of_range(
    array: &Array,
    value: &Value,
    start: isize,
    count: usize,
) -> Result<isize, ArrayError> {
    let offset = forward_window(array, start, count)?;
    let found = scan(array, value, offset, count, false)?;
    found_at(array, offset, found)
}

pub fn last_index_of(array: &Array, value: &Value) -> Result<isize, ArrayError> {
    let start = last_index(array)?;
    last_index_of_range(array, value, start, array.len())
}

/// Last index of `value` among the `count` elements ending at `start`.
///
/// An empty array accepts any arguments and reports no match.
pub fn last_index_of_range(
    array: &Array,
    value: &Value,
    start: isize,
    count: usize,
) -> Result<isize, ArrayError> {
    let Some(first) = backward_window(array, start, count)? else {
        return array.shape().not_found(0);
    };
    let found = scan(array, value, first, count, true)?;
    found_at(array, first, found)
}

fn forward_window(array: &Array, start: isize, count: usize) -> Result<usize, ArrayError> {
    array.shape().require_vector()?;
    let lower_bound = array.lower_bound(0)?;
    let len = array.len();
    if start < lower_bound || start.abs_diff(lower_bound) > len {
        return Err(ArrayError::OutOfRange { name: "start_index", value: start });
    }
    let offset = start.abs_diff(lower_bound);
    if count > len - offset {
        return Err(ArrayError::OutOfRange { name: "count", value: count as isize });
    }
    Ok(offset)
}

/// Storage offset of the first of the `count` elements ending at `start`, or
/// `None` for an empty array.
fn backward_window(array: &Array, start: isize, count: usize) -> Result<Option<usize>, ArrayError> {
    let lower_bound = array.lower_bound(0)?;
    if array.is_empty() {
        return Ok(None);
    }
    if start < lower_bound || start.abs_diff(lower_bound) >= array.len() {
        return Err(ArrayError::OutOfRange { name: "start_index", value: start });
    }
    let last = start.abs_diff(lower_bound);
    if count > last + 1 {
        return Err(ArrayError::OutOfRange { name: "count", value: count as isize });
    }
    array.shape().require_vector()?;
    Ok(Some(last + 1 - count))
}

fn last_index(array: &Array) -> Result<isize, ArrayError> {
    Ok(array.lower_bound(0)?.saturating_add_unsigned(array.len()).saturating_sub(1))
}

fn found_at(array: &Array, offset: usize, found: Option<usize>) -> Result<isize, ArrayError> {
    match found {
        Some(i) => Ok(array.lower_bound(0)? + (offset + i) as isize),
        None => array.shape().not_found(0),
    }
}

fn scan(
    array: &Array,
    value: &Value,
    offset: usize,
    count: usize,
    backward: bool,
) -> Result<Option<usize>, ArrayError> {
    match Path::select("scan", array, true) {
        Path::Typed(kind) if array.element_type().accepts(value) => with_primitive!(kind, T => {
            let view = array.view_range::<T>(offset, count)?;
            let needle = decode::<T>(array, value)?;
            let matches = |e: &T| e.structural_eq(&needle);
            Ok(if backward {
                search::rposition(&view, matches)
            } else {
                search::position(&view, matches)
            })
        }),
        _ => {
            let slots = window(array, offset, count)?;
            let matches = |e: &Value| e.structural_eq(value);
            Ok(if backward {
                search::rposition(&slots, matches)
            } else {
                search::position(&slots, matches)
            })
        }
    }
}

pub fn reverse(array: &mut Array) -> Result<(), ArrayError> {
    let (index, length) = (array.lower_bound(0)?, array.len());
    reverse_range(array, index, length)
}

pub fn reverse_range(array: &mut Array, index: isize, length: usize) -> Result<(), ArrayError> {
    let offset = offset_range(array, index, length)?;
    array.shape().require_vector()?;
    if length < 2 {
        return Ok(());
    }

    // Reversal never looks at the elements, so the typed path only needs
    // their width.
    match Path::select("reverse", array, true) {
        Path::Typed(kind) => match kind.size() {
            1 => crate::reverse::reverse(&mut array.width_view_mut::<u8>(offset, length)?),
            2 => crate::reverse::reverse(&mut array.width_view_mut::<u16>(offset, length)?),
            4 => crate::reverse::reverse(&mut array.width_view_mut::<u32>(offset, length)?),
            _ => crate::reverse::reverse(&mut array.width_view_mut::<u64>(offset, length)?),
        },
        Path::Generic => crate::reverse::reverse(&mut window_mut(array, offset, length)?),
    }
}

pub fn find<P: FnMut(&Value) -> bool>(array: &Array, mut pred: P) -> Option<Value> {
    array.values().find(|v| pred(v))
}

pub fn find_range<P>(
    array: &Array,
    start: isize,
    count: usize,
    pred: P,
) -> Result<Option<Value>, ArrayError>
where
    P: FnMut(&Value) -> bool,
{
    let slots = window(array, forward_window(array, start, count)?, count)?;
    Ok(search::position(&slots, pred).and_then(|i| slots.read(i)))
}

pub fn find_last<P: FnMut(&Value) -> bool>(array: &Array, mut pred: P) -> Option<Value> {
    array.values().rev().find(|v| pred(v))
}

pub fn find_last_range<P>(
    array: &Array,
    start: isize,
    count: usize,
    pred: P,
) -> Result<Option<Value>, ArrayError>
where
    P: FnMut(&Value) -> bool,
{
    let Some(first) = backward_window(array, start, count)? else {
        return Ok(None);
    };
    let slots = window(array, first, count)?;
    Ok(search::rposition(&slots, pred).and_then(|i| slots.read(i)))
}

pub fn find_index<P: FnMut(&Value) -> bool>(array: &Array, pred: P) -> Result<isize, ArrayError> {
    let (start, count) = (array.lower_bound(0)?, array.len());
    find_index_range(array, start, count, pred)
}

pub fn find_index_range<P>(
    array: &Array,
    start: isize,
    count: usize,
    pred: P,
) -> Result<isize, ArrayError>
where
    P: FnMut(&Value) -> bool,
{
    let offset = forward_window(array, start, count)?;
    let found = search::position(&window(array, offset, count)?, pred);
    found_at(array, offset, found)
}

pub fn find_last_index<P: FnMut(&Value) -> bool>(
    array: &Array,
    pred: P,
) -> Result<isize, ArrayError> {
    let start = last_index(array)?;
    find_last_index_range(array, start, array.len(), pred)
}

pub fn find_last_index_range<P>(
    array: &Array,
    start: isize,
    count: usize,
    pred: P,
) -> Result<isize, ArrayError>
where
    P: FnMut(&Value) -> bool,
{
    let Some(first) = backward_window(array, start, count)? else {
        return array.shape().not_found(0);
    };
    let found = search::rposition(&window(array, first, count)?, pred);
    found_at(array, first, found)
}

pub fn for_each<F: FnMut(&Value)>(array: &Array, mut action: F) {
    array.values().for_each(|v| action(&v));
}

/// Whether every element matches; `true` for an empty array.
pub fn true_for_all<P: FnMut(&Value) -> bool>(array: &Array, mut pred: P) -> bool {
    array.values().all(|v| pred(&v))
}

pub fn exists<P: FnMut(&Value) -> bool>(array: &Array, mut pred: P) -> bool {
    array.values().any(|v| pred(&v))
}

/// Every converted value must be storable as `element_type`.
pub fn convert_all<F>(
    array: &Array,
    element_type: ElementType,
    mut converter: F,
) -> Result<Array, ArrayError>
where
    F: FnMut(&Value) -> Value,
{
    let shape = array.shape();
    let mut converted = Array::with_bounds(element_type, shape.lengths(), shape.lower_bounds())?;
    for (offset, value) in array.values().enumerate() {
        converted.set(offset, converter(&value))?;
    }
    Ok(converted)
}

/// Element-wise structural equality in storage order. Arrays of different
/// lengths are never equal.
pub fn structural_eq(a: &Array, b: &Array) -> bool {
    a.len() == b.len() && a.values().zip(b.values()).all(|(x, y)| x.structural_eq(&y))
}

pub fn structural_cmp(
    a: &Array,
    b: &Array,
    comparer: Option<CompareFn<'_, Value>>,
) -> Result<Ordering, ArrayError> {
    if a.len() != b.len() {
        return Err(ArrayError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut cmp = Comparison::new(comparer);
    for (x, y) in a.values().zip(b.values()) {
        match cmp.compare(&x, &y)? {
            Ordering::Equal => {}
            unequal => return Ok(unequal),
        }
    }
    Ok(Ordering::Equal)
}
