use core::ops::Deref;

#[derive(Debug)]
pub struct TypedView<'a, T> {
    slice: &'a [T],
}

/// Writes go through the checked `set` and `swap`; there is no `DerefMut`.
#[derive(Debug)]
pub struct TypedViewMut<'a, T> {
    slice: &'a mut [T],
}

impl<'a, T> Copy for TypedView<'a, T> { }
impl<'a, T> Clone for TypedView<'a, T> {
    fn clone(&self) -> Self { *self }
}

impl<'a, T> Deref for TypedView<'a, T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.slice
    }
}

impl<'a, T> Deref for TypedViewMut<'a, T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.slice
    }
}

impl<'a, T> TypedView<'a, T> {
    pub fn from_slice(slice: &'a [T]) -> Self {
        TypedView { slice }
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.slice
    }

    pub fn range(self, start: usize, len: usize) -> Option<Self> {
        let end = start.checked_add(len)?;
        self.slice.get(start..end).map(TypedView::from_slice)
    }
}

impl<'a, T: Clone> TypedView<'a, T> {
    pub fn read(&self, index: usize) -> Option<T> {
        self.slice.get(index).cloned()
    }
}

impl<'a, T> TypedViewMut<'a, T> {
    pub fn from_slice(slice: &'a mut [T]) -> Self {
        TypedViewMut { slice }
    }

    pub fn reborrow<'b>(&'b self) -> TypedView<'b, T> {
        TypedView::from_slice(self.slice)
    }

    pub fn range(self, start: usize, len: usize) -> Option<Self> {
        let end = start.checked_add(len)?;
        self.slice.get_mut(start..end).map(TypedViewMut::from_slice)
    }

    pub fn set(&mut self, index: usize, value: T) -> Option<T> {
        self.slice.get_mut(index).map(|slot| core::mem::replace(slot, value))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Option<()> {
        if a < self.slice.len() && b < self.slice.len() {
            self.slice.swap(a, b);
            Some(())
        } else {
            None
        }
    }
}

impl<'a, T: Clone> TypedViewMut<'a, T> {
    pub fn read(&self, index: usize) -> Option<T> {
        self.slice.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_access() {
        let mut data = [3u16, 1, 2];
        let mut view = TypedViewMut::from_slice(&mut data);
        assert_eq!(view.read(2), Some(2));
        assert_eq!(view.read(3), None);
        assert_eq!(view.set(0, 9), Some(3));
        assert_eq!(view.set(3, 9), None);
        assert_eq!(view.swap(0, 2), Some(()));
        assert_eq!(view.swap(0, 3), None);
        assert_eq!(view.reborrow().as_slice(), &[2, 1, 9]);
        let sub = view.range(1, 2).unwrap();
        assert_eq!(&*sub, &[1, 9]);
    }

    #[test]
    fn range_bounds() {
        let data = [1i64, 2, 3, 4];
        let view = TypedView::from_slice(&data);
        assert_eq!(view.range(4, 0).map(|v| v.len()), Some(0));
        assert!(view.range(3, 2).is_none());
        assert!(view.range(usize::MAX, 2).is_none());
    }
}
