use crate::layouts::{SlotIter, Slots, SlotsMut};
use crate::view::{TypedView, TypedViewMut};

impl<'a, T: Clone> Slots for TypedView<'a, T> {
    type Elem = T;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn read(&self, index: usize) -> Option<T> {
        TypedView::read(self, index)
    }
}

impl<'a, T: Clone> Slots for TypedViewMut<'a, T> {
    type Elem = T;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, index: usize) -> Option<T> {
        TypedViewMut::read(self, index)
    }
}

impl<'a, T: Clone> SlotsMut for TypedViewMut<'a, T> {
    fn write(&mut self, index: usize, value: T) -> Option<()> {
        self.set(index, value).map(drop)
    }

    fn swap(&mut self, a: usize, b: usize) -> Option<()> {
        TypedViewMut::swap(self, a, b)
    }
}

impl<'a, T: Clone> IntoIterator for TypedView<'a, T> {
    type Item = T;
    type IntoIter = SlotIter<TypedView<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        SlotIter::new(self)
    }
}
