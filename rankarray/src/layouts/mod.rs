pub mod boxed;
pub mod flat;
pub mod parallel;

pub use self::boxed::{Boxed, BoxedMut, IndexedAccess};
pub use self::parallel::Parallel;

/// Indexed, bounds-checked read access to a run of elements.
///
/// Engines are written once against this capability. Every access outside
/// `0..len()` returns `None` rather than panicking.
pub trait Slots {
    type Elem;

    fn len(&self) -> usize;

    fn read(&self, index: usize) -> Option<Self::Elem>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait SlotsMut: Slots {
    fn write(&mut self, index: usize, value: Self::Elem) -> Option<()>;

    fn swap(&mut self, a: usize, b: usize) -> Option<()> {
        let first = self.read(a)?;
        let second = self.read(b)?;
        self.write(a, second)?;
        self.write(b, first)
    }
}

impl<'s, S: Slots + ?Sized> Slots for &'s S {
    type Elem = S::Elem;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, index: usize) -> Option<S::Elem> {
        (**self).read(index)
    }
}

impl<'s, S: Slots + ?Sized> Slots for &'s mut S {
    type Elem = S::Elem;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, index: usize) -> Option<S::Elem> {
        (**self).read(index)
    }
}

impl<'s, S: SlotsMut + ?Sized> SlotsMut for &'s mut S {
    fn write(&mut self, index: usize, value: S::Elem) -> Option<()> {
        (**self).write(index, value)
    }

    fn swap(&mut self, a: usize, b: usize) -> Option<()> {
        (**self).swap(a, b)
    }
}

pub struct SlotIter<S> {
    slots: S,
    front: usize,
    back: usize,
}

impl<S: Slots> SlotIter<S> {
    pub fn new(slots: S) -> Self {
        let back = slots.len();
        SlotIter {
            slots,
            front: 0,
            back,
        }
    }
}

impl<S: Slots> Iterator for SlotIter<S> {
    type Item = S::Elem;

    fn next(&mut self) -> Option<S::Elem> {
        if self.front == self.back {
            None
        } else {
            let value = self.slots.read(self.front);
            self.front += 1;
            value
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<S: Slots> DoubleEndedIterator for SlotIter<S> {
    fn next_back(&mut self) -> Option<S::Elem> {
        if self.front == self.back {
            None
        } else {
            self.back -= 1;
            self.slots.read(self.back)
        }
    }
}

impl<S: Slots> ExactSizeIterator for SlotIter<S> { }
