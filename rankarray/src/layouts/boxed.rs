use crate::element::Value;
use crate::error::ArrayError;
use crate::layouts::{Slots, SlotsMut};

/// Element access by linear offset, boxing each element on the way out.
///
/// The generic path of every engine goes through this capability and never
/// through a concrete array representation.
pub trait IndexedAccess {
    fn count(&self) -> usize;

    fn get(&self, offset: usize) -> Option<Value>;

    fn set(&mut self, offset: usize, value: Value) -> Result<(), ArrayError>;
}

pub struct Boxed<'a, A: ?Sized> {
    array: &'a A,
    base: usize,
    len: usize,
}

pub struct BoxedMut<'a, A: ?Sized> {
    array: &'a mut A,
    base: usize,
    len: usize,
}

fn window(count: usize, base: usize, len: usize) -> Option<()> {
    if base.checked_add(len)? <= count {
        Some(())
    } else {
        None
    }
}

impl<'a, A: IndexedAccess + ?Sized> Boxed<'a, A> {
    pub fn new(array: &'a A, base: usize, len: usize) -> Option<Self> {
        window(array.count(), base, len)?;
        Some(Boxed { array, base, len })
    }

    pub fn whole(array: &'a A) -> Self {
        let len = array.count();
        Boxed { array, base: 0, len }
    }
}

impl<'a, A: IndexedAccess + ?Sized> BoxedMut<'a, A> {
    pub fn new(array: &'a mut A, base: usize, len: usize) -> Option<Self> {
        window(array.count(), base, len)?;
        Some(BoxedMut { array, base, len })
    }
}

impl<'a, A: IndexedAccess + ?Sized> Slots for Boxed<'a, A> {
    type Elem = Value;

    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, index: usize) -> Option<Value> {
        if index < self.len {
            self.array.get(self.base + index)
        } else {
            None
        }
    }
}

impl<'a, A: IndexedAccess + ?Sized> Slots for BoxedMut<'a, A> {
    type Elem = Value;

    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, index: usize) -> Option<Value> {
        if index < self.len {
            self.array.get(self.base + index)
        } else {
            None
        }
    }
}

impl<'a, A: IndexedAccess + ?Sized> SlotsMut for BoxedMut<'a, A> {
    fn write(&mut self, index: usize, value: Value) -> Option<()> {
        if index < self.len {
            self.array.set(self.base + index, value).ok()
        } else {
            None
        }
    }
}
