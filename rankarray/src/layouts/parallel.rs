use crate::layouts::{Slots, SlotsMut};

/// Keys and items moved in lockstep: every swap applied to the keys is applied
/// to the items at the same positions.
pub struct Parallel<K, I> {
    keys: K,
    items: I,
}

impl<K: Slots, I: Slots> Parallel<K, I> {
    /// Fails when `items` is shorter than `keys`.
    pub fn new(keys: K, items: I) -> Option<Self> {
        if items.len() < keys.len() {
            None
        } else {
            Some(Parallel { keys, items })
        }
    }
}

impl<K: Slots, I: Slots> Slots for Parallel<K, I> {
    type Elem = (K::Elem, I::Elem);

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn read(&self, index: usize) -> Option<Self::Elem> {
        Some((self.keys.read(index)?, self.items.read(index)?))
    }
}

impl<K: SlotsMut, I: SlotsMut> SlotsMut for Parallel<K, I> {
    fn write(&mut self, index: usize, (key, item): Self::Elem) -> Option<()> {
        self.keys.write(index, key)?;
        self.items.write(index, item)
    }

    fn swap(&mut self, a: usize, b: usize) -> Option<()> {
        if a >= self.keys.len() || b >= self.keys.len() {
            return None;
        }
        self.keys.swap(a, b)?;
        self.items.swap(a, b)
    }
}
