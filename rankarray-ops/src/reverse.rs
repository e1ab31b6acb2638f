use rankarray::{ArrayError, SlotsMut};

pub fn reverse<S: SlotsMut + ?Sized>(slots: &mut S) -> Result<(), ArrayError> {
    let len = slots.len();
    if len < 2 {
        return Ok(());
    }
    let (mut i, mut j) = (0, len - 1);
    while i < j {
        slots.swap(i, j).ok_or(ArrayError::InvalidRange {
            offset: i as isize,
            length: len,
            available: len,
        })?;
        i += 1;
        j -= 1;
    }
    Ok(())
}
