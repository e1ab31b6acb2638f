use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use bytemuck::Pod;

use crate::element::{ElementType, Primitive, Value};
use crate::error::ArrayError;

/// Backing buffer of an array.
///
/// Primitive elements are packed into 8-byte words so that any element width
/// up to 8 can be viewed in place with a plain cast.
#[derive(Debug, Clone)]
pub(crate) enum Storage {
    Words { words: Vec<u64>, count: usize },
    Values(Vec<Value>),
}

fn word_count(count: usize, size: usize) -> usize {
    (count * size).div_ceil(8)
}

impl Storage {
    pub(crate) fn zeroed(element_type: ElementType, count: usize) -> Self {
        match element_type.primitive_kind() {
            Some(kind) => Storage::Words {
                words: vec![0; word_count(count, kind.size())],
                count,
            },
            None => Storage::Values(vec![Value::Null; count]),
        }
    }

    pub(crate) fn from_primitives<T: Primitive>(values: &[T]) -> Self {
        let mut words = vec![0u64; word_count(values.len(), T::KIND.size())];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(words.as_mut_slice());
        bytes[..values.len() * T::KIND.size()].copy_from_slice(bytemuck::cast_slice(values));
        Storage::Words {
            words,
            count: values.len(),
        }
    }

    /// Views the word buffer as `count` elements of `W`.
    /// Callers check that `W` has the element width.
    pub(crate) fn cast<W: Pod>(&self) -> Option<&[W]> {
        match self {
            Storage::Words { words, count } => {
                bytemuck::try_cast_slice(words.as_slice()).ok()?.get(..*count)
            }
            Storage::Values(_) => None,
        }
    }

    pub(crate) fn cast_mut<W: Pod>(&mut self) -> Option<&mut [W]> {
        match self {
            Storage::Words { words, count } => {
                bytemuck::try_cast_slice_mut(words.as_mut_slice()).ok()?.get_mut(..*count)
            }
            Storage::Values(_) => None,
        }
    }

    pub(crate) fn get(&self, element_type: ElementType, offset: usize) -> Option<Value> {
        match self {
            Storage::Values(values) => values.get(offset).cloned(),
            Storage::Words { .. } => {
                let kind = element_type.primitive_kind()?;
                crate::with_primitive!(kind, T => {
                    self.cast::<T>()?.get(offset).map(|v| v.to_value(element_type))
                })
            }
        }
    }

    pub(crate) fn set(
        &mut self,
        element_type: ElementType,
        offset: usize,
        value: Value,
    ) -> Result<(), ArrayError> {
        let out_of_range = ArrayError::OutOfRange {
            name: "offset",
            value: offset as isize,
        };
        if !element_type.accepts(&value) {
            if value.is_null() {
                return Err(ArrayError::NullArgument { name: "value" });
            }
            return Err(ArrayError::TypeMismatch {
                expected: element_type.name(),
                found: value.type_name().to_string(),
            });
        }
        match self {
            Storage::Values(values) => {
                *values.get_mut(offset).ok_or(out_of_range)? = value;
                Ok(())
            }
            Storage::Words { .. } => {
                let kind = element_type.primitive_kind().ok_or(out_of_range.clone())?;
                crate::with_primitive!(kind, T => {
                    let decoded = T::from_value(&value).ok_or_else(|| ArrayError::TypeMismatch {
                        expected: element_type.name(),
                        found: value.type_name().to_string(),
                    })?;
                    let slot = self
                        .cast_mut::<T>()
                        .and_then(|s| s.get_mut(offset))
                        .ok_or(out_of_range)?;
                    *slot = decoded;
                    Ok(())
                })
            }
        }
    }
}
