use alloc::vec::Vec;
use core::mem::size_of;

use bytemuck::Pod;

use crate::element::{ElementType, Primitive, Value};
use crate::error::ArrayError;
use crate::layouts::{Boxed, IndexedAccess, SlotIter};
use crate::shape::Shape;
use crate::storage::Storage;
use crate::view::{TypedView, TypedViewMut};

/// An array of any rank, lower bounds and element type.
///
/// Elements are addressed either by per-dimension indices (`get_value`,
/// `set_value`) or by their row-major linear offset (`get`, `set`).
#[derive(Debug, Clone)]
pub struct Array {
    element_type: ElementType,
    shape: Shape,
    storage: Storage,
}

impl Array {
    /// Zero-based array with every element zeroed (`Null` for boxed types).
    pub fn new(element_type: ElementType, lengths: &[usize]) -> Result<Self, ArrayError> {
        Array::with_bounds(element_type, lengths, &alloc::vec![0; lengths.len()])
    }

    pub fn with_bounds(
        element_type: ElementType,
        lengths: &[usize],
        lower_bounds: &[isize],
    ) -> Result<Self, ArrayError> {
        let shape = Shape::new(lengths.to_vec(), lower_bounds.to_vec())?;
        let storage = Storage::zeroed(element_type, shape.len());
        Ok(Array {
            element_type,
            shape,
            storage,
        })
    }

    pub fn from_slice<T: Primitive>(values: &[T]) -> Self {
        let element_type = match T::KIND {
            crate::PrimitiveKind::I8 => ElementType::I8,
            crate::PrimitiveKind::U8 => ElementType::U8,
            crate::PrimitiveKind::I16 => ElementType::I16,
            crate::PrimitiveKind::U16 => ElementType::U16,
            crate::PrimitiveKind::I32 => ElementType::I32,
            crate::PrimitiveKind::U32 => ElementType::U32,
            crate::PrimitiveKind::I64 => ElementType::I64,
            crate::PrimitiveKind::U64 => ElementType::U64,
            crate::PrimitiveKind::F32 => ElementType::F32,
            crate::PrimitiveKind::F64 => ElementType::F64,
        };
        Array {
            element_type,
            shape: Shape::vector(values.len()),
            storage: Storage::from_primitives(values),
        }
    }

    pub fn from_bools(values: &[bool]) -> Self {
        let bytes: Vec<u8> = values.iter().map(|&b| b as u8).collect();
        Array {
            element_type: ElementType::Bool,
            shape: Shape::vector(values.len()),
            storage: Storage::from_primitives(&bytes),
        }
    }

    pub fn from_chars(s: &str) -> Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        Array {
            element_type: ElementType::Char,
            shape: Shape::vector(units.len()),
            storage: Storage::from_primitives(&units),
        }
    }

    /// One-dimensional array holding `values`, each of which must be storable
    /// as `element_type`.
    pub fn from_values(element_type: ElementType, values: Vec<Value>) -> Result<Self, ArrayError> {
        if !element_type.is_primitive() {
            if let Some(bad) = values.iter().find(|v| !element_type.accepts(v)) {
                return Err(ArrayError::TypeMismatch {
                    expected: element_type.name(),
                    found: alloc::string::ToString::to_string(bad.type_name()),
                });
            }
            return Ok(Array {
                element_type,
                shape: Shape::vector(values.len()),
                storage: Storage::Values(values),
            });
        }

        let mut array = Array::new(element_type, &[values.len()])?;
        for (offset, value) in values.into_iter().enumerate() {
            array.set(offset, value)?;
        }
        Ok(array)
    }

    /// Reinterprets the dimensions under new lengths and lower bounds holding
    /// the same number of elements, keeping storage order.
    pub fn reshape(self, lengths: &[usize], lower_bounds: &[isize]) -> Result<Self, ArrayError> {
        let shape = Shape::new(lengths.to_vec(), lower_bounds.to_vec())?;
        if shape.len() != self.shape.len() {
            return Err(ArrayError::LengthMismatch {
                left: self.shape.len(),
                right: shape.len(),
            });
        }
        Ok(Array { shape, ..self })
    }

    pub fn rebase(self, lower_bounds: &[isize]) -> Result<Self, ArrayError> {
        let lengths = self.shape.lengths().to_vec();
        self.reshape(&lengths, lower_bounds)
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn len(&self) -> usize {
        self.shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn length(&self, dim: usize) -> Result<usize, ArrayError> {
        self.shape.length(dim)
    }

    pub fn lower_bound(&self, dim: usize) -> Result<isize, ArrayError> {
        self.shape.lower_bound(dim)
    }

    pub fn upper_bound(&self, dim: usize) -> Result<isize, ArrayError> {
        self.shape.upper_bound(dim)
    }

    pub fn get(&self, offset: usize) -> Option<Value> {
        self.storage.get(self.element_type, offset)
    }

    pub fn set(&mut self, offset: usize, value: Value) -> Result<(), ArrayError> {
        self.storage.set(self.element_type, offset, value)
    }

    pub fn get_value(&self, indices: &[isize]) -> Result<Value, ArrayError> {
        let offset = self.shape.flatten(indices)?;
        self.get(offset).ok_or(ArrayError::OutOfRange {
            name: "indices",
            value: offset as isize,
        })
    }

    pub fn set_value(&mut self, indices: &[isize], value: Value) -> Result<(), ArrayError> {
        let offset = self.shape.flatten(indices)?;
        self.set(offset, value)
    }

    pub fn values(&self) -> SlotIter<Boxed<'_, Array>> {
        SlotIter::new(Boxed::whole(self))
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.values().collect()
    }

    /// Typed view of the whole array; only for one-dimensional arrays whose
    /// element type classifies as `T::KIND`.
    pub fn view<T: Primitive>(&self) -> Result<TypedView<'_, T>, ArrayError> {
        self.check_kind::<T>()?;
        self.storage
            .cast::<T>()
            .map(TypedView::from_slice)
            .ok_or_else(|| self.kind_mismatch::<T>())
    }

    pub fn view_mut<T: Primitive>(&mut self) -> Result<TypedViewMut<'_, T>, ArrayError> {
        self.check_kind::<T>()?;
        let mismatch = self.kind_mismatch::<T>();
        self.storage
            .cast_mut::<T>()
            .map(TypedViewMut::from_slice)
            .ok_or(mismatch)
    }

    pub fn view_range<T: Primitive>(
        &self,
        start: usize,
        len: usize,
    ) -> Result<TypedView<'_, T>, ArrayError> {
        let available = self.len();
        self.view::<T>()?
            .range(start, len)
            .ok_or(invalid_range(start, len, available))
    }

    pub fn view_range_mut<T: Primitive>(
        &mut self,
        start: usize,
        len: usize,
    ) -> Result<TypedViewMut<'_, T>, ArrayError> {
        let available = self.len();
        self.view_mut::<T>()?
            .range(start, len)
            .ok_or(invalid_range(start, len, available))
    }

    /// View typed only by element width, for operations that move elements
    /// without interpreting them. `W` must be as wide as one element.
    pub fn width_view_mut<W: Pod>(
        &mut self,
        start: usize,
        len: usize,
    ) -> Result<TypedViewMut<'_, W>, ArrayError> {
        self.shape.require_vector()?;
        if !self.element_type.is_primitive() || self.element_type.size() != size_of::<W>() {
            tracing::trace!(
                element = self.element_type.name(),
                width = size_of::<W>(),
                "width view refused"
            );
            return Err(ArrayError::TypeMismatch {
                expected: self.element_type.name(),
                found: alloc::format!("{}-byte element", size_of::<W>()),
            });
        }
        let available = self.len();
        let view = self
            .storage
            .cast_mut::<W>()
            .map(TypedViewMut::from_slice)
            .ok_or(invalid_range(start, len, available))?;
        view.range(start, len).ok_or(invalid_range(start, len, available))
    }

    fn check_kind<T: Primitive>(&self) -> Result<(), ArrayError> {
        self.shape.require_vector()?;
        if self.element_type.primitive_kind() == Some(T::KIND) {
            Ok(())
        } else {
            tracing::trace!(element = self.element_type.name(), "typed view refused");
            Err(self.kind_mismatch::<T>())
        }
    }

    fn kind_mismatch<T: Primitive>(&self) -> ArrayError {
        ArrayError::TypeMismatch {
            expected: self.element_type.name(),
            found: alloc::format!("{:?}", T::KIND),
        }
    }
}

fn invalid_range(start: usize, length: usize, available: usize) -> ArrayError {
    ArrayError::InvalidRange {
        offset: start as isize,
        length,
        available,
    }
}

impl IndexedAccess for Array {
    fn count(&self) -> usize {
        self.len()
    }

    fn get(&self, offset: usize) -> Option<Value> {
        Array::get(self, offset)
    }

    fn set(&mut self, offset: usize, value: Value) -> Result<(), ArrayError> {
        Array::set(self, offset, value)
    }
}
