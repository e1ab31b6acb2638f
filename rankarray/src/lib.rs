//! Arrays of any rank, lower bounds and element type, with the typed views and
//! slot layouts the `rankarray-ops` engines are written against.
#![no_std]

extern crate alloc;

pub use array::Array;
pub use element::{
    DynObject, ElementType, NaturalOrder, Primitive, PrimitiveKind, StructuralEq, Value,
};
pub use error::{ArrayError, CompareError, ComparerFailure, ShapeMismatch};
pub use layouts::{Boxed, BoxedMut, IndexedAccess, Parallel, SlotIter, Slots, SlotsMut};
pub use shape::{flatten, unflatten, Shape};
pub use view::{TypedView, TypedViewMut};

pub mod array;
pub mod element;
pub mod error;
pub mod layouts;
pub mod shape;
mod storage;
pub mod view;
