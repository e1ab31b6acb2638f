//! Sort, search and reverse engines over `rankarray` layouts, exposed through
//! a typed surface over slices ([`slice`]) and a loose surface over `Array`
//! handles ([`array`]).
#![no_std]

extern crate alloc;
extern crate rankarray;

pub use compare::{ByKey, CompareFn, Comparer, Comparison, OrderingFn};
pub use dispatch::Path;

pub mod array;
pub mod compare;
pub mod dispatch;
pub mod introsort;
pub mod reverse;
pub mod search;
pub mod slice;
