use rankarray::{Array, PrimitiveKind};

/// Implementation an operation on an `Array` runs, picked once per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path {
    Typed(PrimitiveKind),
    Generic,
}

impl Path {
    /// The typed path needs a one-dimensional primitive array and an
    /// operation that is content with the elements' natural behavior.
    pub fn select(operation: &'static str, array: &Array, natural: bool) -> Path {
        let path = match array.element_type().primitive_kind() {
            Some(kind) if natural && array.rank() == 1 => Path::Typed(kind),
            _ => Path::Generic,
        };
        tracing::debug!(operation, element = array.element_type().name(), ?path, "selected path");
        path
    }
}
