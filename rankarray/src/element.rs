use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::any::Any;
use core::cmp::Ordering;
use core::fmt;
use core::mem::size_of;
use core::ptr;

use bytemuck::Pod;

use crate::error::CompareError;

/// Storage class of a primitive element, the tag the typed fast path is
/// selected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    pub fn size(self) -> usize {
        match self {
            PrimitiveKind::I8 | PrimitiveKind::U8 => 1,
            PrimitiveKind::I16 | PrimitiveKind::U16 => 2,
            PrimitiveKind::I32 | PrimitiveKind::U32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::I64 | PrimitiveKind::U64 | PrimitiveKind::F64 => 8,
        }
    }
}

/// Binds `$T` to the Rust type of a `PrimitiveKind` and evaluates `$body`
/// once for the matching kind.
#[macro_export]
macro_rules! with_primitive {
    ($kind:expr, $T:ident => $body:expr) => {
        match $kind {
            $crate::PrimitiveKind::I8 => { type $T = i8; $body }
            $crate::PrimitiveKind::U8 => { type $T = u8; $body }
            $crate::PrimitiveKind::I16 => { type $T = i16; $body }
            $crate::PrimitiveKind::U16 => { type $T = u16; $body }
            $crate::PrimitiveKind::I32 => { type $T = i32; $body }
            $crate::PrimitiveKind::U32 => { type $T = u32; $body }
            $crate::PrimitiveKind::I64 => { type $T = i64; $body }
            $crate::PrimitiveKind::U64 => { type $T = u64; $body }
            $crate::PrimitiveKind::F32 => { type $T = f32; $body }
            $crate::PrimitiveKind::F64 => { type $T = f64; $body }
        }
    };
}

/// Element type descriptor of an `Array`.
///
/// Every tag except `Object` and `OtherValue` is stored as raw bytes. `Bool`
/// shares the one byte unsigned kind and `Char`, a UTF-16 code unit, shares the
/// two byte unsigned kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Object,
    OtherValue,
}

impl ElementType {
    pub fn primitive_kind(self) -> Option<PrimitiveKind> {
        Some(match self {
            ElementType::Bool | ElementType::U8 => PrimitiveKind::U8,
            ElementType::Char | ElementType::U16 => PrimitiveKind::U16,
            ElementType::I8 => PrimitiveKind::I8,
            ElementType::I16 => PrimitiveKind::I16,
            ElementType::I32 => PrimitiveKind::I32,
            ElementType::U32 => PrimitiveKind::U32,
            ElementType::I64 => PrimitiveKind::I64,
            ElementType::U64 => PrimitiveKind::U64,
            ElementType::F32 => PrimitiveKind::F32,
            ElementType::F64 => PrimitiveKind::F64,
            ElementType::Object | ElementType::OtherValue => return None,
        })
    }

    pub fn is_primitive(self) -> bool {
        self.primitive_kind().is_some()
    }

    /// Byte size of one element; boxed elements report the size of a reference.
    pub fn size(self) -> usize {
        match self.primitive_kind() {
            Some(kind) => kind.size(),
            None => size_of::<usize>(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Bool => "bool",
            ElementType::Char => "char",
            ElementType::I8 => "i8",
            ElementType::U8 => "u8",
            ElementType::I16 => "i16",
            ElementType::U16 => "u16",
            ElementType::I32 => "i32",
            ElementType::U32 => "u32",
            ElementType::I64 => "i64",
            ElementType::U64 => "u64",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
            ElementType::Object => "object",
            ElementType::OtherValue => "value",
        }
    }

    /// Whether `value` may be stored in a slot of this type as is.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ElementType::Object, _) => true,
            (ElementType::OtherValue, Value::Object(_) | Value::Null) => true,
            (ElementType::Bool, Value::Bool(_))
            | (ElementType::Char, Value::Char(_))
            | (ElementType::I8, Value::I8(_))
            | (ElementType::U8, Value::U8(_))
            | (ElementType::I16, Value::I16(_))
            | (ElementType::U16, Value::U16(_))
            | (ElementType::I32, Value::I32(_))
            | (ElementType::U32, Value::U32(_))
            | (ElementType::I64, Value::I64(_))
            | (ElementType::U64, Value::U64(_))
            | (ElementType::F32, Value::F32(_))
            | (ElementType::F64, Value::F64(_)) => true,
            _ => false,
        }
    }
}

pub trait NaturalOrder {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError>;
}

/// Equality used by linear searches: NaN matches NaN and `Null` matches `Null`.
pub trait StructuralEq {
    fn structural_eq(&self, other: &Self) -> bool;
}

mod sealed {
    pub trait Sealed {}
}

pub trait Primitive: Pod + NaturalOrder + StructuralEq + fmt::Debug + sealed::Sealed {
    const KIND: PrimitiveKind;

    fn to_value(self, element_type: ElementType) -> Value;
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! integer_primitive {
    ($($ty:ident => $kind:ident),+) => {$(
        impl sealed::Sealed for $ty {}

        impl NaturalOrder for $ty {
            #[inline]
            fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError> {
                Ok(self.cmp(other))
            }
        }

        impl StructuralEq for $ty {
            #[inline]
            fn structural_eq(&self, other: &Self) -> bool {
                self == other
            }
        }
    )+};
}

macro_rules! float_primitive {
    ($($ty:ident => $kind:ident),+) => {$(
        impl sealed::Sealed for $ty {}

        impl NaturalOrder for $ty {
            #[inline]
            fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError> {
                Ok(match self.partial_cmp(other) {
                    Some(ordering) => ordering,
                    // NaN sorts before every number and equal to itself.
                    None => match (self.is_nan(), other.is_nan()) {
                        (true, true) => Ordering::Equal,
                        (true, false) => Ordering::Less,
                        _ => Ordering::Greater,
                    },
                })
            }
        }

        impl StructuralEq for $ty {
            #[inline]
            fn structural_eq(&self, other: &Self) -> bool {
                self == other || (self.is_nan() && other.is_nan())
            }
        }

        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            fn to_value(self, _element_type: ElementType) -> Value {
                Value::$kind(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match *value {
                    Value::$kind(v) => Some(v),
                    _ => None,
                }
            }
        }
    )+};
}

macro_rules! plain_primitive {
    ($($ty:ident => $kind:ident),+) => {$(
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            fn to_value(self, _element_type: ElementType) -> Value {
                Value::$kind(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match *value {
                    Value::$kind(v) => Some(v),
                    _ => None,
                }
            }
        }
    )+};
}

integer_primitive! {
    i8 => I8, u8 => U8, i16 => I16, u16 => U16,
    i32 => I32, u32 => U32, i64 => I64, u64 => U64
}
float_primitive! { f32 => F32, f64 => F64 }
plain_primitive! { i8 => I8, i16 => I16, i32 => I32, u32 => U32, i64 => I64, u64 => U64 }

impl Primitive for u8 {
    const KIND: PrimitiveKind = PrimitiveKind::U8;

    fn to_value(self, element_type: ElementType) -> Value {
        match element_type {
            ElementType::Bool => Value::Bool(self != 0),
            _ => Value::U8(self),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::U8(v) => Some(v),
            Value::Bool(b) => Some(b as u8),
            _ => None,
        }
    }
}

impl Primitive for u16 {
    const KIND: PrimitiveKind = PrimitiveKind::U16;

    fn to_value(self, element_type: ElementType) -> Value {
        match element_type {
            ElementType::Char => Value::Char(self),
            _ => Value::U16(self),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::U16(v) | Value::Char(v) => Some(v),
            _ => None,
        }
    }
}

impl NaturalOrder for bool {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError> {
        Ok(self.cmp(other))
    }
}

impl StructuralEq for bool {
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl NaturalOrder for str {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError> {
        Ok(self.cmp(other))
    }
}

impl StructuralEq for str {
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl NaturalOrder for String {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError> {
        Ok(self.cmp(other))
    }
}

impl StructuralEq for String {
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: NaturalOrder> NaturalOrder for Option<T> {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError> {
        match (self, other) {
            (Some(a), Some(b)) => a.natural_cmp(b),
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Less),
            (Some(_), None) => Ok(Ordering::Greater),
        }
    }
}

impl<T: StructuralEq> StructuralEq for Option<T> {
    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.structural_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Capability seam for reference elements stored in `Value::Object`.
pub trait DynObject: fmt::Debug + Any {
    fn type_name(&self) -> &str;

    fn natural_cmp(&self, _other: &dyn DynObject) -> Result<Ordering, CompareError> {
        Err(CompareError::Unsupported {
            type_name: self.type_name().to_string(),
        })
    }

    /// Defaults to reference identity.
    fn structural_eq(&self, other: &dyn DynObject) -> bool {
        ptr::addr_eq(self as *const Self, other as *const dyn DynObject)
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(u16),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(Arc<str>),
    Object(Arc<dyn DynObject>),
}

impl Value {
    pub fn object<T: DynObject>(object: T) -> Value {
        Value::Object(Arc::new(object))
    }

    pub fn str(s: &str) -> Value {
        Value::Str(Arc::from(s))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::U8(_) => "u8",
            Value::I16(_) => "i16",
            Value::U16(_) => "u16",
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "str",
            Value::Object(o) => o.type_name(),
        }
    }

    fn mismatch(&self, other: &Value) -> CompareError {
        CompareError::Mismatch {
            left: self.type_name().to_string(),
            right: other.type_name().to_string(),
        }
    }
}

impl NaturalOrder for Value {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering, CompareError> {
        use self::Value::*;
        match (self, other) {
            (Null, Null) => Ok(Ordering::Equal),
            (Null, _) => Ok(Ordering::Less),
            (_, Null) => Ok(Ordering::Greater),
            (Bool(a), Bool(b)) => a.natural_cmp(b),
            (Char(a), Char(b)) | (U16(a), U16(b)) => a.natural_cmp(b),
            (I8(a), I8(b)) => a.natural_cmp(b),
            (U8(a), U8(b)) => a.natural_cmp(b),
            (I16(a), I16(b)) => a.natural_cmp(b),
            (I32(a), I32(b)) => a.natural_cmp(b),
            (U32(a), U32(b)) => a.natural_cmp(b),
            (I64(a), I64(b)) => a.natural_cmp(b),
            (U64(a), U64(b)) => a.natural_cmp(b),
            (F32(a), F32(b)) => a.natural_cmp(b),
            (F64(a), F64(b)) => a.natural_cmp(b),
            (Str(a), Str(b)) => a.natural_cmp(b),
            (Object(a), Object(b)) => a.natural_cmp(&**b),
            _ => Err(self.mismatch(other)),
        }
    }
}

impl StructuralEq for Value {
    fn structural_eq(&self, other: &Self) -> bool {
        use self::Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) | (U16(a), U16(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (F32(a), F32(b)) => a.structural_eq(b),
            (F64(a), F64(b)) => a.structural_eq(b),
            (Str(a), Str(b)) => a == b,
            (Object(a), Object(b)) => a.structural_eq(&**b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.structural_eq(other)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Value {
                Value::$variant(v)
            }
        }
    )+};
}

value_from! {
    bool => Bool, i8 => I8, u8 => U8, i16 => I16, u16 => U16, i32 => I32,
    u32 => U32, i64 => I64, u64 => U64, f32 => F32, f64 => F64
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Value {
        Value::str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Opaque;

    impl DynObject for Opaque {
        fn type_name(&self) -> &str {
            "Opaque"
        }
    }

    #[test]
    fn classifier_aliases() {
        assert_eq!(ElementType::Bool.primitive_kind(), Some(PrimitiveKind::U8));
        assert_eq!(ElementType::Char.primitive_kind(), Some(PrimitiveKind::U16));
        assert_eq!(ElementType::F64.size(), 8);
        assert_eq!(ElementType::Object.primitive_kind(), None);
        assert_eq!(ElementType::OtherValue.size(), size_of::<usize>());
    }

    #[test]
    fn float_order_puts_nan_first() {
        assert_eq!(f64::NAN.natural_cmp(&f64::NEG_INFINITY), Ok(Ordering::Less));
        assert_eq!(f64::NAN.natural_cmp(&f64::NAN), Ok(Ordering::Equal));
        assert_eq!(1.0f32.natural_cmp(&f32::NAN), Ok(Ordering::Greater));
        assert!(f32::NAN.structural_eq(&f32::NAN));
    }

    #[test]
    fn value_ordering() {
        assert_eq!(Value::Null.natural_cmp(&Value::I32(-5)), Ok(Ordering::Less));
        assert_eq!(Value::str("b").natural_cmp(&Value::str("a")), Ok(Ordering::Greater));
        assert!(matches!(
            Value::I32(1).natural_cmp(&Value::I64(1)),
            Err(CompareError::Mismatch { .. })
        ));
        assert!(matches!(
            Value::object(Opaque).natural_cmp(&Value::object(Opaque)),
            Err(CompareError::Unsupported { .. })
        ));
    }

    #[test]
    fn object_equality_defaults_to_identity() {
        let a = Value::object(Opaque);
        let b = a.clone();
        assert!(a.structural_eq(&b));
        assert!(!a.structural_eq(&Value::object(Opaque)));
        assert!(Value::Null.structural_eq(&Value::Null));
        assert!(!Value::I32(0).structural_eq(&Value::Null));
    }

    #[test]
    fn aliased_conversions() {
        assert_eq!(1u8.to_value(ElementType::Bool), Value::Bool(true));
        assert_eq!(u8::from_value(&Value::Bool(true)), Some(1));
        assert_eq!(65u16.to_value(ElementType::Char), Value::Char(65));
        assert!(ElementType::Object.accepts(&Value::Null));
        assert!(!ElementType::I32.accepts(&Value::I64(0)));
    }
}
