use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

/// One scanned column value.
///
/// The set of variants is closed: backend adapters translate whatever their
/// driver returns into one of these, and anything without a dedicated
/// variant travels as `Other`.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// SQL NULL / missing attribute. The only way to express "no value".
    #[default]
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    /// Raw bytes, not necessarily UTF-8.
    Bytes(Vec<u8>),
    /// Zone-naive date and time.
    Timestamp(NaiveDateTime),
    /// Fallback for driver types with no dedicated variant.
    Other(OpaqueValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Wrap an arbitrary driver value.
    pub fn other<T: Opaque>(value: T) -> Self {
        Value::Other(OpaqueValue::new(value))
    }
}

/// A driver value outside the scalar set.
///
/// Blanket-implemented for every cloneable, printable `'static` type, so
/// adapters never implement it by hand.
pub trait Opaque: Any + fmt::Debug + fmt::Display + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Store a copy into `dest` when `dest` is exactly `T` or `Option<T>`.
    /// Returns `false` (and leaves `dest` alone) otherwise.
    fn assign_to(&self, dest: &mut dyn Any) -> bool;
}

impl<T> Opaque for T
where
    T: Any + Clone + fmt::Debug + fmt::Display + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_to(&self, dest: &mut dyn Any) -> bool {
        if let Some(slot) = dest.downcast_mut::<T>() {
            *slot = self.clone();
            return true;
        }
        if let Some(slot) = dest.downcast_mut::<Option<T>>() {
            *slot = Some(self.clone());
            return true;
        }
        false
    }
}

/// Shared handle to an [`Opaque`] value.
#[derive(Clone)]
pub struct OpaqueValue(Arc<dyn Opaque>);

impl OpaqueValue {
    pub fn new<T: Opaque>(value: T) -> Self {
        Self(Arc::new(value))
    }

    // `Arc<dyn Opaque>` is itself `Opaque` through the blanket impl, so the
    // trait object must be reached explicitly before dispatching.
    fn inner(&self) -> &dyn Opaque {
        &*self.0
    }

    pub fn as_any(&self) -> &dyn Any {
        self.inner().as_any()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn assign_to(&self, dest: &mut dyn Any) -> bool {
        self.inner().assign_to(dest)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.inner(), f)
    }
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

// ---------------------------------------------------------------------------
// From impls: native scalars → Value
// ---------------------------------------------------------------------------

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Bytes,
    NaiveDateTime => Timestamp,
    OpaqueValue => Other,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Point(i32, i32);

    impl fmt::Display for Point {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({}, {})", self.0, self.1)
        }
    }

    #[test]
    fn option_none_is_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert!(matches!(Value::from(Some(7i64)), Value::Int64(7)));
    }

    #[test]
    fn opaque_assigns_exact_type_only() {
        let value = OpaqueValue::new(Point(1, 2));

        let mut exact = Point(0, 0);
        assert!(value.assign_to(&mut exact));
        assert_eq!(exact, Point(1, 2));

        let mut nullable: Option<Point> = None;
        assert!(value.assign_to(&mut nullable));
        assert_eq!(nullable, Some(Point(1, 2)));

        let mut wrong = String::new();
        assert!(!value.assign_to(&mut wrong));
        assert!(wrong.is_empty());
    }

    #[test]
    fn opaque_reaches_inner_value() {
        let value = OpaqueValue::new(Point(3, 4));
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point(3, 4)));
        assert_eq!(value.to_string(), "(3, 4)");
    }
}
