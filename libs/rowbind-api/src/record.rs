use std::any::Any;

use chrono::NaiveDateTime;

use crate::schema::{FieldKind, Shape};

/// Writable handle to one destination field: either a bare `T` or an
/// `Option<T>` (the nullable form).
pub enum Slot<'a, T> {
    Bare(&'a mut T),
    Nullable(&'a mut Option<T>),
}

impl<T> Slot<'_, T> {
    pub fn set(self, value: T) {
        match self {
            Slot::Bare(dest) => *dest = value,
            Slot::Nullable(dest) => *dest = Some(value),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Slot::Nullable(_))
    }
}

/// Typed, mutable view of one destination field.
///
/// Produced by [`Record::field_mut`]; consumed by the value coercer.
pub enum FieldSlot<'a> {
    Bool(Slot<'a, bool>),
    Int8(Slot<'a, i8>),
    Int16(Slot<'a, i16>),
    Int32(Slot<'a, i32>),
    Int64(Slot<'a, i64>),
    UInt8(Slot<'a, u8>),
    UInt16(Slot<'a, u16>),
    UInt32(Slot<'a, u32>),
    UInt64(Slot<'a, u64>),
    Float32(Slot<'a, f32>),
    Float64(Slot<'a, f64>),
    String(Slot<'a, String>),
    Bytes(Slot<'a, Vec<u8>>),
    Timestamp(Slot<'a, NaiveDateTime>),
    /// Any other field type. Only an identically-typed opaque value fits.
    Other(&'a mut dyn Any),
}

impl FieldSlot<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldSlot::Bool(_) => FieldKind::Bool,
            FieldSlot::Int8(_) => FieldKind::Int8,
            FieldSlot::Int16(_) => FieldKind::Int16,
            FieldSlot::Int32(_) => FieldKind::Int32,
            FieldSlot::Int64(_) => FieldKind::Int64,
            FieldSlot::UInt8(_) => FieldKind::UInt8,
            FieldSlot::UInt16(_) => FieldKind::UInt16,
            FieldSlot::UInt32(_) => FieldKind::UInt32,
            FieldSlot::UInt64(_) => FieldKind::UInt64,
            FieldSlot::Float32(_) => FieldKind::Float32,
            FieldSlot::Float64(_) => FieldKind::Float64,
            FieldSlot::String(_) => FieldKind::String,
            FieldSlot::Bytes(_) => FieldKind::Bytes,
            FieldSlot::Timestamp(_) => FieldKind::Timestamp,
            FieldSlot::Other(_) => FieldKind::Other,
        }
    }
}

/// A destination record the engine can populate.
///
/// Implement with `#[derive(Record)]`. The derive generates a static
/// [`Shape`] once per type, so no per-row introspection happens.
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Account {
///     #[record(rename = "AccountID")]
///     pub id: i64,
///     pub name: String,
///     pub closed_at: Option<NaiveDateTime>,
/// }
/// ```
pub trait Record: Default + 'static {
    fn shape() -> &'static Shape;

    /// Mutable view of the field at `index` in `shape().fields`.
    ///
    /// `None` for out-of-range indexes and non-settable fields.
    fn field_mut(&mut self, index: usize) -> Option<FieldSlot<'_>>;
}
