/// Static kind of a destination field.
///
/// Mirrors the scalar variants of [`Value`](crate::value::Value); everything
/// else is `Other` and only accepts an exact type match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bytes,
    Timestamp,
    Other,
}

/// A single field of a destination shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name matched (case-insensitively) against column names.
    pub name: &'static str,
    pub kind: FieldKind,
    /// `true` for `Option<T>` fields.
    pub nullable: bool,
    /// `false` for fields the engine must never write (`#[record(skip)]`).
    pub settable: bool,
}

/// Destination shape: the ordered field list of one record type.
///
/// Field position in `fields` is the index passed to
/// [`Record::field_mut`](crate::record::Record::field_mut).
#[derive(Debug)]
pub struct Shape {
    /// Type name, for logs.
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl Shape {
    pub fn field(&self, index: usize) -> Option<&'static FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
