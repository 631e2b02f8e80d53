use crate::schema::{FieldDescriptor, Shape};

/// Reference to a destination field (position in `Shape.fields`).
#[derive(Debug, Clone, Copy)]
pub struct FieldLocator {
    /// Position in `Shape.fields`; passed to `Record::field_mut`.
    pub index: usize,
    pub descriptor: &'static FieldDescriptor,
}

/// One source column bound to one destination field.
#[derive(Debug, Clone, Copy)]
pub struct ColumnBinding {
    /// Position in the row set's column list and in the scan holders.
    pub column: usize,
    pub field: FieldLocator,
}

/// Column → field correspondence for one (column set, shape) pair.
///
/// Built once per result set and reused for every row:
/// - bindings follow field declaration order
/// - columns without a field are dropped
/// - fields without a column are not bound (they keep their default)
#[derive(Debug, Clone)]
pub struct ColumnFieldMap {
    shape: &'static str,
    bindings: Vec<ColumnBinding>,
}

impl ColumnFieldMap {
    /// Match `columns` against `shape` by case-insensitive name equality.
    ///
    /// When several columns lower-case to the same name, the first one wins.
    pub fn build(columns: &[String], shape: &'static Shape) -> Self {
        let lowered = lowercase_columns(columns);
        Self::build_lowered(&lowered, shape)
    }

    /// Same as [`build`](Self::build) for columns already passed through
    /// [`lowercase_columns`].
    pub fn build_lowered(lowered: &[String], shape: &'static Shape) -> Self {
        let mut bindings = Vec::new();
        for (index, descriptor) in shape.fields.iter().enumerate() {
            let wanted = descriptor.name.to_lowercase();
            if let Some(column) = lowered.iter().position(|c| *c == wanted) {
                bindings.push(ColumnBinding {
                    column,
                    field: FieldLocator { index, descriptor },
                });
            }
        }
        Self {
            shape: shape.name,
            bindings,
        }
    }

    pub fn shape_name(&self) -> &'static str {
        self.shape
    }

    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

pub fn lowercase_columns(columns: &[String]) -> Vec<String> {
    columns.iter().map(|c| c.to_lowercase()).collect()
}
