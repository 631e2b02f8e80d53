//! Row set → typed records.

use std::sync::Arc;

use rowbind_api::{ColumnFieldMap, Record, RowSet, Value};

use crate::cache::MapCache;
use crate::coerce::coerce;
use crate::error::EngineError;

/// Fills records from a row set, optionally sharing column maps through a
/// [`MapCache`].
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    cache: Option<Arc<MapCache>>,
}

impl Materializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: Arc<MapCache>) -> Self {
        Self { cache: Some(cache) }
    }

    pub fn cache(&self) -> Option<&Arc<MapCache>> {
        self.cache.as_ref()
    }

    fn column_map<T: Record>(&self, columns: &[String]) -> Arc<ColumnFieldMap> {
        match &self.cache {
            Some(cache) => cache.get_or_build::<T>(columns),
            None => Arc::new(ColumnFieldMap::build(columns, T::shape())),
        }
    }

    /// Append one record per remaining row to `dest`.
    ///
    /// Rows already in `dest` are kept. An empty row set leaves it as is and
    /// returns `Ok(0)`.
    pub fn read_all<T, R>(&self, rows: &mut R, dest: &mut Vec<T>) -> Result<usize, EngineError>
    where
        T: Record,
        R: RowSet + ?Sized,
    {
        if let Some(e) = rows.err() {
            return Err(e.into());
        }
        let columns = rows.columns()?;
        let map = self.column_map::<T>(&columns);
        let mut holders = vec![Value::Null; columns.len()];

        let start = dest.len();
        while rows.next() {
            rows.scan(&mut holders)?;
            let mut record = T::default();
            apply_row(&map, &holders, &mut record);
            dest.push(record);
        }
        if let Some(e) = rows.err() {
            return Err(e.into());
        }

        let count = dest.len() - start;
        tracing::debug!(
            shape = T::shape().name,
            rows = count,
            mapped = map.len(),
            "materialized rows"
        );
        Ok(count)
    }

    /// Fill `dest` from the first row. Further rows are not read.
    ///
    /// No rows gives [`EngineError::EmptyResult`] and `dest` is untouched.
    pub fn read_one<T, R>(&self, rows: &mut R, dest: &mut T) -> Result<(), EngineError>
    where
        T: Record,
        R: RowSet + ?Sized,
    {
        if let Some(e) = rows.err() {
            return Err(e.into());
        }
        if !rows.next() {
            return match rows.err() {
                Some(e) => Err(e.into()),
                None => Err(EngineError::EmptyResult),
            };
        }
        let columns = rows.columns()?;
        let map = self.column_map::<T>(&columns);
        let mut holders = vec![Value::Null; columns.len()];
        rows.scan(&mut holders)?;

        let applied = apply_row(&map, &holders, dest);
        tracing::trace!(shape = T::shape().name, applied, "materialized single row");
        Ok(())
    }
}

/// Coerce each bound holder into its field. Returns how many fields were written.
pub fn apply_row<T: Record>(map: &ColumnFieldMap, holders: &[Value], dest: &mut T) -> usize {
    let mut applied = 0;
    for binding in map.bindings() {
        let Some(value) = holders.get(binding.column) else {
            continue;
        };
        let Some(slot) = dest.field_mut(binding.field.index) else {
            continue;
        };
        if coerce(value, slot) {
            applied += 1;
        }
    }
    applied
}

/// [`Materializer::read_all`] without a cache.
pub fn read_all<T, R>(rows: &mut R, dest: &mut Vec<T>) -> Result<usize, EngineError>
where
    T: Record,
    R: RowSet + ?Sized,
{
    Materializer::new().read_all(rows, dest)
}

/// [`Materializer::read_one`] without a cache.
pub fn read_one<T, R>(rows: &mut R, dest: &mut T) -> Result<(), EngineError>
where
    T: Record,
    R: RowSet + ?Sized,
{
    Materializer::new().read_one(rows, dest)
}
