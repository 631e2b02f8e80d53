//! Query facade over a backend adapter.
//!
//! Every call opens a row set, wraps it in a [`RowSetGuard`] and lets the
//! guard close it once the result is produced or an error is returned.

use std::io::Write;
use std::sync::Arc;

use codec_csv::CsvEncoder;
use rowbind_api::{FieldSlot, Record, RowSet, RowSetGuard, SourceError, Value};

use crate::cache::MapCache;
use crate::coerce::coerce;
use crate::config::ClientConfig;
use crate::error::EngineError;
use crate::materialize::Materializer;

/// Query text plus positional arguments.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub text: String,
    pub args: Vec<Value>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }
}

/// Adapter for one kind of store (SQL driver, directory search, ...).
pub trait Backend {
    type Rows: RowSet;

    fn query(&self, query: &Query) -> Result<Self::Rows, SourceError>;

    /// Run a statement that returns no rows.
    fn execute(&self, query: &Query) -> Result<(), SourceError>;
}

impl<B: Backend + ?Sized> Backend for &B {
    type Rows = B::Rows;

    fn query(&self, query: &Query) -> Result<Self::Rows, SourceError> {
        (**self).query(query)
    }

    fn execute(&self, query: &Query) -> Result<(), SourceError> {
        (**self).execute(query)
    }
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    type Rows = B::Rows;

    fn query(&self, query: &Query) -> Result<Self::Rows, SourceError> {
        (**self).query(query)
    }

    fn execute(&self, query: &Query) -> Result<(), SourceError> {
        (**self).execute(query)
    }
}

pub struct Client<B: Backend> {
    backend: B,
    config: ClientConfig,
    materializer: Materializer,
    csv: CsvEncoder,
}

impl<B: Backend> Client<B> {
    pub fn new(backend: B) -> Self {
        let config = ClientConfig::default();
        Self {
            backend,
            materializer: Materializer::new(),
            csv: CsvEncoder::new(config.csv.clone()),
            config,
        }
    }

    /// Build a client from `config`, rejecting CSV options that would corrupt output.
    pub fn with_config(backend: B, config: ClientConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let materializer = if config.cache_column_maps {
            Materializer::with_cache(Arc::new(MapCache::new()))
        } else {
            Materializer::new()
        };
        let csv = CsvEncoder::new(config.csv.clone());
        Ok(Self {
            backend,
            config,
            materializer,
            csv,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn open(&self, query: &Query) -> Result<RowSetGuard<B::Rows>, EngineError> {
        tracing::trace!(query = %query.text, args = query.args.len(), "running query");
        let rows = self.backend.query(query)?;
        Ok(RowSetGuard::new(rows))
    }

    /// Run a statement that returns no rows (insert, update, DDL).
    pub fn execute(&self, query: &Query) -> Result<(), EngineError> {
        tracing::trace!(query = %query.text, args = query.args.len(), "executing statement");
        Ok(self.backend.execute(query)?)
    }

    /// All rows as a JSON array.
    pub fn query_json(&self, query: &Query) -> Result<String, EngineError> {
        let mut rows = self.open(query)?;
        Ok(codec_json::encode_rows(&mut *rows)?)
    }

    /// First row as a JSON object, empty string when there are no rows.
    pub fn query_json_row(&self, query: &Query) -> Result<String, EngineError> {
        let mut rows = self.open(query)?;
        Ok(codec_json::encode_first_row(&mut *rows)?)
    }

    /// Append every row to `dest`. Returns the number of rows appended.
    pub fn query_struct<T: Record>(
        &self,
        query: &Query,
        dest: &mut Vec<T>,
    ) -> Result<usize, EngineError> {
        let mut rows = self.open(query)?;
        self.materializer.read_all(&mut *rows, dest)
    }

    /// Fill `dest` from the first row; [`EngineError::EmptyResult`] if there is none.
    pub fn query_struct_row<T: Record>(
        &self,
        query: &Query,
        dest: &mut T,
    ) -> Result<(), EngineError> {
        let mut rows = self.open(query)?;
        self.materializer.read_one(&mut *rows, dest)
    }

    /// Write the result as CSV to `out`. Returns the number of data rows.
    pub fn query_write_csv<W: Write>(&self, query: &Query, out: W) -> Result<usize, EngineError> {
        let mut rows = self.open(query)?;
        Ok(self.csv.write(&mut *rows, out)?)
    }

    /// The result as a CSV document.
    pub fn query_csv(&self, query: &Query) -> Result<String, EngineError> {
        let mut rows = self.open(query)?;
        Ok(self.csv.encode(&mut *rows)?)
    }

    /// Coerce the first row's columns, in order, into `dest`.
    ///
    /// `dest` must hold exactly one slot per column; this is checked before
    /// any row is read.
    pub fn query_values(
        &self,
        query: &Query,
        dest: Vec<FieldSlot<'_>>,
    ) -> Result<(), EngineError> {
        let mut rows = self.open(query)?;
        if let Some(e) = rows.err() {
            return Err(e.into());
        }
        let columns = rows.columns()?;
        if dest.len() != columns.len() {
            return Err(EngineError::InvalidDestination(format!(
                "{} destinations for {} columns",
                dest.len(),
                columns.len()
            )));
        }
        if !rows.next() {
            return match rows.err() {
                Some(e) => Err(e.into()),
                None => Err(EngineError::EmptyResult),
            };
        }
        let mut holders = vec![Value::Null; columns.len()];
        rows.scan(&mut holders)?;
        for (value, slot) in holders.iter().zip(dest) {
            coerce(value, slot);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rowbind_api::{Slot, SourceErrorKind};

    use super::*;
    use crate::memory::{MemoryBackend, MemoryRowSet};

    fn pair() -> MemoryRowSet {
        MemoryRowSet::new(["n", "s"]).row(vec![7i32.into(), "seven".into()])
    }

    #[test]
    fn query_builder_collects_args() {
        let q = Query::new("select * from t where a = ? and b = ?").arg(1i64).arg("x");
        assert_eq!(q.args.len(), 2);
        assert!(matches!(q.args[1], Value::String(ref s) if s == "x"));
    }

    #[test]
    fn values_are_coerced_positionally() {
        let backend = MemoryBackend::new();
        let rows = pair();
        let closes = rows.close_counter();
        backend.push_rows(rows);
        let client = Client::new(&backend);

        let mut n = 0i64;
        let mut s: Option<String> = None;
        client
            .query_values(
                &Query::new("select n, s"),
                vec![
                    FieldSlot::Int64(Slot::Bare(&mut n)),
                    FieldSlot::String(Slot::Nullable(&mut s)),
                ],
            )
            .unwrap();
        assert_eq!(n, 7);
        assert_eq!(s.as_deref(), Some("seven"));
        assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn values_need_one_slot_per_column() {
        let backend = MemoryBackend::new();
        let rows = pair();
        let closes = rows.close_counter();
        backend.push_rows(rows);

        let mut n = 0i64;
        let err = Client::new(&backend)
            .query_values(
                &Query::new("select n, s"),
                vec![FieldSlot::Int64(Slot::Bare(&mut n))],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDestination(_)));
        assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn values_of_empty_result() {
        let backend = MemoryBackend::new();
        backend.push_rows(MemoryRowSet::new(["n"]));
        let mut n = 0i64;
        let err = Client::new(&backend)
            .query_values(&Query::new("select n"), vec![FieldSlot::Int64(Slot::Bare(&mut n))])
            .unwrap_err();
        assert!(err.is_empty_result());
    }

    #[test]
    fn backend_error_passes_through() {
        let backend = MemoryBackend::new();
        backend.push_error(SourceError::connection("dial tcp: refused"));
        let err = Client::new(&backend).query_json(&Query::new("select 1")).unwrap_err();
        assert_eq!(err.source_error().unwrap().kind(), SourceErrorKind::Connection);
        assert_eq!(err.to_string(), "dial tcp: refused");
    }

    #[test]
    fn cache_follows_config() {
        let config = ClientConfig {
            cache_column_maps: true,
            ..ClientConfig::default()
        };
        let client = Client::with_config(MemoryBackend::new(), config).unwrap();
        assert!(client.materializer.cache().is_some());
        assert!(Client::new(MemoryBackend::new()).materializer.cache().is_none());
    }

    #[test]
    fn config_with_quote_delimiter_is_rejected() {
        let mut config = ClientConfig::default();
        config.csv.delimiter = '"';
        let err = Client::with_config(MemoryBackend::new(), config).err().unwrap();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn execute_runs_statement_without_rows() {
        let backend = MemoryBackend::new();
        let rows = MemoryRowSet::new(Vec::<String>::new());
        let closes = rows.close_counter();
        backend.push_rows(rows);
        backend.push_error(SourceError::query("table t does not exist"));
        let client = Client::new(&backend);

        client.execute(&Query::new("insert into t values (?)").arg(1i64)).unwrap();
        assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);

        let err = client.execute(&Query::new("drop table t")).unwrap_err();
        assert_eq!(err.source_error().unwrap().kind(), SourceErrorKind::Query);

        let queries = backend.queries();
        assert_eq!(queries[0].text, "insert into t values (?)");
        assert_eq!(queries[0].args.len(), 1);
        assert_eq!(queries[1].text, "drop table t");
        assert_eq!(backend.pending(), 0);
    }
}
