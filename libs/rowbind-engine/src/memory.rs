//! In-memory row sets and backend.
//!
//! Used by the test suites and by callers who need to feed already decoded
//! rows through the encoders or the materializer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use rowbind_api::{RowSet, SourceError, Value};

use crate::backend::{Backend, Query};

/// Row set over rows held in memory, with injectable failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    /// Index of the current row; `None` before the first `next()`.
    cursor: Option<usize>,
    closed: bool,
    closes: Arc<AtomicUsize>,
    columns_err: Option<SourceError>,
    scan_err: Option<(usize, SourceError)>,
    sticky_err: Option<SourceError>,
    broken: Option<SourceError>,
    close_err: Option<SourceError>,
}

impl MemoryRowSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Vec<Value>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// `columns()` fails with `err`.
    pub fn fail_columns(mut self, err: SourceError) -> Self {
        self.columns_err = Some(err);
        self
    }

    /// `scan()` fails with `err` on row `index` (zero based).
    pub fn fail_scan_at(mut self, index: usize, err: SourceError) -> Self {
        self.scan_err = Some((index, err));
        self
    }

    /// `err()` reports `err` once every row has been read.
    pub fn fail_after_rows(mut self, err: SourceError) -> Self {
        self.sticky_err = Some(err);
        self
    }

    /// The cursor is broken from the start: `next()` is always `false`
    /// and `err()` reports `err`.
    pub fn broken(mut self, err: SourceError) -> Self {
        self.broken = Some(err);
        self
    }

    /// `close()` counts the call and then fails with `err`.
    pub fn fail_close(mut self, err: SourceError) -> Self {
        self.close_err = Some(err);
        self
    }

    /// Shared counter of `close()` calls; stays readable after the row set is moved.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }

    fn exhausted(&self) -> bool {
        self.cursor.is_some_and(|c| c >= self.rows.len())
    }
}

impl RowSet for MemoryRowSet {
    fn columns(&self) -> Result<Vec<String>, SourceError> {
        if self.closed {
            return Err(SourceError::closed("rows are closed"));
        }
        if let Some(e) = &self.columns_err {
            return Err(e.clone());
        }
        Ok(self.columns.clone())
    }

    fn next(&mut self) -> bool {
        if self.closed || self.broken.is_some() || self.exhausted() {
            return false;
        }
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next);
        next < self.rows.len()
    }

    fn scan(&mut self, dest: &mut [Value]) -> Result<(), SourceError> {
        if self.closed {
            return Err(SourceError::closed("rows are closed"));
        }
        let index = match self.cursor {
            Some(c) if c < self.rows.len() => c,
            _ => return Err(SourceError::scan("scan called without a successful next")),
        };
        if dest.len() != self.columns.len() {
            return Err(SourceError::scan(format!(
                "expected {} destination arguments in scan, not {}",
                self.columns.len(),
                dest.len()
            )));
        }
        if let Some((at, e)) = &self.scan_err {
            if *at == index {
                return Err(e.clone());
            }
        }

        let row = &self.rows[index];
        for (i, holder) in dest.iter_mut().enumerate() {
            // Short rows read as NULL in the missing columns.
            *holder = row.get(i).cloned().unwrap_or_default();
        }
        Ok(())
    }

    fn err(&self) -> Option<SourceError> {
        if let Some(e) = &self.broken {
            return Some(e.clone());
        }
        if self.exhausted() {
            return self.sticky_err.clone();
        }
        None
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
        match &self.close_err {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

/// Backend answering queries from a queue of canned results.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    results: Mutex<VecDeque<Result<MemoryRowSet, SourceError>>>,
    received: Mutex<Vec<Query>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `rows` as the answer to the next query.
    pub fn push_rows(&self, rows: MemoryRowSet) -> &Self {
        lock(&self.results).push_back(Ok(rows));
        self
    }

    /// Queue a failure for the next query.
    pub fn push_error(&self, err: SourceError) -> &Self {
        lock(&self.results).push_back(Err(err));
        self
    }

    pub fn pending(&self) -> usize {
        lock(&self.results).len()
    }

    /// Every query received so far, oldest first.
    pub fn queries(&self) -> Vec<Query> {
        lock(&self.received).clone()
    }
}

impl Backend for MemoryBackend {
    type Rows = MemoryRowSet;

    fn query(&self, query: &Query) -> Result<MemoryRowSet, SourceError> {
        lock(&self.received).push(query.clone());
        match lock(&self.results).pop_front() {
            Some(result) => result,
            None => Err(SourceError::query(format!("no result queued for `{}`", query.text))),
        }
    }

    /// Pops the next queued result like `query`; queued rows are closed and discarded.
    fn execute(&self, query: &Query) -> Result<(), SourceError> {
        self.query(query)?.close()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(g) => g,
        Err(poisoned) => {
            tracing::warn!("memory backend lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}
