use std::ops::{Deref, DerefMut};

use crate::error::SourceError;
use crate::value::Value;

/// Forward-only cursor over named, dynamically typed rows.
///
/// Implemented by thin backend adapters (SQL driver, directory search,
/// document store). Contract:
/// - `columns()` is stable for the lifetime of the row set
/// - `scan()` is valid only after `next()` returned `true`
/// - `scan()` receives exactly one holder per column
/// - `err()` is sticky: once set it keeps returning the same error
/// - `close()` is idempotent
pub trait RowSet {
    fn columns(&self) -> Result<Vec<String>, SourceError>;

    /// Advance to the next row. `false` once exhausted (or on error, see `err()`).
    fn next(&mut self) -> bool;

    /// Fill `dest` with the current row, one holder per column.
    fn scan(&mut self, dest: &mut [Value]) -> Result<(), SourceError>;

    /// Terminal error of the cursor, if any.
    fn err(&self) -> Option<SourceError>;

    fn close(&mut self) -> Result<(), SourceError>;
}

impl<R: RowSet + ?Sized> RowSet for &mut R {
    fn columns(&self) -> Result<Vec<String>, SourceError> {
        (**self).columns()
    }

    fn next(&mut self) -> bool {
        (**self).next()
    }

    fn scan(&mut self, dest: &mut [Value]) -> Result<(), SourceError> {
        (**self).scan(dest)
    }

    fn err(&self) -> Option<SourceError> {
        (**self).err()
    }

    fn close(&mut self) -> Result<(), SourceError> {
        (**self).close()
    }
}

impl<R: RowSet + ?Sized> RowSet for Box<R> {
    fn columns(&self) -> Result<Vec<String>, SourceError> {
        (**self).columns()
    }

    fn next(&mut self) -> bool {
        (**self).next()
    }

    fn scan(&mut self, dest: &mut [Value]) -> Result<(), SourceError> {
        (**self).scan(dest)
    }

    fn err(&self) -> Option<SourceError> {
        (**self).err()
    }

    fn close(&mut self) -> Result<(), SourceError> {
        (**self).close()
    }
}

/// Owns a row set and closes it exactly once.
///
/// Closing happens either explicitly through [`close`](Self::close), which
/// reports the error, or on drop, which can only log it.
pub struct RowSetGuard<R: RowSet> {
    rows: R,
    closed: bool,
}

impl<R: RowSet> RowSetGuard<R> {
    pub fn new(rows: R) -> Self {
        Self { rows, closed: false }
    }

    pub fn close(mut self) -> Result<(), SourceError> {
        self.closed = true;
        self.rows.close()
    }
}

impl<R: RowSet> Deref for RowSetGuard<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.rows
    }
}

impl<R: RowSet> DerefMut for RowSetGuard<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.rows
    }
}

impl<R: RowSet> Drop for RowSetGuard<R> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.rows.close() {
            tracing::warn!(error = %e, "failed to close row set");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingRows {
        closes: usize,
        fail_close: bool,
    }

    impl RowSet for CountingRows {
        fn columns(&self) -> Result<Vec<String>, SourceError> {
            Ok(Vec::new())
        }

        fn next(&mut self) -> bool {
            false
        }

        fn scan(&mut self, _dest: &mut [Value]) -> Result<(), SourceError> {
            Err(SourceError::scan("no current row"))
        }

        fn err(&self) -> Option<SourceError> {
            None
        }

        fn close(&mut self) -> Result<(), SourceError> {
            self.closes += 1;
            if self.fail_close {
                return Err(SourceError::connection("reset by peer"));
            }
            Ok(())
        }
    }

    #[test]
    fn drop_closes_once() {
        let mut rows = CountingRows::default();
        {
            let guard = RowSetGuard::new(&mut rows);
            assert!(guard.columns().unwrap().is_empty());
        }
        assert_eq!(rows.closes, 1);
    }

    #[test]
    fn explicit_close_is_not_repeated_on_drop() {
        let mut rows = CountingRows { closes: 0, fail_close: true };
        let guard = RowSetGuard::new(&mut rows);
        let err = guard.close().unwrap_err();
        assert_eq!(err.message(), "reset by peer");
        assert_eq!(rows.closes, 1);
    }
}
