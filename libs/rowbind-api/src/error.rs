use std::fmt;

/// Category of a cursor-level error. Lets callers decide what to do
/// (reconnect, retry the query, give up) without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Connection to the backing store failed or was lost.
    Connection,
    /// The store rejected the query.
    Query,
    /// Reading the current row failed.
    Scan,
    /// The row set was used after `close()`.
    Closed,
    /// I/O error while writing encoded output.
    Io,
    /// Anything else (invalid state, bad option, generic).
    Logic,
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceErrorKind::Connection => f.write_str("connection"),
            SourceErrorKind::Query => f.write_str("query"),
            SourceErrorKind::Scan => f.write_str("scan"),
            SourceErrorKind::Closed => f.write_str("closed"),
            SourceErrorKind::Io => f.write_str("io"),
            SourceErrorKind::Logic => f.write_str("logic"),
        }
    }
}

/// Error raised by a `RowSet` or while encoding its rows.
///
/// The engine never wraps or rewrites it: whatever the backend adapter
/// produced is what the caller receives.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, message: msg.into() }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Connection, msg)
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Query, msg)
    }

    pub fn scan(msg: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Scan, msg)
    }

    pub fn closed(msg: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Closed, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Io, msg)
    }

    pub fn logic(msg: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Logic, msg)
    }

    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Add context to the error, preserving the original kind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Debug for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

impl From<String> for SourceError {
    fn from(s: String) -> Self {
        Self::logic(s)
    }
}

impl From<&str> for SourceError {
    fn from(s: &str) -> Self {
        Self::logic(s)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}
