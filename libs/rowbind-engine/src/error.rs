use rowbind_api::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Error from the row set itself, passed through untouched so the caller
    /// can act on its kind (reconnect, retry).
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Single-record materialization found no rows.
    #[error("empty result set")]
    EmptyResult,

    /// The destination cannot receive the result. Raised before any row is read.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Add context to the error.
    ///
    /// For `Source`, context is added to the inner `SourceError`.
    /// For message-carrying variants, context is prepended to the message.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Source(e) => EngineError::Source(e.with_context(ctx)),
            EngineError::InvalidDestination(msg) => {
                EngineError::InvalidDestination(format!("{ctx}: {msg}"))
            }
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, EngineError::EmptyResult)
    }

    /// The underlying row-set error, if this is one.
    pub fn source_error(&self) -> Option<&SourceError> {
        match self {
            EngineError::Source(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rowbind_api::SourceErrorKind;

    use super::*;

    #[test]
    fn source_errors_display_verbatim() {
        let err: EngineError = SourceError::connection("connection refused").into();
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.source_error().unwrap().kind(), SourceErrorKind::Connection);
    }

    #[test]
    fn context_goes_into_source_error() {
        let err = EngineError::from(SourceError::query("syntax error")).with_context("accounts");
        assert_eq!(err.to_string(), "accounts: syntax error");
        assert_eq!(err.source_error().unwrap().kind(), SourceErrorKind::Query);
    }

    #[test]
    fn empty_result() {
        assert!(EngineError::EmptyResult.is_empty_result());
        assert_eq!(EngineError::EmptyResult.with_context("x").to_string(), "empty result set");
    }
}
