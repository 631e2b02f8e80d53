#![allow(dead_code)]

use std::sync::Once;

use rowbind_engine::{MemoryBackend, MemoryRowSet};

static INIT: Once = Once::new();

/// Route engine logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Backend answering the next query with `rows`.
pub fn backend_with(rows: MemoryRowSet) -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend.push_rows(rows);
    backend
}

pub fn int_string_rows() -> MemoryRowSet {
    MemoryRowSet::new(["IntVal", "StringVal"])
        .row(vec![1i64.into(), "hello".into()])
        .row(vec![2i64.into(), "world".into()])
}
