pub mod backend;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod error;
pub mod materialize;
pub mod memory;

pub use backend::{Backend, Client, Query};
pub use cache::MapCache;
pub use coerce::coerce;
pub use config::ClientConfig;
pub use error::EngineError;
pub use materialize::{read_all, read_one, Materializer};
pub use memory::{MemoryBackend, MemoryRowSet};
