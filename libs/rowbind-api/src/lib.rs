// Lets `#[derive(Record)]` resolve `rowbind_api::...` paths inside this crate too.
extern crate self as rowbind_api;

pub use rowbind_api_derive::Record;

pub mod error;
pub mod format;
pub mod mapping;
pub mod record;
pub mod rowset;
pub mod schema;
pub mod value;

pub use error::{SourceError, SourceErrorKind};
pub use mapping::{ColumnBinding, ColumnFieldMap, FieldLocator};
pub use record::{FieldSlot, Record, Slot};
pub use rowset::{RowSet, RowSetGuard};
pub use schema::{FieldDescriptor, FieldKind, Shape};
pub use value::{Opaque, OpaqueValue, Value};
