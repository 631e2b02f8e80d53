//! Row set → CSV text.
//!
//! Header line is the raw column names; each row becomes one record.
//! Cell text follows the JSON encoder for booleans, strings, bytes and
//! timestamps, but numbers and opaque values use plain `Display` output.

mod options;
mod writer;

use std::io::Write;

use rowbind_api::format::{encode_base64, format_timestamp};
use rowbind_api::{RowSet, SourceError, Value};

pub use crate::options::CsvOptions;
use crate::writer::write_record;

/// Text of one cell.
pub fn cell_text(value: &Value, options: &CsvOptions) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Timestamp(ts) => format_timestamp(ts, options.timestamp_layout()),
        Value::String(s) => s.clone(),
        Value::Bytes(bytes) => encode_base64(bytes),
        Value::Int8(v) => v.to_string(),
        Value::Int16(v) => v.to_string(),
        Value::Int32(v) => v.to_string(),
        Value::Int64(v) => v.to_string(),
        Value::UInt8(v) => v.to_string(),
        Value::UInt16(v) => v.to_string(),
        Value::UInt32(v) => v.to_string(),
        Value::UInt64(v) => v.to_string(),
        Value::Float32(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Other(v) => v.to_string(),
    }
}

/// CSV encoder bound to a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct CsvEncoder {
    options: CsvOptions,
}

impl CsvEncoder {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Write the header and every remaining row to `out`.
    ///
    /// Returns the number of data rows written.
    pub fn write<R, W>(&self, rows: &mut R, mut out: W) -> Result<usize, SourceError>
    where
        R: RowSet + ?Sized,
        W: Write,
    {
        if let Some(e) = rows.err() {
            return Err(e);
        }
        let headers = rows.columns()?;
        let mut holders = vec![Value::Null; headers.len()];

        let mut line = String::new();
        write_record(&mut line, headers.iter().map(String::as_str), &self.options);
        out.write_all(line.as_bytes())?;

        let mut count = 0usize;
        let mut cells: Vec<String> = Vec::with_capacity(headers.len());
        while rows.next() {
            rows.scan(&mut holders)?;
            cells.clear();
            cells.extend(holders.iter().map(|v| cell_text(v, &self.options)));

            line.clear();
            write_record(&mut line, cells.iter().map(String::as_str), &self.options);
            out.write_all(line.as_bytes())?;
            count += 1;
        }
        if let Some(e) = rows.err() {
            return Err(e);
        }
        out.flush()?;

        tracing::debug!(rows = count, columns = headers.len(), "encoded csv");
        Ok(count)
    }

    /// Encode the header and every remaining row into a string.
    pub fn encode<R: RowSet + ?Sized>(&self, rows: &mut R) -> Result<String, SourceError> {
        let mut buf = Vec::new();
        self.write(rows, &mut buf)?;
        String::from_utf8(buf).map_err(|e| SourceError::logic(format!("CSV: {e}")))
    }
}

/// Encode `rows` as a CSV document using `options`.
pub fn encode<R: RowSet + ?Sized>(
    rows: &mut R,
    options: &CsvOptions,
) -> Result<String, SourceError> {
    CsvEncoder::new(options.clone()).encode(rows)
}
