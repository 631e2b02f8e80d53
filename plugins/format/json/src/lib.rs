//! Row set → JSON text.
//!
//! Hand-rolled rather than serde-based: the output contract is byte-exact
//! (sparse objects, HTML-safe escaping, base64 bytes, fixed timestamp layout)
//! and it runs once per cell.

pub mod escape;

use std::fmt::Write as _;

use rowbind_api::format::{write_base64, write_timestamp, TimestampLayout};
use rowbind_api::{RowSet, SourceError, Value};

use crate::escape::{escape_string, write_escaped};

/// Column names pre-rendered as escaped JSON object keys (`"name":`).
///
/// Built once per result set, reused for every row.
#[derive(Debug, Clone)]
pub struct JsonColumns {
    keys: Vec<String>,
}

impl JsonColumns {
    pub fn new(names: &[String]) -> Self {
        let keys = names
            .iter()
            .map(|name| {
                let mut key = escape_string(name);
                key.push(':');
                key
            })
            .collect();
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Append one row as a JSON object. Null cells are omitted entirely.
pub fn write_row(out: &mut String, columns: &JsonColumns, values: &[Value]) {
    out.push('{');
    let mut first = true;
    for (key, value) in columns.keys.iter().zip(values) {
        let start = out.len();
        if !first {
            out.push(',');
        }
        out.push_str(key);
        if write_value(out, value) {
            first = false;
        } else {
            out.truncate(start);
        }
    }
    out.push('}');
}

/// Append the JSON text of `value`.
///
/// Returns `false` when the value has no JSON representation in a sparse
/// object (NULL, non-finite floats); nothing is written in that case.
pub fn write_value(out: &mut String, value: &Value) -> bool {
    match value {
        Value::Null => return false,
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Bytes(bytes) if bytes.is_empty() => out.push_str("null"),
        Value::Bytes(bytes) => {
            out.push('"');
            write_base64(out, bytes);
            out.push('"');
        }
        Value::Timestamp(ts) => {
            out.push('"');
            write_timestamp(out, ts, TimestampLayout::DateTime);
            out.push('"');
        }
        Value::Int8(v) => push_display(out, v),
        Value::Int16(v) => push_display(out, v),
        Value::Int32(v) => push_display(out, v),
        Value::Int64(v) => push_display(out, v),
        Value::UInt8(v) => push_display(out, v),
        Value::UInt16(v) => push_display(out, v),
        Value::UInt32(v) => push_display(out, v),
        Value::UInt64(v) => push_display(out, v),
        Value::Float32(v) if v.is_finite() => write_float(out, v),
        Value::Float64(v) if v.is_finite() => write_float(out, v),
        Value::Float32(_) | Value::Float64(_) => return false,
        Value::String(s) => write_escaped(out, s),
        Value::Other(v) => write_escaped(out, &v.to_string()),
    }
    true
}

fn push_display(out: &mut String, v: impl std::fmt::Display) {
    let _ = write!(out, "{v}");
}

/// Shortest round-trip digits. Plain decimal for exponents in `-4..21`,
/// otherwise `d.ddde±XX` with at least two exponent digits.
fn write_float<F: std::fmt::Display + std::fmt::LowerExp>(out: &mut String, v: F) {
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        push_display(out, v);
        return;
    };
    let exp: i32 = match exp.parse() {
        Ok(e) => e,
        Err(_) => {
            push_display(out, v);
            return;
        }
    };
    if (-4..21).contains(&exp) {
        push_display(out, v);
        return;
    }
    let sign = if exp < 0 { '-' } else { '+' };
    let _ = write!(out, "{mantissa}e{sign}{:02}", exp.unsigned_abs());
}

/// Encode one row (`names[i]` ↔ `values[i]`) as a JSON object.
pub fn encode_row(names: &[String], values: &[Value]) -> String {
    let mut out = String::new();
    write_row(&mut out, &JsonColumns::new(names), values);
    out
}

/// Encode every remaining row as a JSON array. No rows → `[]`.
pub fn encode_rows<R: RowSet + ?Sized>(rows: &mut R) -> Result<String, SourceError> {
    let (columns, mut holders) = prepare(rows)?;

    let mut out = String::from("[");
    let mut count = 0usize;
    while rows.next() {
        rows.scan(&mut holders)?;
        if count > 0 {
            out.push(',');
        }
        write_row(&mut out, &columns, &holders);
        count += 1;
    }
    if let Some(e) = rows.err() {
        return Err(e);
    }
    out.push(']');

    tracing::debug!(rows = count, bytes = out.len(), "encoded json array");
    Ok(out)
}

/// Encode only the first row as a JSON object. No rows → empty string
/// (not an error, unlike single-record materialization).
pub fn encode_first_row<R: RowSet + ?Sized>(rows: &mut R) -> Result<String, SourceError> {
    let (columns, mut holders) = prepare(rows)?;

    let mut out = String::new();
    if rows.next() {
        rows.scan(&mut holders)?;
        write_row(&mut out, &columns, &holders);
    } else if let Some(e) = rows.err() {
        return Err(e);
    }
    Ok(out)
}

fn prepare<R: RowSet + ?Sized>(rows: &R) -> Result<(JsonColumns, Vec<Value>), SourceError> {
    if let Some(e) = rows.err() {
        return Err(e);
    }
    let names = rows.columns()?;
    let holders = vec![Value::Null; names.len()];
    Ok((JsonColumns::new(&names), holders))
}
