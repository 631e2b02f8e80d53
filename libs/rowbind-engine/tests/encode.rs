mod common;

use chrono::NaiveDate;
use codec_csv::CsvOptions;
use rowbind_api::{SourceError, Value};
use rowbind_engine::{Client, ClientConfig, MemoryRowSet, Query};

use common::{backend_with, init_tracing, int_string_rows};

fn query() -> Query {
    Query::new("select * from t")
}

#[test]
fn json_array_of_rows() {
    init_tracing();
    let backend = backend_with(int_string_rows());
    let json = Client::new(&backend).query_json(&query()).unwrap();
    assert_eq!(
        json,
        r#"[{"IntVal":1,"StringVal":"hello"},{"IntVal":2,"StringVal":"world"}]"#
    );
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[1]["StringVal"], "world");
}

#[test]
fn json_first_row_only() {
    let backend = backend_with(int_string_rows());
    let json = Client::new(&backend).query_json_row(&query()).unwrap();
    assert_eq!(json, r#"{"IntVal":1,"StringVal":"hello"}"#);
}

#[test]
fn json_of_empty_set() {
    let backend = backend_with(MemoryRowSet::new(["IntVal"]));
    assert_eq!(Client::new(&backend).query_json(&query()).unwrap(), "[]");
}

#[test]
fn json_drops_null_cells() {
    let backend = backend_with(MemoryRowSet::new(["a", "b", "c"]).row(vec![
        Value::Null,
        "x".into(),
        Value::Bytes(Vec::new()),
    ]));
    let json = Client::new(&backend).query_json_row(&query()).unwrap();
    assert_eq!(json, r#"{"b":"x","c":null}"#);
}

#[test]
fn json_escapes_strings_and_encodes_bytes() {
    let ts = NaiveDate::from_ymd_opt(2000, 1, 2)
        .unwrap()
        .and_hms_nano_opt(3, 4, 5, 123_456_789)
        .unwrap();
    let backend = backend_with(MemoryRowSet::new(["s", "b", "t"]).row(vec![
        "hello\n\tworld".into(),
        b"byte".as_slice().into(),
        ts.into(),
    ]));
    let json = Client::new(&backend).query_json_row(&query()).unwrap();
    assert_eq!(
        json,
        r#"{"s":"hello\n\tworld","b":"Ynl0ZQ==","t":"2000-01-02 03:04:05.123"}"#
    );
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["s"], "hello\n\tworld");
}

#[test]
fn csv_document() {
    let backend = backend_with(int_string_rows());
    let csv = Client::new(&backend).query_csv(&query()).unwrap();
    assert_eq!(csv, "IntVal,StringVal\n1,hello\n2,world\n");
}

#[test]
fn csv_uses_configured_options() {
    let ts = NaiveDate::from_ymd_opt(2000, 1, 2)
        .unwrap()
        .and_hms_nano_opt(3, 4, 5, 123_456_789)
        .unwrap();
    let config = ClientConfig {
        csv: CsvOptions {
            date_only: true,
            delimiter: ';',
            use_crlf: true,
        },
        ..ClientConfig::default()
    };
    let backend = backend_with(
        MemoryRowSet::new(["day", "note"]).row(vec![ts.into(), "a;b".into()]),
    );
    let mut out = Vec::new();
    let written = Client::with_config(&backend, config)
        .unwrap()
        .query_write_csv(&query(), &mut out)
        .unwrap();
    assert_eq!(written, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "day;note\r\n2000-01-02;\"a;b\"\r\n");
}

#[test]
fn encoders_report_sticky_errors() {
    let failing = || int_string_rows().fail_after_rows(SourceError::connection("reset"));

    let backend = backend_with(failing());
    assert!(Client::new(&backend).query_json(&query()).is_err());

    let backend = backend_with(failing());
    assert!(Client::new(&backend).query_csv(&query()).is_err());
}
