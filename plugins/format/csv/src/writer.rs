use crate::options::CsvOptions;

/// Append one CSV record (fields + line terminator) to `out`.
pub(crate) fn write_record<'a>(
    out: &mut String,
    fields: impl IntoIterator<Item = &'a str>,
    options: &CsvOptions,
) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(options.delimiter);
        }
        write_field(out, field, options);
    }
    out.push_str(options.line_terminator());
}

fn write_field(out: &mut String, field: &str, options: &CsvOptions) {
    if !needs_quotes(field, options.delimiter) {
        out.push_str(field);
        return;
    }
    out.push('"');
    for c in field.chars() {
        match c {
            '"' => out.push_str("\"\""),
            // Line breaks inside a field follow the record terminator.
            '\r' if options.use_crlf => {}
            '\n' if options.use_crlf => out.push_str("\r\n"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn needs_quotes(field: &str, delimiter: char) -> bool {
    if field.is_empty() {
        return false;
    }
    // PostgreSQL COPY end-of-data marker.
    if field == r"\." {
        return true;
    }
    field.contains(delimiter)
        || field.contains(['"', '\r', '\n'])
        || field.chars().next().is_some_and(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str], options: &CsvOptions) -> String {
        let mut out = String::new();
        write_record(&mut out, fields.iter().copied(), options);
        out
    }

    #[test]
    fn plain_fields() {
        assert_eq!(record(&["a", "b", ""], &CsvOptions::default()), "a,b,\n");
    }

    #[test]
    fn quotes_when_needed() {
        let opts = CsvOptions::default();
        assert_eq!(record(&["a,b"], &opts), "\"a,b\"\n");
        assert_eq!(record(&["say \"hi\""], &opts), "\"say \"\"hi\"\"\"\n");
        assert_eq!(record(&["two\nlines"], &opts), "\"two\nlines\"\n");
        assert_eq!(record(&[" padded"], &opts), "\" padded\"\n");
        assert_eq!(record(&[r"\."], &opts), "\"\\.\"\n");
    }

    #[test]
    fn custom_delimiter() {
        let opts = CsvOptions { delimiter: ';', ..CsvOptions::default() };
        assert_eq!(record(&["a,b", "c;d"], &opts), "a,b;\"c;d\"\n");
    }

    #[test]
    fn crlf_mode_normalises_embedded_newlines() {
        let opts = CsvOptions { use_crlf: true, ..CsvOptions::default() };
        assert_eq!(record(&["x\r\ny", "z"], &opts), "\"x\r\ny\",z\r\n");
        assert_eq!(record(&["x\ny"], &opts), "\"x\r\ny\"\r\n");
    }
}
