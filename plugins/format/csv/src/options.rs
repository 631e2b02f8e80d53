use rowbind_api::format::TimestampLayout;
use rowbind_api::SourceError;

/// CSV output options.
///
/// Deserializable from JSON config; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Render timestamps as `YYYY-MM-DD` instead of the full date-time.
    #[serde(alias = "dateOnly")]
    pub date_only: bool,
    pub delimiter: char,
    /// Terminate records (and embedded newlines in quoted fields) with `\r\n`.
    #[serde(alias = "useCrlf")]
    pub use_crlf: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            date_only: false,
            delimiter: ',',
            use_crlf: false,
        }
    }
}

impl CsvOptions {
    pub fn date_only() -> Self {
        Self {
            date_only: true,
            ..Self::default()
        }
    }

    /// Parse options from a JSON object. Empty input → defaults.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: Self = serde_json::from_str(json)
            .map_err(|e| SourceError::logic(format!("CSV: invalid options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), SourceError> {
        match self.delimiter {
            '"' | '\r' | '\n' => Err(SourceError::logic(format!(
                "CSV: delimiter cannot be {:?}",
                self.delimiter
            ))),
            _ => Ok(()),
        }
    }

    pub fn timestamp_layout(&self) -> TimestampLayout {
        if self.date_only {
            TimestampLayout::DateOnly
        } else {
            TimestampLayout::DateTime
        }
    }

    pub(crate) fn line_terminator(&self) -> &'static str {
        if self.use_crlf { "\r\n" } else { "\n" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(CsvOptions::from_json("").unwrap(), CsvOptions::default());
        assert_eq!(CsvOptions::from_json("{}").unwrap(), CsvOptions::default());
    }

    #[test]
    fn reads_both_key_spellings() {
        let opts = CsvOptions::from_json(r#"{"dateOnly": true, "delimiter": ";"}"#).unwrap();
        assert!(opts.date_only);
        assert_eq!(opts.delimiter, ';');
        assert_eq!(opts.timestamp_layout(), TimestampLayout::DateOnly);

        let json = r#"{"date_only": false, "delimiter": "\t", "use_crlf": true}"#;
        let opts = CsvOptions::from_json(json).unwrap();
        assert!(!opts.date_only);
        assert_eq!(opts.delimiter, '\t');
        assert_eq!(opts.line_terminator(), "\r\n");
    }

    #[test]
    fn rejects_bad_delimiters() {
        assert!(CsvOptions::from_json(r#"{"delimiter": "\""}"#).is_err());
        assert!(CsvOptions::from_json(r#"{"delimiter": "\n"}"#).is_err());
        assert!(CsvOptions::from_json(r#"{"delimiter": ";;"}"#).is_err());
        assert!(CsvOptions::from_json("not json").is_err());
    }
}
