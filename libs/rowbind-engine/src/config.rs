use codec_csv::CsvOptions;
use serde::Deserialize;

use crate::error::EngineError;

/// Client configuration. Every key is optional.
///
/// ```toml
/// cache_column_maps = true
///
/// [csv]
/// date_only = true
/// delimiter = ";"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Keep column maps across queries instead of rebuilding them per result set.
    #[serde(alias = "cacheColumnMaps")]
    pub cache_column_maps: bool,
    pub csv: CsvOptions,
}

impl ClientConfig {
    /// Load configuration from a TOML file. A missing or unreadable file is
    /// [`EngineError::Io`].
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.csv
            .validate()
            .map_err(|e| EngineError::Config(e.message().to_string()))
    }
}
