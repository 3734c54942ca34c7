use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::DEFAULT_PAGE_SIZE;
use crate::sample::DEFAULT_SAMPLE_SIZE;

/// Engine settings, read from an optional TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rows per page
    pub page_size: usize,
    /// Books generated when no file is given
    pub sample_size: usize,
    /// Field delimiter; overrides extension-based detection when set
    pub delimiter: Option<char>,
    /// `tracing` filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            delimiter: None,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults when `path` is None
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => Err(Error::Config(format!("Delimiter must be a single ASCII character, got '{}'", c))),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        self.delimiter_byte().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = EngineConfig::from_toml("page_size = 25\ndelimiter = \";\"\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.sample_size, DEFAULT_SAMPLE_SIZE);
        assert_eq!(config.delimiter_byte().unwrap(), Some(b';'));
    }

    #[test]
    fn zero_page_size_rejected() {
        assert!(matches!(EngineConfig::from_toml("page_size = 0"), Err(Error::Config(_))));
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        assert!(matches!(EngineConfig::from_toml("delimiter = \"§\""), Err(Error::Config(_))));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(EngineConfig::from_toml("page_size = ["), Err(Error::Config(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "sample_size = 12").unwrap();
        writeln!(file, "log_filter = \"booktable=debug\"").unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.sample_size, 12);
        assert_eq!(config.log_filter, "booktable=debug");
        assert_eq!(EngineConfig::load(None).unwrap(), EngineConfig::default());
    }
}
