//! User settings for FinanceFlow
//!
//! Stores the storage backend choice, display preferences and the advice
//! backend connection in `config.json`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::paths::FinancePaths;
use crate::error::FinanceError;

/// Which record store implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON files under the data directory
    #[default]
    Json,
    /// SQLite database under the data directory
    Sqlite,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "sqlite" | "sql" | "db" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Connection settings for the text-generation backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceSettings {
    #[serde(default = "default_advice_host")]
    pub host: String,

    #[serde(default = "default_advice_model")]
    pub model: String,

    #[serde(default = "default_advice_timeout")]
    pub timeout_secs: u64,
}

fn default_advice_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_advice_model() -> String {
    "llama3.2".to_string()
}

fn default_advice_timeout() -> u64 {
    120
}

impl Default for AdviceSettings {
    fn default() -> Self {
        Self {
            host: default_advice_host(),
            model: default_advice_model(),
            timeout_secs: default_advice_timeout(),
        }
    }
}

/// User settings for FinanceFlow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub backend: StorageBackend,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub advice: AdviceSettings,

    /// Whether `init` has been run
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend: StorageBackend::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            advice: AdviceSettings::default(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &FinancePaths) -> Result<Self, FinanceError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not saved yet; `init` decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FinanceError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FinanceError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinancePaths) -> Result<(), FinanceError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinanceError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinanceError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: crate::models::Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format a date with the configured pattern
    pub fn format_date(&self, date: chrono::NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend, StorageBackend::Json);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.advice.host, "http://localhost:11434");
        assert!(!settings.setup_completed);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.backend = StorageBackend::Sqlite;
        settings.advice.model = "mistral".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backend, StorageBackend::Sqlite);
        assert_eq!(loaded.advice.model, "mistral");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"backend": "sqlite"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backend, StorageBackend::Sqlite);
        assert_eq!(loaded.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(StorageBackend::parse("SQLite"), Some(StorageBackend::Sqlite));
        assert_eq!(StorageBackend::parse("json"), Some(StorageBackend::Json));
        assert_eq!(StorageBackend::parse("mongo"), None);
    }
}
