//! Configuration loading for hallticket.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file at
//! `~/.config/hallticket/config.toml` (or `--config`), then environment
//! variables prefixed `HALLTICKET_` with `__` between nested keys, e.g.
//! `HALLTICKET_STORAGE__DATABASE_PATH=/srv/tickets.csv`.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "hallticket";
const DATABASE_FILE_NAME: &str = "student_database.csv";
const ARTIFACT_DIR_NAME: &str = "hall_ticket_system";

/// Smallest QR raster that still fits a version-1 symbol plus quiet zone.
const MIN_CODE_SIZE_PX: u32 = 29;
const MAX_CODE_SIZE_PX: u32 = 2000;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record store settings.
    pub storage: StorageConfig,
    /// Where rendered documents go.
    pub artifacts: ArtifactConfig,
    /// Text and sizes printed on the ticket.
    pub ticket: TicketConfig,
}

/// Record store settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the CSV file.
    /// Defaults to `<data dir>/hallticket/student_database.csv`.
    pub database_path: Option<PathBuf>,
}

/// Rendered artifact settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory for PDFs and transient QR images.
    /// Defaults to `<temp dir>/hall_ticket_system`.
    pub directory: Option<PathBuf>,
}

/// Ticket presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketConfig {
    /// Institution name in the page header.
    pub institution: String,
    /// Line under the institution name.
    pub subtitle: String,
    /// Pixel edge of the rasterized QR image before embedding.
    pub code_size_px: u32,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            institution: "GODAVARI INSTITUTE OF MANAGEMENT AND RESEARCH".to_string(),
            subtitle: "EXAMINATION HALL TICKET".to_string(),
            code_size_px: 200,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("HALLTICKET_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.ticket.institution.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "ticket.institution must not be blank".to_string(),
            });
        }

        let size = self.ticket.code_size_px;
        if !(MIN_CODE_SIZE_PX..=MAX_CODE_SIZE_PX).contains(&size) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "ticket.code_size_px must be between {MIN_CODE_SIZE_PX} and {MAX_CODE_SIZE_PX} (got {size})"
                ),
            });
        }

        Ok(())
    }

    /// Get the record store path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the artifact directory, resolving defaults if not set.
    #[must_use]
    pub fn artifact_dir(&self) -> PathBuf {
        self.artifacts
            .directory
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(ARTIFACT_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert!(config.artifacts.directory.is_none());
        assert_eq!(config.ticket.code_size_px, 200);
        assert_eq!(config.ticket.subtitle, "EXAMINATION HALL TICKET");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_blank_institution() {
        let mut config = Config::default();
        config.ticket.institution = "   ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("ticket.institution"));
    }

    #[test]
    fn test_validate_code_size_out_of_range() {
        let mut config = Config::default();
        config.ticket.code_size_px = 10;
        assert!(config.validate().is_err());

        config.ticket.code_size_px = 5000;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("code_size_px"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("student_database.csv"));
        assert!(path.to_string_lossy().contains("hallticket"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/tickets.csv"));

        assert_eq!(config.database_path(), PathBuf::from("/custom/tickets.csv"));
    }

    #[test]
    fn test_artifact_dir_default() {
        let path = Config::default().artifact_dir();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with("hall_ticket_system"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("hallticket"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.ticket, TicketConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\ndatabase_path = \"/srv/tickets.csv\"\n\n[ticket]\ncode_size_px = 300\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/srv/tickets.csv"));
        assert_eq!(config.ticket.code_size_px, 300);
        assert_eq!(config.ticket.subtitle, "EXAMINATION HALL TICKET");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ticket]\ncode_size_px = 1\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_ticket_config_deserialize_partial() {
        let json = r#"{"institution": "TEST COLLEGE"}"#;
        let ticket: TicketConfig = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.institution, "TEST COLLEGE");
        assert_eq!(ticket.code_size_px, 200);
    }
}
