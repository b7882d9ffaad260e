//! Configuration file loading for the terminal front end.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings read from `chess.toml`.
///
/// Every field is optional in the file. Command-line flags take precedence
/// over the values loaded here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CliConfig {
    /// FEN of the position to start from. Defaults to the standard setup.
    pub start_fen: Option<String>,
    /// Draw pieces with Unicode chess symbols instead of FEN letters.
    pub unicode_pieces: bool,
    /// Print rank and file labels around the board.
    pub show_coordinates: bool,
    /// Default filter for log output, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            start_fen: None,
            unicode_pieces: false,
            show_coordinates: true,
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Loads the configuration from `path`.
    ///
    /// A missing file is not an error and yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
start_fen = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1"
unicode_pieces = true
show_coordinates = false
log_level = "debug"
"#;

        let config: CliConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.start_fen.as_deref(),
            Some("4k3/P7/8/8/8/8/8/4K3 w - - 0 1")
        );
        assert!(config.unicode_pieces);
        assert!(!config.show_coordinates);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CliConfig = toml::from_str("unicode_pieces = true").unwrap();
        assert!(config.unicode_pieces);
        assert!(config.show_coordinates);
        assert_eq!(config.start_fen, None);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let result: Result<CliConfig, _> = toml::from_str("unicode_pieces = \"yes\"");
        let err: ConfigError = result.unwrap_err().into();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = Path::new("definitely/not/here/chess.toml");
        assert_eq!(CliConfig::load(path).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("chess-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "show_coordinates = false\n").unwrap();
        let config = CliConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(!config.show_coordinates);
        assert!(!config.unicode_pieces);
    }
}
