//! Configuration file loading for the terminal front end.
//!
//! Settings come from `chess.toml` in the working directory unless another
//! path is given. Every field has a default, so a missing file or a partial
//! file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The log level is not one of error, warn, info, debug or trace.
    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}

/// How pieces are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Glyphs {
    /// Layout letters: `K` for a white king, `k` for a black one.
    #[default]
    Ascii,
    /// Unicode chess symbols.
    Unicode,
}

/// Front end configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub glyphs: Glyphs,
    /// Print file letters and rank numbers around the board.
    /// Defaults to true.
    #[serde(default = "default_true")]
    pub show_coordinates: bool,
    /// Mark the destinations of the selected piece. Defaults to true.
    #[serde(default = "default_true")]
    pub highlight_moves: bool,
    /// Maximum level of log lines written to stderr. Defaults to "warn".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            glyphs: Glyphs::default(),
            show_coordinates: true,
            highlight_moves: true,
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`Self::default_path()`]
    /// is tried and defaults are used if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::ReadError { path, source })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the path of the default configuration file.
    pub fn default_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }

    /// Returns the configured log level.
    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .trim()
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = CliConfig::parse(
            r#"
glyphs = "unicode"
show_coordinates = false
highlight_moves = false
log_level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(config.glyphs, Glyphs::Unicode);
        assert!(!config.show_coordinates);
        assert!(!config.highlight_moves);
        assert_eq!(config.level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = CliConfig::parse("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.glyphs, Glyphs::Ascii);
        assert!(config.show_coordinates);
        assert!(config.highlight_moves);
        assert_eq!(config.level().unwrap(), Level::WARN);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = CliConfig::parse("glyphs = \"unicode\"").unwrap();
        assert_eq!(config.glyphs, Glyphs::Unicode);
        assert!(config.show_coordinates);
    }

    #[test]
    fn test_invalid_toml_fails() {
        assert!(matches!(
            CliConfig::parse("glyphs = "),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            CliConfig::parse("glyphs = \"braille\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let config = CliConfig::parse("log_level = \"loud\"").unwrap();
        assert!(matches!(
            config.level(),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = CliConfig::load(Some(Path::new("/nonexistent/chess.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
