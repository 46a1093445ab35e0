//! # Configuration Management
//!
//! Centralized configuration for the document protocol codec.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults
//!
//! ## Example
//! ```toml
//! [protocol]
//! default_generation = 51
//! max_message_size = 16777216
//!
//! [logging]
//! app_name = "document-protocol"
//! log_level = "info"
//! json_format = false
//! ```

use crate::error::{ProtocolError, Result};
use crate::protocol::generation::Generation;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Generation used by `encode`/`decode` when none is given
pub const DEFAULT_GENERATION: u32 = 51;

/// Max allowed framed message size (16 MB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Hard ceiling for a configured message size (256 MB)
const MAX_MESSAGE_SIZE_CEILING: usize = 256 * 1024 * 1024;

/// Top-level codec configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Wire protocol settings
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Defaults overridden by `DOCUMENT_PROTOCOL_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(generation) = std::env::var("DOCUMENT_PROTOCOL_GENERATION") {
            config.protocol.default_generation = generation.parse().map_err(|_| {
                ProtocolError::ConfigError(format!(
                    "DOCUMENT_PROTOCOL_GENERATION is not a generation number: '{generation}'"
                ))
            })?;
        }

        if let Ok(size) = std::env::var("DOCUMENT_PROTOCOL_MAX_MESSAGE_SIZE") {
            config.protocol.max_message_size = size.parse().map_err(|_| {
                ProtocolError::ConfigError(format!(
                    "DOCUMENT_PROTOCOL_MAX_MESSAGE_SIZE is not a byte count: '{size}'"
                ))
            })?;
        }

        if let Ok(level) = std::env::var("DOCUMENT_PROTOCOL_LOG_LEVEL") {
            config.logging.log_level = level.parse().map_err(|_| {
                ProtocolError::ConfigError(format!(
                    "DOCUMENT_PROTOCOL_LOG_LEVEL is not a log level: '{level}'"
                ))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.protocol.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Wire protocol settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Generation number used when the caller does not pick one
    pub default_generation: u32,

    /// Largest framed message (type code included) accepted in either direction
    pub max_message_size: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            default_generation: DEFAULT_GENERATION,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl ProtocolConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.default_generation < Generation::V50.number() {
            errors.push(format!(
                "Default generation {} predates the oldest supported generation {}",
                self.default_generation,
                Generation::V50
            ));
        }

        // a frame always carries its 4-byte type code
        if self.max_message_size < 4 {
            errors.push(format!(
                "Max message size too small: {} bytes (minimum: 4)",
                self.max_message_size
            ));
        } else if self.max_message_size > MAX_MESSAGE_SIZE_CEILING {
            errors.push(format!(
                "Max message size too large: {} bytes (maximum: {MAX_MESSAGE_SIZE_CEILING})",
                self.max_message_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level used when `RUST_LOG` is not set
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("document-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
