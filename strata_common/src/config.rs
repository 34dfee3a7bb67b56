//! Configuration loading traits and types.
//!
//! Both the application settings file and sampling design files are TOML
//! documents read through the same [`ConfigLoader`] trait.
//!
//! # Usage
//!
//! ```rust,no_run
//! use strata_common::config::{AppConfig, ConfigError, ConfigLoader};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = AppConfig::load(Path::new("strata.toml"))?;
//!     config.validate()?;
//!     println!("SE decimals: {}", config.display.se_decimals);
//!     Ok(())
//! }
//! ```

use crate::consts::{
    DEFAULT_MOE_DECIMALS, DEFAULT_PERCENT_DECIMALS, DEFAULT_SE_DECIMALS, MAX_DECIMALS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn default_service_name() -> String {
    "strata_calc".to_string()
}

/// Fields shared by every strata application.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "strata-desk-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier, attached to log output.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output precision. Display only; the calculator never rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Decimals for per-stratum and total standard errors.
    pub se_decimals: usize,
    /// Decimals for the margin of error.
    pub moe_decimals: usize,
    /// Decimals for the margin of error in percentage points.
    pub percent_decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            se_decimals: DEFAULT_SE_DECIMALS,
            moe_decimals: DEFAULT_MOE_DECIMALS,
            percent_decimals: DEFAULT_PERCENT_DECIMALS,
        }
    }
}

impl DisplayConfig {
    /// Validate that every precision is within `0..=MAX_DECIMALS`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("se_decimals", self.se_decimals),
            ("moe_decimals", self.moe_decimals),
            ("percent_decimals", self.percent_decimals),
        ] {
            if value > MAX_DECIMALS {
                return Err(ConfigError::ValidationError(format!(
                    "display.{name} = {value} exceeds maximum {MAX_DECIMALS}"
                )));
            }
        }
        Ok(())
    }
}

/// Settings file of the `strata_calc` binary.
///
/// Every section is optional; a missing file section falls back to defaults.
///
/// ```toml
/// [shared]
/// log_level = "warn"
///
/// [display]
/// se_decimals = 4
/// percent_decimals = 1
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Common settings.
    pub shared: SharedConfig,
    /// Report precision.
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.display.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if the file cannot be read or TOML is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from an in-memory TOML document.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Any serde-deserializable struct can be loaded from TOML.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
