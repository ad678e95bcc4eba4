//! # Vigil Configuration
//!
//! Configuration management with support for:
//! - Multiple formats (JSON, YAML, TOML)
//! - Environment variable expansion
//! - Validation
//! - Default values

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod loader;
pub mod types;
pub mod validator;

pub use loader::{load_config, load_from_file, load_from_str};
pub use types::{AppConfig, ComponentConfig};
pub use validator::validate_config;

use std::path::Path;
use vigil_core::{Error, Result};

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::config("Unable to detect config format"))?;

        match ext {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(Error::Config(format!("Unsupported config format: {}", ext))),
        }
    }
}
