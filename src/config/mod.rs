//! Configuration loading: JSON → typed configuration tree.
//!
//! The loader owns syntax and structure; anything it accepts is structurally
//! valid, and all further checking is semantic (see `context::Context`).

pub mod types;

pub use types::*;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deserialize a configuration JSON string.
pub fn parse(json: &str) -> Result<Config, ConfigError> {
    Ok(serde_json::from_str::<Config>(json)?)
}

/// Read and parse a configuration file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    parse(&json)
}
