//! Error types for the course profile and mount resolution engine.
//!
//! Only structural absence is an error. Missing optional keys, missing member
//! lists, and malformed course files degrade to defaults and are logged.

use std::path::PathBuf;
use thiserror::Error;

/// Registry-loading errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Course root not found: {0}")]
    CourseRootMissing(PathBuf),

    #[error("Course root is not a directory: {0}")]
    CourseRootNotDirectory(PathBuf),

    #[error("Failed to walk directory {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Registry I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Top-level hub errors
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Invalid profile selection: {0}")]
    InvalidSelection(String),

    #[error("User is blocked: {0}")]
    UserBlocked(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for HubError {
    fn from(err: config::ConfigError) -> Self {
        HubError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        HubError::Serialization(err.to_string())
    }
}
