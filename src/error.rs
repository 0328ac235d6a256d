//! Error types for acl-overview
//!
//! This module defines the error hierarchy used throughout the application.
//! The overview engine itself never returns these: repository read failures
//! are absorbed at the smallest possible scope and only logged. They surface
//! from configuration loading, snapshot loading and the CLI.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Repository read errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record '{path}' is unreadable: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Property '{property}' of record '{path}' is unreadable")]
    PropertyUnreadable { path: String, property: String },

    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepositoryError {
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn property_unreadable(path: impl Into<String>, property: impl Into<String>) -> Self {
        Self::PropertyUnreadable {
            path: path.into(),
            property: property.into(),
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for repository reads
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
