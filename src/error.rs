// src/error.rs

//! Error types shared across the library

use thiserror::Error;

/// Errors produced while loading recipes, rendering generated files, or cooking
#[derive(Error, Debug)]
pub enum Error {
    /// An option value, declaration, or rule cannot produce valid output
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A native build step exited unsuccessfully
    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::InvalidConfiguration`]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}
