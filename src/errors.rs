// ABOUTME: Error types for the slide-site application
// ABOUTME: Provides structured error handling for deck generation and site builds

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("HTML parsing error: {0}")]
    HtmlError(#[from] quick_xml::Error),

    #[error("Password book error: {0}")]
    PasswordBookError(#[from] serde_json::Error),

    #[error("Invalid source pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Failed to walk source tree: {0}")]
    WalkError(#[from] glob::GlobError),

    #[error("Encryption failed for {path:?}: {message}")]
    EncryptionError { path: PathBuf, message: String },

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Keeps the whole context chain of an anyhow::Error in the message
impl From<anyhow::Error> for SiteError {
    fn from(err: anyhow::Error) -> Self {
        SiteError::UnknownError(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
