//! Error types for the labexam_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for labexam_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A profile with the same name already exists
    #[error("profile '{0}' already exists")]
    DuplicateName(String),

    /// The named record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Default profiles cannot be deleted
    #[error("default profile '{0}' cannot be deleted")]
    Protected(String),

    /// A required value was not supplied
    #[error("{0} is required")]
    MissingValue(String),

    /// Exam dates must not lie in the future
    #[error("exam date cannot be in the future")]
    FutureDate,

    /// An entered value could not be parsed as a number
    #[error("invalid value for {field}: '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Negative exam values are rejected
    #[error("negative value not allowed ({0})")]
    NegativeValue(String),

    /// An argument was outside its accepted set
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A backup blob failed structural validation
    #[error("invalid backup data: {0}")]
    InvalidBackup(String),

    /// Configuration validation error
    #[error("configuration error: {0}")]
    Config(String),

    /// PDF document assembly error
    #[error("PDF error: {0}")]
    Pdf(String),
}
