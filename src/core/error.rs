//! Error types for the cytrac library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using cytrac's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during analysis coordination.
///
/// Analyzer implementations report read and parse failures through these
/// variants; the coordinator propagates them without retry or suppression.
/// A file that no registered analyzer claims is not an error, it is absence
/// (see [`AnalysisCoordinator::analyze_file`]).
///
/// [`AnalysisCoordinator::analyze_file`]: crate::coordinator::AnalysisCoordinator::analyze_file
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The file could not be parsed as the claimed language.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Analysis-specific error.
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Create a new analysis error.
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Create a new parse error for a file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
