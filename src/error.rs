//! Error types and exit codes for cdecl-extract

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for cdecl-extract operations
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read {path}: {message}")]
    InvalidInput { path: String, message: String },

    /// The C grammar could not be loaded into the parser.
    #[error("Parser backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("Failed to parse file: {message}")]
    ParseFailure { message: String },

    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {message}")]
    Serialize { message: String },
}

impl ExtractError {
    /// Convert error to the process exit code:
    /// - 0: Success
    /// - 1: Input file missing or unreadable
    /// - 2: Usage error (reported by clap before we get here)
    /// - 3: Output artifacts could not be written
    /// - 4: Internal parser failure that escaped the fallback path
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } | Self::InvalidInput { .. } => ExitCode::from(1),
            Self::OutputWrite { .. } | Self::Serialize { .. } => ExitCode::from(3),
            Self::BackendUnavailable { .. } | Self::ParseFailure { .. } => ExitCode::from(4),
        }
    }

    /// True for the errors that hand control to the fallback extractor.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable { .. } | Self::ParseFailure { .. }
        )
    }
}

/// Result type alias for cdecl-extract operations
pub type Result<T> = std::result::Result<T, ExtractError>;
