//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use kanon_kube::{CollectError, ManifestError, PatchError};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// One or more images could not be extracted (only fatal with --strict)
    #[error("Image extraction failed: {message}")]
    #[diagnostic(
        code(kanon::cli::extract),
        help("run without --strict to canonicalize the images that did parse")
    )]
    Extract { message: String },

    /// Reference strings given on the command line did not parse
    #[error("{failed} of {total} reference(s) failed to parse")]
    #[diagnostic(code(kanon::cli::parse))]
    Parse { failed: usize, total: usize },

    /// Patch application failed, nothing was written
    #[error("Failed to canonicalize images: {0}")]
    #[diagnostic(code(kanon::cli::patch))]
    Patch(#[from] PatchError),

    /// Input is not a usable manifest
    #[error("Invalid manifest in {source_name}: {error}")]
    #[diagnostic(code(kanon::cli::manifest))]
    Manifest {
        source_name: String,
        error: ManifestError,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kanon::cli::io))]
    Io { message: String },

    /// Output could not be serialized
    #[error("Internal error: {message}")]
    #[diagnostic(code(kanon::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Extract { .. } | CliError::Parse { .. } => exit_codes::EXTRACT_ERROR,
            CliError::Patch(_) => exit_codes::PATCH_ERROR,
            CliError::Manifest { .. } => exit_codes::MANIFEST_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a manifest error for the named input
    pub fn manifest(source_name: impl Into<String>, error: ManifestError) -> Self {
        Self::Manifest {
            source_name: source_name.into(),
            error,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CollectError> for CliError {
    fn from(err: CollectError) -> Self {
        CliError::Extract {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("failed to serialize output: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::internal(format!("failed to serialize output: {}", err))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
