//! Core error types

use thiserror::Error;

/// An image reference string that violates the reference grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("repository name must have at least one component")]
    Empty,

    #[error("invalid reference format: {reference}")]
    InvalidFormat { reference: String },

    #[error("repository name must be lowercase: {reference}")]
    ContainsUppercase { reference: String },

    #[error("repository name must not be more than {max} characters (got {length})")]
    NameTooLong { length: usize, max: usize },

    #[error("unsupported digest algorithm: {algorithm}")]
    UnsupportedDigest { algorithm: String },

    #[error("invalid checksum digest length for {algorithm}: expected {expected}, got {actual}")]
    InvalidDigestLength {
        algorithm: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid checksum digest format: {digest}")]
    InvalidDigestFormat { digest: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;
