//! Error types for kanon-kube

use kanon_core::ParseError;
use std::fmt;
use thiserror::Error;

/// A container entry whose shape does not match the pod spec
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` must be a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

/// Failure to extract the image of a single container
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The image string does not parse
    #[error("{pointer}: bad image: {image}: {source}")]
    Parse {
        pointer: String,
        image: String,
        #[source]
        source: ParseError,
    },

    /// The container entry itself is malformed
    #[error("{pointer}: invalid container: {source}")]
    Structural {
        pointer: String,
        #[source]
        source: StructuralError,
    },
}

impl ContainerError {
    /// JSON pointer of the offending field or container
    pub fn pointer(&self) -> &str {
        match self {
            ContainerError::Parse { pointer, .. } | ContainerError::Structural { pointer, .. } => {
                pointer
            }
        }
    }
}

/// All per-container failures of one extraction, joined with `;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectError {
    errors: Vec<ContainerError>,
}

impl CollectError {
    /// Returns `None` when there is nothing to report
    pub fn from_errors(errors: Vec<ContainerError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[ContainerError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for CollectError {}

/// Errors while applying canonicalization patches
///
/// The input document is never modified when one of these is returned.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to parse document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("invalid patch operations: {0}")]
    InvalidOperation(#[source] serde_json::Error),

    #[error("failed to apply patch: {0}")]
    Apply(#[from] json_patch::PatchError),

    #[error("failed to serialize patched document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors while reading manifest documents
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document {index} is not an object")]
    NotAnObject { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structural(pointer: &str) -> ContainerError {
        ContainerError::Structural {
            pointer: pointer.to_string(),
            source: StructuralError::MissingField {
                field: "name".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_errors_yield_none() {
        assert!(CollectError::from_errors(Vec::new()).is_none());
    }

    #[test]
    fn test_messages_joined_with_semicolon() {
        let err = CollectError::from_errors(vec![
            structural("/spec/containers/0"),
            structural("/spec/containers/2"),
        ])
        .unwrap();

        assert_eq!(err.len(), 2);
        assert_eq!(
            err.to_string(),
            "/spec/containers/0: invalid container: missing required field `name`;\
             /spec/containers/2: invalid container: missing required field `name`"
        );
    }

    #[test]
    fn test_pointer_accessor() {
        let err = ContainerError::Parse {
            pointer: "/spec/containers/1/image".to_string(),
            image: "docker.io/Bad".to_string(),
            source: ParseError::InvalidFormat {
                reference: "docker.io/Bad".to_string(),
            },
        };
        assert_eq!(err.pointer(), "/spec/containers/1/image");
        assert!(err.to_string().contains("bad image: docker.io/Bad"));
    }
}
