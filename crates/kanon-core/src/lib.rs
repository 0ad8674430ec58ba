//! Kanon Core - Container image reference parsing and canonicalization
//!
//! This crate provides the leaf building blocks used by the rest of Kanon:
//! - `ImageReference`: A parsed, defaulted image reference (registry, path, tag, digest)
//! - `ensure_domain`: Registry-domain detection that prefixes `docker.io` when needed
//! - `ParseError`: Everything that can go wrong while reading a reference string
//!
//! ```
//! use kanon_core::ImageReference;
//!
//! let image = ImageReference::parse("busybox").unwrap();
//! assert_eq!(image.to_string(), "docker.io/busybox:latest");
//! ```

pub mod domain;
pub mod error;
pub mod reference;

pub use domain::{DEFAULT_DOMAIN, ensure_domain};
pub use error::{ParseError, Result};
pub use reference::{DEFAULT_TAG, ImageReference, RawReference};
