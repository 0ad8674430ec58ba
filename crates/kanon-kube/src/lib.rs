//! Kanon Kube - Image extraction and canonicalization for Kubernetes workloads
//!
//! This crate provides:
//! - **Kind Table**: Where each workload kind keeps its pod template
//! - **Manifest Navigation**: Failable access into untyped manifests
//! - **Collector**: Best-effort extraction of every container image with its JSON pointer
//! - **Patches**: RFC 6902 `replace` operations that rewrite images to canonical form
//! - **Extractors**: A capability trait with composable logging and tracing layers

pub mod collector;
pub mod error;
pub mod kinds;
pub mod manifest;
pub mod patch;
pub mod service;

pub use collector::{Collection, ContainerImage, ImageInventory, collect, collect_resource};
pub use error::{CollectError, ContainerError, ManifestError, PatchError, StructuralError};
pub use kinds::{ContainerList, path_prefix_for, supported_kinds};
pub use manifest::{is_json, parse_documents};
pub use patch::{
    PatchOp, apply_patches, apply_to_value, build_patches, mutate_with_image_info, to_json_patch,
};
pub use service::{DefaultExtractor, ExtractorExt, ImageExtractor, WithLogging, WithTracing};

pub use kanon_core::{ImageReference, ParseError};
