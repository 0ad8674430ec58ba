//! Extractor capability and its decoration layers
//!
//! [`ImageExtractor`] is the interface callers hold. Cross-cutting concerns
//! are added by wrapping one extractor in another:
//!
//! ```
//! use kanon_kube::{DefaultExtractor, ExtractorExt, ImageExtractor};
//! use serde_json::json;
//!
//! let extractor = DefaultExtractor.with_logging().with_tracing("admission");
//! let pod = json!({"kind": "Pod", "spec": {"containers": [{"name": "app", "image": "nginx"}]}});
//! assert_eq!(extractor.extract(&pod).inventory.len(), 1);
//! ```

use serde_json::Value;

use crate::collector::{Collection, ImageInventory, collect_resource};
use crate::error::PatchError;
use crate::manifest::kind_of;
use crate::patch::mutate_with_image_info;

/// Extracts images from manifests and rewrites them to canonical form
pub trait ImageExtractor: Send + Sync {
    /// Collect the images of a manifest, best-effort
    fn extract(&self, manifest: &Value) -> Collection;

    /// Rewrite the image fields of the serialized manifest `raw`
    fn mutate(&self, raw: &[u8], inventory: &ImageInventory) -> Result<Vec<u8>, PatchError> {
        mutate_with_image_info(raw, inventory)
    }
}

impl<E: ImageExtractor + ?Sized> ImageExtractor for Box<E> {
    fn extract(&self, manifest: &Value) -> Collection {
        (**self).extract(manifest)
    }

    fn mutate(&self, raw: &[u8], inventory: &ImageInventory) -> Result<Vec<u8>, PatchError> {
        (**self).mutate(raw, inventory)
    }
}

/// Extractor backed by the built-in kind table
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl ImageExtractor for DefaultExtractor {
    fn extract(&self, manifest: &Value) -> Collection {
        collect_resource(manifest)
    }
}

/// Logs the outcome of every call before returning it
#[derive(Debug, Clone)]
pub struct WithLogging<E> {
    inner: E,
}

impl<E: ImageExtractor> WithLogging<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: ImageExtractor> ImageExtractor for WithLogging<E> {
    fn extract(&self, manifest: &Value) -> Collection {
        let kind = kind_of(manifest).unwrap_or_default();
        let collection = self.inner.extract(manifest);

        match &collection.error {
            Some(err) => tracing::warn!(
                kind,
                images = collection.inventory.len(),
                failed = err.len(),
                error = %err,
                "failed to extract image info"
            ),
            None => tracing::debug!(
                kind,
                images = collection.inventory.len(),
                "extracted image info"
            ),
        }
        collection
    }

    fn mutate(&self, raw: &[u8], inventory: &ImageInventory) -> Result<Vec<u8>, PatchError> {
        let result = self.inner.mutate(raw, inventory);
        match &result {
            Ok(_) => tracing::debug!(images = inventory.len(), "canonicalized images"),
            Err(err) => tracing::warn!(error = %err, "failed to canonicalize images"),
        }
        result
    }
}

/// Runs every call inside a span tagged with the calling client
#[derive(Debug, Clone)]
pub struct WithTracing<E> {
    inner: E,
    client: String,
}

impl<E: ImageExtractor> WithTracing<E> {
    pub fn new(inner: E, client: impl Into<String>) -> Self {
        Self {
            inner,
            client: client.into(),
        }
    }
}

impl<E: ImageExtractor> ImageExtractor for WithTracing<E> {
    fn extract(&self, manifest: &Value) -> Collection {
        let span = tracing::info_span!(
            "image_extractor.extract",
            client = %self.client,
            kind = kind_of(manifest).unwrap_or_default()
        );
        let _guard = span.enter();
        self.inner.extract(manifest)
    }

    fn mutate(&self, raw: &[u8], inventory: &ImageInventory) -> Result<Vec<u8>, PatchError> {
        let span = tracing::info_span!(
            "image_extractor.mutate",
            client = %self.client,
            images = inventory.len()
        );
        let _guard = span.enter();
        self.inner.mutate(raw, inventory)
    }
}

/// Builder methods for stacking decoration layers
pub trait ExtractorExt: ImageExtractor + Sized {
    fn with_logging(self) -> WithLogging<Self> {
        WithLogging::new(self)
    }

    fn with_tracing(self, client: impl Into<String>) -> WithTracing<Self> {
        WithTracing::new(self, client)
    }
}

impl<E: ImageExtractor> ExtractorExt for E {}
