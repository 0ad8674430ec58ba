//! Container image extraction
//!
//! Walks the pod spec of a workload, parses every container's `image` and
//! records where in the document it was found. Extraction is best-effort:
//! a bad container is reported and the rest are still collected.

use kanon_core::ImageReference;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{CollectError, ContainerError, StructuralError};
use crate::kinds::{ContainerList, path_prefix_for};
use crate::manifest::{json_pointer, kind_of, nested_slice, optional_str, required_str};

/// An image paired with the container that runs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    pub name: String,
    pub image: ImageReference,
}

/// Images of one workload, keyed by container name per list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInventory {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub init_containers: BTreeMap<String, ImageReference>,

    #[serde(default)]
    pub containers: BTreeMap<String, ImageReference>,

    #[serde(default)]
    pub ephemeral_containers: BTreeMap<String, ImageReference>,
}

impl ImageInventory {
    /// Build an inventory from per-list container images
    ///
    /// A later entry wins when two containers in the same list share a name.
    pub fn from_lists(
        init_containers: Vec<ContainerImage>,
        containers: Vec<ContainerImage>,
        ephemeral_containers: Vec<ContainerImage>,
    ) -> Self {
        fn keyed(images: Vec<ContainerImage>) -> BTreeMap<String, ImageReference> {
            images.into_iter().map(|c| (c.name, c.image)).collect()
        }

        Self {
            init_containers: keyed(init_containers),
            containers: keyed(containers),
            ephemeral_containers: keyed(ephemeral_containers),
        }
    }

    pub fn list(&self, list: ContainerList) -> &BTreeMap<String, ImageReference> {
        match list {
            ContainerList::InitContainers => &self.init_containers,
            ContainerList::Containers => &self.containers,
            ContainerList::EphemeralContainers => &self.ephemeral_containers,
        }
    }

    /// Total number of images across all lists
    pub fn len(&self) -> usize {
        self.init_containers.len() + self.containers.len() + self.ephemeral_containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every image with its list and container name
    pub fn iter(&self) -> impl Iterator<Item = (ContainerList, &str, &ImageReference)> {
        ContainerList::ALL.into_iter().flat_map(move |list| {
            self.list(list)
                .iter()
                .map(move |(name, image)| (list, name.as_str(), image))
        })
    }
}

/// Result of one extraction: whatever parsed, plus what did not
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub inventory: ImageInventory,
    pub error: Option<CollectError>,
}

impl Collection {
    /// Treat any per-container failure as fatal
    pub fn into_result(self) -> Result<ImageInventory, CollectError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.inventory),
        }
    }
}

/// Collect images from a manifest, reading its kind from the `kind` field
pub fn collect_resource(manifest: &Value) -> Collection {
    collect(manifest, kind_of(manifest).unwrap_or_default())
}

/// Collect images from a manifest of the given workload kind
///
/// Unknown kinds and missing container lists yield nothing. Per-container
/// failures are joined into `Collection::error`.
pub fn collect(manifest: &Value, kind: &str) -> Collection {
    let prefix = path_prefix_for(kind);
    if prefix.is_empty() {
        tracing::debug!(kind, "kind carries no pod spec, skipping image extraction");
        return Collection::default();
    }

    let mut errors = Vec::new();
    let [init_containers, containers, ephemeral_containers] =
        ContainerList::ALL.map(|list| collect_list(manifest, prefix, list, &mut errors));

    Collection {
        inventory: ImageInventory::from_lists(init_containers, containers, ephemeral_containers),
        error: CollectError::from_errors(errors),
    }
}

fn collect_list(
    manifest: &Value,
    prefix: &[&str],
    list: ContainerList,
    errors: &mut Vec<ContainerError>,
) -> Vec<ContainerImage> {
    let mut fields = prefix.to_vec();
    fields.push(list.field());

    let Some(entries) = nested_slice(manifest, &fields) else {
        return Vec::new();
    };

    let mut images = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(container) = entry.as_object() else {
            tracing::debug!(list = %list, index, "skipping non-object container entry");
            continue;
        };

        let index = index.to_string();
        let mut segments = fields.clone();
        segments.push(&index);

        match container_image(container, &segments) {
            Ok(image) => {
                tracing::debug!(
                    container = %image.name,
                    image = %image.image,
                    pointer = %image.image.json_path,
                    "collected container image"
                );
                images.push(image);
            }
            Err(err) => errors.push(err),
        }
    }
    images
}

/// Read one container entry located at `segments`
fn container_image(
    container: &Map<String, Value>,
    segments: &[&str],
) -> Result<ContainerImage, ContainerError> {
    let structural = |source: StructuralError| ContainerError::Structural {
        pointer: json_pointer(segments),
        source,
    };

    let name = required_str(container, "name").map_err(structural)?;
    let image = optional_str(container, "image")
        .map_err(structural)?
        .unwrap_or_default();

    let pointer = json_pointer(segments.iter().copied().chain(["image"]));
    let image = ImageReference::parse_at(image, pointer.clone()).map_err(|source| {
        ContainerError::Parse {
            pointer,
            image: kanon_core::ensure_domain(image).into_owned(),
            source,
        }
    })?;

    Ok(ContainerImage {
        name: name.to_string(),
        image,
    })
}
