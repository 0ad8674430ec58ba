//! Canonicalization patches
//!
//! An [`ImageInventory`] becomes one RFC 6902 `replace` operation per image,
//! writing the canonical reference back to the pointer it was read from.
//! The operations touch disjoint paths, so their order never changes the
//! result. Application is all-or-nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collector::ImageInventory;
use crate::error::PatchError;
use crate::kinds::ContainerList;

/// A single JSON patch operation with a string value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: String,
    pub path: String,
    pub value: String,
}

impl PatchOp {
    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: "replace".to_string(),
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Emission order of the lists; only relevant for reproducible output
const PATCH_ORDER: [ContainerList; 3] = [
    ContainerList::Containers,
    ContainerList::InitContainers,
    ContainerList::EphemeralContainers,
];

/// One `replace` per image, setting its field to the canonical reference
pub fn build_patches(inventory: &ImageInventory) -> Vec<PatchOp> {
    PATCH_ORDER
        .into_iter()
        .flat_map(|list| inventory.list(list).values())
        .map(|image| PatchOp::replace(&image.json_path, image.canonical()))
        .collect()
}

/// Convert operations into a `json_patch::Patch`
pub fn to_json_patch(ops: &[PatchOp]) -> Result<json_patch::Patch, PatchError> {
    serde_json::to_value(ops)
        .and_then(serde_json::from_value)
        .map_err(PatchError::InvalidOperation)
}

/// Apply operations to a document in place
///
/// On error `document` is left exactly as it was.
pub fn apply_to_value(document: &mut Value, ops: &[PatchOp]) -> Result<(), PatchError> {
    if ops.is_empty() {
        return Ok(());
    }

    let patch = to_json_patch(ops)?;
    let mut patched = document.clone();
    json_patch::patch(&mut patched, &patch.0)?;
    *document = patched;
    Ok(())
}

/// Apply operations to serialized JSON, returning the patched bytes
///
/// With no operations the input is returned as-is, without reparsing.
pub fn apply_patches(document: &[u8], ops: &[PatchOp]) -> Result<Vec<u8>, PatchError> {
    if ops.is_empty() {
        return Ok(document.to_vec());
    }

    let mut value: Value = serde_json::from_slice(document).map_err(PatchError::InvalidDocument)?;
    apply_to_value(&mut value, ops)?;
    serde_json::to_vec(&value).map_err(PatchError::Serialize)
}

/// Rewrite every image field of `raw` to the canonical form recorded in `inventory`
pub fn mutate_with_image_info(raw: &[u8], inventory: &ImageInventory) -> Result<Vec<u8>, PatchError> {
    let ops = build_patches(inventory);
    tracing::debug!(patches = ops.len(), "applying image canonicalization patches");
    apply_patches(raw, &ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect_resource;
    use kanon_core::ImageReference;
    use serde_json::json;
    use std::collections::HashSet;

    fn inventory_with(pointer: &str, reference: &str) -> ImageInventory {
        let mut inventory = ImageInventory::default();
        inventory.containers.insert(
            "app".to_string(),
            ImageReference::parse_at(reference, pointer).unwrap(),
        );
        inventory
    }

    #[test]
    fn test_empty_inventory_has_no_patches() {
        assert!(build_patches(&ImageInventory::default()).is_empty());
    }

    #[test]
    fn test_replace_serializes_as_rfc6902() {
        let op = PatchOp::replace("/spec/containers/0/image", "docker.io/busybox:latest");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "replace", "path": "/spec/containers/0/image", "value": "docker.io/busybox:latest"})
        );
    }

    #[test]
    fn test_patch_set_covers_all_lists() {
        let pod = json!({
            "kind": "Pod",
            "spec": {
                "initContainers": [{"name": "init", "image": "busybox"}],
                "containers": [{"name": "app", "image": "nginx:1.25"}],
                "ephemeralContainers": [{"name": "debug", "image": "alpine@sha256:128c6e3534b842a2eec139999b8ce8aa9a2af9907e2b9269550809d18cd832a3"}]
            }
        });
        let inventory = collect_resource(&pod).into_result().unwrap();

        let ops: HashSet<_> = build_patches(&inventory).into_iter().collect();
        let expected: HashSet<_> = [
            PatchOp::replace("/spec/initContainers/0/image", "docker.io/busybox:latest"),
            PatchOp::replace("/spec/containers/0/image", "docker.io/nginx:1.25"),
            PatchOp::replace(
                "/spec/ephemeralContainers/0/image",
                "docker.io/alpine@sha256:128c6e3534b842a2eec139999b8ce8aa9a2af9907e2b9269550809d18cd832a3",
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(ops, expected);
    }

    #[test]
    fn test_mutate_pod() {
        let raw = br#"{"spec":{"containers":[{"image":"busybox"}]}}"#;
        let inventory = inventory_with("/spec/containers/0/image", "busybox");

        let patched = mutate_with_image_info(raw, &inventory).unwrap();
        let patched: Value = serde_json::from_slice(&patched).unwrap();
        assert_eq!(
            patched,
            json!({"spec": {"containers": [{"image": "docker.io/busybox:latest"}]}})
        );
    }

    #[test]
    fn test_empty_inventory_returns_input_unchanged() {
        let raw = b"{ \"spec\" : { } }";
        let patched = mutate_with_image_info(raw, &ImageInventory::default()).unwrap();
        assert_eq!(patched, raw.to_vec());
    }

    #[test]
    fn test_missing_path_fails_atomically() {
        let mut document = json!({"spec": {"containers": [{"image": "busybox"}]}});
        let original = document.clone();
        let ops = [
            PatchOp::replace("/spec/containers/0/image", "docker.io/busybox:latest"),
            PatchOp::replace("/spec/containers/5/image", "docker.io/nginx:latest"),
        ];

        let err = apply_to_value(&mut document, &ops).unwrap_err();
        assert!(matches!(err, PatchError::Apply(_)));
        assert_eq!(document, original);
    }

    #[test]
    fn test_invalid_document_is_reported() {
        let ops = [PatchOp::replace("/spec", "x")];
        let err = apply_patches(b"not json", &ops).unwrap_err();
        assert!(matches!(err, PatchError::InvalidDocument(_)));
    }

    #[test]
    fn test_invalid_operation_is_reported() {
        let ops = [PatchOp {
            op: "frobnicate".to_string(),
            path: "/spec".to_string(),
            value: "x".to_string(),
        }];
        let err = apply_patches(br#"{"spec":{}}"#, &ops).unwrap_err();
        assert!(matches!(err, PatchError::InvalidOperation(_)));
    }

    #[test]
    fn test_order_does_not_matter() {
        let document = json!({"spec": {"containers": [{"image": "a"}, {"image": "b"}]}});
        let forward = [
            PatchOp::replace("/spec/containers/0/image", "docker.io/a:latest"),
            PatchOp::replace("/spec/containers/1/image", "docker.io/b:latest"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let mut first = document.clone();
        let mut second = document;
        apply_to_value(&mut first, &forward).unwrap();
        apply_to_value(&mut second, &backward).unwrap();
        assert_eq!(first, second);
    }
}
