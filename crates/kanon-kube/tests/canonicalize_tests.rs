//! End-to-end extraction and mutation over the shared fixtures

use kanon_kube::{
    DefaultExtractor, ExtractorExt, ImageExtractor, ImageInventory, build_patches, collect_resource,
    mutate_with_image_info, parse_documents,
};
use serde_json::Value;

fn fixture(name: &str) -> String {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures");
    std::fs::read_to_string(format!("{}/{}", path, name)).expect("fixture should exist")
}

mod deployment {
    use super::*;

    fn manifest() -> Value {
        parse_documents(&fixture("deployment.yaml"))
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_collects_every_list() {
        let inventory = collect_resource(&manifest()).into_result().unwrap();

        assert_eq!(inventory.len(), 3);
        assert_eq!(
            inventory.init_containers["migrate"].json_path,
            "/spec/template/spec/initContainers/0/image"
        );
        assert_eq!(
            inventory.containers["web"].json_path,
            "/spec/template/spec/containers/0/image"
        );

        let exporter = &inventory.containers["exporter"];
        assert_eq!(exporter.registry, "docker.io");
        assert_eq!(exporter.path, "nginx/nginx-prometheus-exporter");
        assert_eq!(exporter.name, "nginx-prometheus-exporter");
        assert_eq!(exporter.tag, "latest");
        assert_eq!(
            exporter.json_path,
            "/spec/template/spec/containers/1/image"
        );
    }

    #[test]
    fn test_mutation_rewrites_only_images() {
        let manifest = manifest();
        let inventory = collect_resource(&manifest).inventory;
        let raw = serde_json::to_vec(&manifest).unwrap();

        let patched = mutate_with_image_info(&raw, &inventory).unwrap();
        let patched: Value = serde_json::from_slice(&patched).unwrap();

        let spec = &patched["spec"]["template"]["spec"];
        assert_eq!(spec["initContainers"][0]["image"], "ghcr.io/acme/migrate:v1.4.0");
        assert_eq!(spec["containers"][0]["image"], "docker.io/nginx:1.25");
        assert_eq!(
            spec["containers"][1]["image"],
            "docker.io/nginx/nginx-prometheus-exporter:latest"
        );
        assert_eq!(spec["containers"][0]["ports"][0]["containerPort"], 80);
        assert_eq!(patched["metadata"], manifest["metadata"]);
    }

    #[test]
    fn test_mutation_is_idempotent() {
        let manifest = manifest();
        let raw = serde_json::to_vec(&manifest).unwrap();
        let once = mutate_with_image_info(&raw, &collect_resource(&manifest).inventory).unwrap();

        let once_value: Value = serde_json::from_slice(&once).unwrap();
        let twice =
            mutate_with_image_info(&once, &collect_resource(&once_value).inventory).unwrap();
        let twice_value: Value = serde_json::from_slice(&twice).unwrap();

        assert_eq!(once_value, twice_value);
    }
}

mod mixed_stream {
    use super::*;

    fn documents() -> Vec<Value> {
        parse_documents(&fixture("mixed.yaml")).unwrap()
    }

    #[test]
    fn test_stream_has_three_documents() {
        assert_eq!(documents().len(), 3);
    }

    #[test]
    fn test_broken_container_is_reported_not_fatal() {
        let docs = documents();
        let collection = collect_resource(&docs[0]);

        assert_eq!(collection.inventory.containers.len(), 1);
        assert!(collection.inventory.containers.contains_key("shell"));

        let err = collection.error.expect("broken image should be reported");
        assert_eq!(err.errors()[0].pointer(), "/spec/containers/1/image");
        assert!(err.to_string().contains("busybox:not a tag"));
    }

    #[test]
    fn test_service_has_no_images() {
        let docs = documents();
        let collection = collect_resource(&docs[1]);
        assert!(collection.inventory.is_empty());
        assert!(build_patches(&collection.inventory).is_empty());
    }

    #[test]
    fn test_cronjob_digest_reference() {
        let docs = documents();
        let inventory = collect_resource(&docs[2]).into_result().unwrap();
        let backup = &inventory.containers["backup"];

        assert_eq!(backup.registry, "localhost:5000");
        assert_eq!(backup.path, "ops/backup");
        assert_eq!(backup.tag, "");
        assert_eq!(
            backup.canonical(),
            "localhost:5000/ops/backup@sha256:128c6e3534b842a2eec139999b8ce8aa9a2af9907e2b9269550809d18cd832a3"
        );
    }
}

mod json_input {
    use super::*;

    #[test]
    fn test_pod_through_decorated_extractor() {
        let raw = fixture("pod.json");
        let manifest = parse_documents(&raw).unwrap().remove(0);
        let extractor = DefaultExtractor.with_tracing("tests").with_logging();

        let collection = extractor.extract(&manifest);
        assert!(collection.error.is_none());

        let patched = extractor
            .mutate(raw.as_bytes(), &collection.inventory)
            .unwrap();
        let patched: Value = serde_json::from_slice(&patched).unwrap();
        assert_eq!(
            patched["spec"]["containers"][0]["image"],
            "docker.io/busybox:latest"
        );
        assert_eq!(patched["spec"]["containers"][0]["command"][1], "3600");
    }

    #[test]
    fn test_empty_inventory_keeps_bytes() {
        let raw = fixture("pod.json");
        let out = mutate_with_image_info(raw.as_bytes(), &ImageInventory::default()).unwrap();
        assert_eq!(out, raw.as_bytes());
    }
}

#[test]
fn test_concurrent_extraction() {
    let manifest = parse_documents(&fixture("deployment.yaml")).unwrap().remove(0);
    let expected = collect_resource(&manifest).inventory;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| collect_resource(&manifest).inventory))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
