//! Images command - list the container images of each workload

use kanon_kube::manifest::kind_of;
use kanon_kube::{ImageExtractor, ImageInventory, parse_documents, path_prefix_for};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::display::{self, OutputFormat};
use crate::error::{CliError, Result};
use crate::util::{input_name, read_input};

/// Images of one workload document
#[derive(Debug, Serialize)]
struct WorkloadImages<'a> {
    kind: &'a str,
    name: &'a str,
    images: ImageInventory,
}

fn metadata_name(document: &Value) -> &str {
    document
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
}

pub fn run(
    extractor: &dyn ImageExtractor,
    path: &Path,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let source = input_name(path);
    let content = read_input(path)?;
    let documents = parse_documents(&content).map_err(|e| CliError::manifest(&source, e))?;

    let mut workloads = Vec::new();
    let mut failures = Vec::new();

    for document in &documents {
        let kind = kind_of(document).unwrap_or_default();
        if path_prefix_for(kind).is_empty() {
            tracing::debug!(kind, "skipping document without a pod spec");
            continue;
        }

        let name = metadata_name(document);
        let collection = extractor.extract(document);
        if let Some(err) = &collection.error {
            display::warn_extraction(&format!("{}/{}", kind, name), err);
            failures.push(err.to_string());
        }

        workloads.push(WorkloadImages {
            kind,
            name,
            images: collection.inventory,
        });
    }

    if strict && !failures.is_empty() {
        return Err(CliError::Extract {
            message: failures.join(";"),
        });
    }

    match format {
        OutputFormat::Text => {
            for workload in &workloads {
                display::print_inventory(
                    &format!("{}/{}", workload.kind, workload.name),
                    &workload.images,
                );
            }
        }
        _ => println!("{}", display::render(&workloads, format)?),
    }

    Ok(())
}
