//! Canonicalize command - rewrite every image to its fully-qualified form

use kanon_kube::{ImageExtractor, is_json, parse_documents};
use serde_json::{Value, json};
use std::path::Path;

use crate::display::{self, OutputFormat};
use crate::error::{CliError, Result};
use crate::util::{input_name, read_input};

pub fn run(
    extractor: &dyn ImageExtractor,
    path: &Path,
    format: Option<OutputFormat>,
    strict: bool,
) -> Result<()> {
    let source = input_name(path);
    let content = read_input(path)?;
    let documents = parse_documents(&content).map_err(|e| CliError::manifest(&source, e))?;

    let format = format.unwrap_or(if is_json(&content) {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    });

    let mut patched = Vec::with_capacity(documents.len());
    for document in &documents {
        let collection = extractor.extract(document);
        if let Some(err) = collection.error {
            if strict {
                return Err(err.into());
            }
            display::warn_extraction(&source, &err);
        }

        let raw = serde_json::to_vec(document)?;
        let bytes = extractor.mutate(&raw, &collection.inventory)?;
        patched.push(serde_json::from_slice::<Value>(&bytes)?);
    }

    print!("{}", render_documents(patched, format)?);
    Ok(())
}

/// A YAML stream, or JSON with several documents wrapped in a `List`
fn render_documents(documents: Vec<Value>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let output = match <[Value; 1]>::try_from(documents) {
                Ok([single]) => single,
                Err(documents) => json!({
                    "apiVersion": "v1",
                    "kind": "List",
                    "items": documents,
                }),
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
        }
        OutputFormat::Yaml | OutputFormat::Text => {
            let mut output = String::new();
            for (i, document) in documents.iter().enumerate() {
                if i > 0 {
                    output.push_str("---\n");
                }
                output.push_str(&serde_yaml::to_string(document)?);
            }
            Ok(output)
        }
    }
}
