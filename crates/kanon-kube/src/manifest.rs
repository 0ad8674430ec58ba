//! Untyped manifest navigation
//!
//! Manifests are handled as `serde_json::Value` trees rather than typed
//! Kubernetes objects, so any document with the expected container-list
//! shape can be processed. Accessors for required fields return a
//! [`StructuralError`] instead of assuming the shape.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ManifestError, StructuralError};

/// Follow `fields` from `value` through nested objects
pub fn nested<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .try_fold(value, |current, field| current.as_object()?.get(*field))
}

/// Like [`nested`], but only yields arrays
pub fn nested_slice<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a [Value]> {
    nested(value, fields)?.as_array().map(Vec::as_slice)
}

/// Read a field that must be present and a string
pub fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, StructuralError> {
    match object.get(field) {
        Some(value) => value.as_str().ok_or_else(|| StructuralError::WrongType {
            field: field.to_string(),
            expected: "string",
        }),
        None => Err(StructuralError::MissingField {
            field: field.to_string(),
        }),
    }
}

/// Read a field that may be absent but must be a string when present
pub fn optional_str<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<Option<&'a str>, StructuralError> {
    match object.get(field) {
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| StructuralError::WrongType {
                field: field.to_string(),
                expected: "string",
            }),
        None => Ok(None),
    }
}

/// The `kind` of a manifest, if it has one
pub fn kind_of(manifest: &Value) -> Option<&str> {
    manifest.get("kind").and_then(Value::as_str)
}

/// Build an RFC 6901 JSON pointer from path segments
pub fn json_pointer<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pointer = String::new();
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&segment.as_ref().replace('~', "~0").replace('/', "~1"));
    }
    pointer
}

/// Whether manifest text is a JSON document rather than YAML
#[must_use]
pub fn is_json(input: &str) -> bool {
    input.trim_start().starts_with('{')
}

/// Parse one or more manifest documents
///
/// JSON input holds a single document. YAML input may be a `---` separated
/// stream; empty documents are skipped.
pub fn parse_documents(input: &str) -> Result<Vec<Value>, ManifestError> {
    let documents = if is_json(input) {
        vec![serde_json::from_str::<Value>(input)?]
    } else {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(input) {
            let value = Value::deserialize(document)?;
            if !value.is_null() {
                documents.push(value);
            }
        }
        documents
    };

    if let Some(index) = documents.iter().position(|doc| !doc.is_object()) {
        return Err(ManifestError::NotAnObject { index });
    }

    Ok(documents)
}
