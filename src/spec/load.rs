use crate::error::ImportError;
use serde_json::{Map, Value};

/// OpenAPI generation, detected from the top-level discriminator field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// `swagger: "2.0"` (legacy)
    V2,
    /// `openapi: "3.x"`
    V3,
}

/// A parsed document: the order-preserving root mapping plus its detected
/// version. Produced by [`parse_document`], consumed by the normalizer.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub root: Map<String, Value>,
    pub version: SpecVersion,
}

/// Parse raw text (JSON or YAML, sniffed in that order) into a generic
/// tree and detect the OpenAPI version.
///
/// Map keys keep insertion order (`serde_json/preserve_order`); folder and
/// request ordering downstream depends on it.
pub fn parse_document(text: &str) -> Result<RawDocument, ImportError> {
    let value = parse_tree(text)?;
    let root = match value {
        Value::Object(map) => map,
        other => {
            return Err(ImportError::UnparsableDocument {
                reason: format!("document root must be a mapping, found {}", value_kind(&other)),
            })
        }
    };
    let version = detect_version(&root)?;
    Ok(RawDocument { root, version })
}

fn parse_tree(text: &str) -> Result<Value, ImportError> {
    // Valid JSON is also valid YAML, but the JSON parser gives sharper
    // diagnostics and handles large integers, so try it first.
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str(text).map_err(|yaml_err| {
            ImportError::UnparsableDocument {
                reason: format!("invalid JSON ({json_err}) and invalid YAML ({yaml_err})"),
            }
        }),
    }
}

/// Read the version discriminator. YAML authors often leave `swagger: 2.0`
/// unquoted, so numeric values are accepted alongside strings.
fn detect_version(root: &Map<String, Value>) -> Result<SpecVersion, ImportError> {
    if let Some(version) = root.get("swagger").and_then(version_text) {
        if version.starts_with('2') {
            return Ok(SpecVersion::V2);
        }
    }
    if let Some(version) = root.get("openapi").and_then(version_text) {
        if version.starts_with('3') {
            return Ok(SpecVersion::V3);
        }
    }
    let found = root
        .get("swagger")
        .or_else(|| root.get("openapi"))
        .and_then(version_text);
    Err(ImportError::UnsupportedVersion { found })
}

fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
