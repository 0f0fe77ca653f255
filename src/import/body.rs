//! Body resolver: selects exactly one body representation per operation
//! from the normalized candidates, synthesizing example content when the
//! document gives a schema without a literal example.

use super::url::literal_text;
use crate::collection::{Body, BodyEntry};
use crate::spec::BodyCandidate;
use serde_json::{Map, Value};

/// Bound for instance synthesis over self-referential or very deep schemas.
const MAX_SYNTH_DEPTH: usize = 32;

/// Content-type preference: JSON, then urlencoded forms, then XML/plain
/// text. If multiple content types are declared the first candidate
/// matching the preference order wins; the rest are dropped. No match
/// means no body at all, not an empty one.
pub(crate) fn resolve_body(candidates: &[BodyCandidate]) -> Option<Body> {
    if let Some(candidate) = candidates.iter().find(|c| is_json(&c.content_type)) {
        return Some(json_body(candidate));
    }
    if let Some(candidate) = candidates
        .iter()
        .find(|c| media_kind(&c.content_type) == "application/x-www-form-urlencoded")
    {
        return Some(form_body(candidate));
    }
    if let Some(candidate) = candidates.iter().find(|c| is_textual(&c.content_type)) {
        return Some(text_body(candidate));
    }
    None
}

fn is_json(content_type: &str) -> bool {
    let kind = media_kind(content_type);
    kind == "application/json" || kind.ends_with("+json")
}

fn is_textual(content_type: &str) -> bool {
    let kind = media_kind(content_type);
    kind == "application/xml" || kind.ends_with("+xml") || kind.starts_with("text/")
}

/// Media type without parameters (`application/json; charset=utf-8` →
/// `application/json`).
fn media_kind(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// Raw JSON body: the literal example when given, else a minimally
/// populated instance synthesized from the schema, serialized compactly
/// with declared key order intact.
fn json_body(candidate: &BodyCandidate) -> Body {
    let value = candidate
        .example
        .clone()
        .or_else(|| {
            candidate
                .schema
                .as_ref()
                .map(|schema| synthesize_instance(schema, 0))
        })
        .unwrap_or_else(|| Value::Object(Map::new()));
    let payload = serde_json::to_string(&value).unwrap_or_default();
    Body::raw(Some(candidate.content_type.clone()), payload)
}

/// Urlencoded body: one enabled entry per declared property, declaration
/// order, value from the property's example/default. The content type is
/// left unset; the encoding mode already implies it.
fn form_body(candidate: &BodyCandidate) -> Body {
    let mut entries = Vec::new();
    let properties = candidate
        .schema
        .as_ref()
        .and_then(|schema| schema.get("properties"))
        .and_then(Value::as_object);

    if let Some(properties) = properties {
        for (name, prop) in properties {
            let value = prop
                .get("example")
                .or_else(|| prop.get("default"))
                .map(literal_text)
                .unwrap_or_default();
            entries.push(BodyEntry {
                enabled: true,
                key: name.clone(),
                value,
            });
        }
    } else if let Some(example) = candidate.example.as_ref().and_then(Value::as_object) {
        // No property list; fall back to the literal example object.
        for (key, value) in example {
            entries.push(BodyEntry {
                enabled: true,
                key: key.clone(),
                value: literal_text(value),
            });
        }
    }
    Body::url_encoded(entries)
}

/// XML / plain-text body: the literal example verbatim, empty when none.
/// Synthesizing non-JSON content from a schema is not attempted.
fn text_body(candidate: &BodyCandidate) -> Body {
    let payload = match &candidate.example {
        Some(Value::String(s)) => s.clone(),
        Some(other) => literal_text(other),
        None => String::new(),
    };
    Body::raw(Some(candidate.content_type.clone()), payload)
}

/// Build a minimally populated instance for a schema without a literal
/// example: honor `example`/`default`/first `enum` value at any node,
/// merge `allOf`, take the first `oneOf`/`anyOf` branch, and fall back to
/// `""`/`0`/`false`/`[]`/`{…}` per type.
fn synthesize_instance(schema: &Value, depth: usize) -> Value {
    if depth > MAX_SYNTH_DEPTH {
        return Value::Null;
    }
    let Some(node) = schema.as_object() else {
        return Value::Null;
    };

    if let Some(example) = node.get("example") {
        return example.clone();
    }
    if let Some(default) = node.get("default") {
        return default.clone();
    }
    if let Some(first) = node
        .get("enum")
        .and_then(Value::as_array)
        .and_then(|variants| variants.first())
    {
        return first.clone();
    }

    if let Some(branches) = node.get("allOf").and_then(Value::as_array) {
        let mut merged = Map::new();
        for branch in branches {
            if let Value::Object(part) = synthesize_instance(branch, depth + 1) {
                merged.extend(part);
            }
        }
        return Value::Object(merged);
    }
    if let Some(branch) = node
        .get("oneOf")
        .or_else(|| node.get("anyOf"))
        .and_then(Value::as_array)
        .and_then(|branches| branches.first())
    {
        return synthesize_instance(branch, depth + 1);
    }

    match type_name(node) {
        Some("string") => Value::String(String::new()),
        Some("integer") | Some("number") => Value::Number(0.into()),
        Some("boolean") => Value::Bool(false),
        Some("array") => Value::Array(Vec::new()),
        Some("null") => Value::Null,
        // "object" or untyped: populate every declared property.
        _ => {
            let mut out = Map::new();
            if let Some(properties) = node.get("properties").and_then(Value::as_object) {
                for (name, prop) in properties {
                    out.insert(name.clone(), synthesize_instance(prop, depth + 1));
                }
            }
            Value::Object(out)
        }
    }
}

/// `type` may be a string or, in 3.1 documents, a list like
/// `["string", "null"]`; take the first non-null entry.
fn type_name(node: &Map<String, Value>) -> Option<&str> {
    match node.get("type") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}
