//! URL & parameter resolver: `{{BaseUrl}}` + rewritten path template +
//! literal query string.

use crate::spec::{ParameterIr, ParameterLocation};
use serde_json::Value;

pub(crate) fn build_url(path: &str, parameters: &[ParameterIr]) -> String {
    let template = rewrite_placeholders(path);
    let query = query_string(parameters);
    if query.is_empty() {
        format!("{{{{BaseUrl}}}}{template}")
    } else {
        format!("{{{{BaseUrl}}}}{template}?{query}")
    }
}

/// Rewrite spec placeholders `{x}` to collection placeholders `{{x}}`,
/// one-to-one, no other characters altered.
fn rewrite_placeholders(path: &str) -> String {
    path.replace('{', "{{").replace('}', "}}")
}

/// One `name=value` pair per declared query parameter, declaration order,
/// joined with `&`. A parameter without an example still appears as
/// `name=` so it shows up when the request is edited later.
fn query_string(parameters: &[ParameterIr]) -> String {
    parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Query)
        .map(|p| {
            let value = p.example.as_ref().map(literal_text).unwrap_or_default();
            format!("{}={}", p.name, value)
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Stringify an example value using its literal textual form: booleans as
/// `True`/`False`, numbers as written, strings verbatim, anything
/// structured as compact JSON.
pub(crate) fn literal_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".into(),
        Value::Bool(false) => "False".into(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
