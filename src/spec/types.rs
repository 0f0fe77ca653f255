use http::Method;
use serde_json::Value;

/// Method priority used when walking a path item. Operations are emitted
/// in this order regardless of how the verbs appear in the mapping; any
/// verb outside this table is skipped and recorded.
pub const METHOD_PRIORITY: [Method; 7] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Map an OpenAPI `in:` value. `body` and `formData` are handled by
    /// the body normalization and intentionally have no location here.
    pub fn from_in(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// Version-neutral intermediate representation of a parsed document.
/// Everything downstream of the normalizer works only on this.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecIr {
    pub title: Option<String>,
    pub servers: Vec<ServerIr>,
    pub operations: Vec<OperationIr>,
    pub skipped: Vec<SkippedOperation>,
}

/// A base-URL declaration: literal `servers[].url` in v3, synthesized
/// `schemes[0]://host + basePath` in v2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIr {
    pub url: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationIr {
    pub method: Method,
    pub path: String,
    pub summary: Option<String>,
    /// First declared tag; folder assignment only.
    pub tag: Option<String>,
    pub parameters: Vec<ParameterIr>,
    /// Request-body candidates in declaration order, one per content type.
    pub body: Vec<BodyCandidate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterIr {
    pub name: String,
    pub location: ParameterLocation,
    /// Example or default value, whichever the document declares first.
    pub example: Option<Value>,
}

/// One normalized request-body representation, regardless of whether the
/// source expressed it as a v2 `in: body`/`formData` parameter or a v3
/// `requestBody.content` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCandidate {
    pub content_type: String,
    pub schema: Option<Value>,
    pub example: Option<Value>,
}

/// Record of an operation dropped during normalization. Skips are
/// best-effort salvage, never an import failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOperation {
    pub path: String,
    pub method: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_in_covers_the_four_locations() {
        assert_eq!(ParameterLocation::from_in("path"), Some(ParameterLocation::Path));
        assert_eq!(ParameterLocation::from_in("query"), Some(ParameterLocation::Query));
        assert_eq!(ParameterLocation::from_in("header"), Some(ParameterLocation::Header));
        assert_eq!(ParameterLocation::from_in("cookie"), Some(ParameterLocation::Cookie));
        assert_eq!(ParameterLocation::from_in("body"), None);
        assert_eq!(ParameterLocation::from_in("formData"), None);
    }

    #[test]
    fn method_priority_starts_with_get() {
        assert_eq!(METHOD_PRIORITY[0], Method::GET);
        assert_eq!(METHOD_PRIORITY[1], Method::PUT);
    }
}
