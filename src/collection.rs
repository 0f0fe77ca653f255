//! Tool-agnostic request-collection model produced by the importer.
//!
//! The graph is built once per import and handed to the caller as an
//! immutable snapshot. Every list preserves declaration order from the
//! source document; consumers (JSON export, request execution) rely on
//! that ordering and on the [`Body`] mode invariant below.

use serde::{Deserialize, Serialize};

/// Root of the imported model: environments, folders and root-level
/// requests, all in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub name: String,
    pub environments: Vec<Environment>,
    pub folders: Vec<Folder>,
    pub requests: Vec<Request>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Collection {
            name: name.into(),
            environments: Vec::new(),
            folders: Vec::new(),
            requests: Vec::new(),
        }
    }
}

/// One environment per declared server; never merged or de-duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub name: String,
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub enabled: bool,
    pub key: String,
    pub value: String,
    pub secret: bool,
}

/// Folder named after an OpenAPI tag. The nested `folders` list exists for
/// the model's generality; OpenAPI import always leaves it empty because
/// tags do not nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub name: String,
    pub requests: Vec<Request>,
    pub folders: Vec<Folder>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Folder {
            name: name.into(),
            requests: Vec::new(),
            folders: Vec::new(),
        }
    }
}

/// A single replayable request. `url` is a template string containing
/// `{{var}}` placeholders plus a literal query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub name: String,
    /// Uppercase HTTP method name.
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyMode {
    None,
    Raw,
    UrlEncoded,
    File,
    Multipart,
}

/// Request body. Exactly one of `raw` / `entries` is populated, matching
/// `mode`; use the constructors to keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub mode: BodyMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<BodyEntry>>,
}

impl Body {
    pub fn raw(content_type: Option<String>, payload: String) -> Self {
        Body {
            mode: BodyMode::Raw,
            content_type,
            raw: Some(payload),
            entries: None,
        }
    }

    pub fn url_encoded(entries: Vec<BodyEntry>) -> Self {
        Body {
            mode: BodyMode::UrlEncoded,
            content_type: None,
            raw: None,
            entries: Some(entries),
        }
    }
}

/// One `key=value` pair of a url-encoded or multipart body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyEntry {
    pub enabled: bool,
    pub key: String,
    pub value: String,
}
