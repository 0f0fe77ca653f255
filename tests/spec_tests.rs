#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Loader/normalizer behavior that spans syntaxes and versions.

use specdeck::import_text;

const YAML_DOC: &str = r#"openapi: 3.0.1
info:
  title: Mixed Syntax
servers:
  - url: https://api.example.com
paths:
  /things/{id}:
    get:
      tags: [things]
      summary: Fetch a thing
      parameters:
        - name: id
          in: path
          required: true
          schema: { type: string }
        - name: expand
          in: query
          schema: { type: string, example: all }
"#;

const JSON_DOC: &str = r#"{
  "openapi": "3.0.1",
  "info": {"title": "Mixed Syntax"},
  "servers": [{"url": "https://api.example.com"}],
  "paths": {"/things/{id}": {"get": {
    "tags": ["things"],
    "summary": "Fetch a thing",
    "parameters": [
      {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}},
      {"name": "expand", "in": "query", "schema": {"type": "string", "example": "all"}}
    ]
  }}}
}"#;

#[test]
fn json_and_yaml_encodings_import_identically() {
    let from_yaml = import_text(YAML_DOC).unwrap();
    let from_json = import_text(JSON_DOC).unwrap();
    assert_eq!(from_yaml.collection, from_json.collection);

    let request = &from_yaml.collection.folders[0].requests[0];
    assert_eq!(request.url, "{{BaseUrl}}/things/{{id}}?expand=all");
}

#[test]
fn header_and_cookie_parameters_never_break_an_import() {
    let text = r#"{
      "openapi": "3.0.0",
      "info": {"title": "Headers"},
      "paths": {"/ping": {"get": {
        "summary": "Ping",
        "parameters": [
          {"name": "X-Request-Id", "in": "header", "schema": {"type": "string"}},
          {"name": "session", "in": "cookie", "schema": {"type": "string"}},
          {"name": "verbose", "in": "query"}
        ]
      }}}
    }"#;
    let report = import_text(text).unwrap();
    let request = &report.collection.requests[0];
    // Header and cookie parameters are absorbed, not emitted.
    assert_eq!(request.url, "{{BaseUrl}}/ping?verbose=");
    assert!(report.skipped.is_empty());
}

#[test]
fn referenced_parameters_resolve_through_components() {
    let text = r##"{
      "openapi": "3.0.0",
      "info": {"title": "Refs"},
      "paths": {"/search": {"get": {
        "summary": "Search",
        "parameters": [{"$ref": "#/components/parameters/Query"}]
      }}},
      "components": {"parameters": {"Query": {
        "name": "q", "in": "query", "schema": {"type": "string", "default": "abc"}
      }}}
    }"##;
    let report = import_text(text).unwrap();
    assert_eq!(report.collection.requests[0].url, "{{BaseUrl}}/search?q=abc");
}

#[test]
fn v2_parameter_refs_resolve_through_document_parameters() {
    let text = r##"{
      "swagger": "2.0",
      "info": {"title": "Legacy Refs"},
      "host": "x.example.com",
      "paths": {"/find": {"get": {
        "parameters": [{"$ref": "#/parameters/Term"}]
      }}},
      "parameters": {"Term": {"name": "term", "in": "query", "default": "cat"}}
    }"##;
    let report = import_text(text).unwrap();
    assert_eq!(report.collection.requests[0].url, "{{BaseUrl}}/find?term=cat");
    assert_eq!(report.collection.requests[0].name, "GET /find");
}
