//! Version normalizer: maps v2 and v3 constructs into one intermediate
//! representation before collection building. Version-specific logic stays
//! localized here; everything downstream is version-blind.

use super::load::{RawDocument, SpecVersion};
use super::types::{
    BodyCandidate, OperationIr, ParameterIr, ParameterLocation, ServerIr, SkippedOperation, SpecIr,
    METHOD_PRIORITY,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// Guard against pathological or cyclic `$ref` chains.
const MAX_REF_DEPTH: usize = 32;

/// Path-item keys that are not operations and must not be reported as
/// unrecognized verbs.
const NON_VERB_KEYS: [&str; 5] = ["summary", "description", "servers", "parameters", "$ref"];

/// Explicit `$ref` lookup table keyed by pointer string
/// (`#/definitions/Pet`, `#/components/schemas/Pet`, ...). References that
/// point outside the document are left untouched.
#[derive(Debug, Default)]
pub struct SchemaIndex {
    entries: HashMap<String, Value>,
}

impl SchemaIndex {
    pub fn build(root: &Map<String, Value>, version: SpecVersion) -> Self {
        let mut entries = HashMap::new();
        match version {
            SpecVersion::V2 => {
                index_section(&mut entries, root.get("definitions"), "#/definitions/");
                index_section(&mut entries, root.get("parameters"), "#/parameters/");
            }
            SpecVersion::V3 => {
                let components = root.get("components");
                let section = |name: &str| components.and_then(|c| c.get(name));
                index_section(&mut entries, section("schemas"), "#/components/schemas/");
                index_section(&mut entries, section("parameters"), "#/components/parameters/");
                index_section(
                    &mut entries,
                    section("requestBodies"),
                    "#/components/requestBodies/",
                );
                index_section(&mut entries, section("examples"), "#/components/examples/");
            }
        }
        SchemaIndex { entries }
    }

    pub fn resolve(&self, pointer: &str) -> Option<&Value> {
        self.entries.get(pointer)
    }

    /// Replace every resolvable `$ref` in the tree with its target,
    /// recursively, bounded by [`MAX_REF_DEPTH`].
    pub fn expand(&self, value: &mut Value) {
        self.expand_at(value, 0);
    }

    fn expand_at(&self, value: &mut Value, depth: usize) {
        if depth > MAX_REF_DEPTH {
            return;
        }
        match value {
            Value::Object(obj) => {
                if let Some(pointer) = obj.get("$ref").and_then(Value::as_str) {
                    if let Some(target) = self.resolve(pointer) {
                        let mut expanded = target.clone();
                        self.expand_at(&mut expanded, depth + 1);
                        *value = expanded;
                        return;
                    }
                    // Unknown or external pointer: leave the node as-is.
                    return;
                }
                for v in obj.values_mut() {
                    self.expand_at(v, depth + 1);
                }
            }
            Value::Array(arr) => {
                for v in arr.iter_mut() {
                    self.expand_at(v, depth + 1);
                }
            }
            _ => {}
        }
    }

    /// Resolve a value that may itself be a `{ "$ref": ... }` object
    /// (parameters, request bodies, examples).
    fn resolve_entry<'a>(&'a self, value: &'a Value) -> Option<&'a Value> {
        match value.get("$ref").and_then(Value::as_str) {
            Some(pointer) => self.resolve(pointer),
            None => Some(value),
        }
    }
}

fn index_section(entries: &mut HashMap<String, Value>, section: Option<&Value>, prefix: &str) {
    if let Some(Value::Object(map)) = section {
        for (name, value) in map {
            entries.insert(format!("{prefix}{name}"), value.clone());
        }
    }
}

/// Normalize a parsed document into the version-neutral IR. Never fails:
/// malformed operations are skipped and recorded.
pub fn normalize(doc: &RawDocument) -> SpecIr {
    let index = SchemaIndex::build(&doc.root, doc.version);
    let title = doc
        .root
        .get("info")
        .and_then(|info| info.get("title"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let servers = match doc.version {
        SpecVersion::V2 => v2_servers(&doc.root),
        SpecVersion::V3 => v3_servers(&doc.root),
    };
    let (operations, skipped) = collect_operations(&doc.root, doc.version, &index);
    SpecIr {
        title,
        servers,
        operations,
        skipped,
    }
}

/// v2: one synthesized server from `schemes[0]://host + basePath`. A
/// document without `host` declares no server and gets no environment.
fn v2_servers(root: &Map<String, Value>) -> Vec<ServerIr> {
    let Some(host) = root.get("host").and_then(Value::as_str) else {
        return Vec::new();
    };
    let scheme = root
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .and_then(Value::as_str)
        .unwrap_or("https");
    let base_path = root.get("basePath").and_then(Value::as_str).unwrap_or("");
    vec![ServerIr {
        url: format!("{scheme}://{host}{base_path}"),
        name: None,
    }]
}

/// v3: literal `servers[].url`, name from `description`.
fn v3_servers(root: &Map<String, Value>) -> Vec<ServerIr> {
    let Some(servers) = root.get("servers").and_then(Value::as_array) else {
        return Vec::new();
    };
    servers
        .iter()
        .filter_map(|server| {
            let url = server.get("url").and_then(Value::as_str)?;
            let name = server
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_owned);
            Some(ServerIr {
                url: url.to_owned(),
                name,
            })
        })
        .collect()
}

fn collect_operations(
    root: &Map<String, Value>,
    version: SpecVersion,
    index: &SchemaIndex,
) -> (Vec<OperationIr>, Vec<SkippedOperation>) {
    let mut operations = Vec::new();
    let mut skipped = Vec::new();

    let Some(Value::Object(paths)) = root.get("paths") else {
        return (operations, skipped);
    };
    // v2 document-level consumes is the fallback for every operation.
    let doc_consumes = content_types_of(root.get("consumes"));

    for (path, item) in paths {
        let item = match item {
            Value::Object(map) => map,
            _ => {
                skip(&mut skipped, path, "*", "path item is not a mapping");
                continue;
            }
        };
        if item.contains_key("$ref") {
            skip(&mut skipped, path, "*", "path item $ref is not supported");
            continue;
        }

        // Path-level parameters are shared by every operation below.
        let mut shared = ParamBuckets::default();
        if let Some(list) = item.get("parameters") {
            if let Err(reason) = shared.collect(list, index) {
                skip(&mut skipped, path, "*", &reason);
                continue;
            }
        }

        for method in METHOD_PRIORITY {
            let verb = method.as_str().to_ascii_lowercase();
            let Some(op_val) = item.get(&verb) else {
                continue;
            };
            match normalize_operation(
                path,
                method.clone(),
                op_val,
                &shared,
                version,
                index,
                &doc_consumes,
            ) {
                Ok(op) => operations.push(op),
                Err(reason) => skip(&mut skipped, path, method.as_str(), &reason),
            }
        }

        // Anything that is neither a known verb nor path-item metadata is
        // an unrecognized operation and gets recorded.
        for key in item.keys() {
            let lk = key.to_ascii_lowercase();
            let known_verb = METHOD_PRIORITY
                .iter()
                .any(|m| m.as_str().eq_ignore_ascii_case(key));
            let metadata = NON_VERB_KEYS.contains(&lk.as_str()) || key.starts_with("x-");
            if !known_verb && !metadata {
                skip(&mut skipped, path, &key.to_ascii_uppercase(), "unrecognized method");
            }
        }
    }

    (operations, skipped)
}

fn skip(skipped: &mut Vec<SkippedOperation>, path: &str, method: &str, reason: &str) {
    warn!(path, method, reason, "skipping operation");
    skipped.push(SkippedOperation {
        path: path.to_owned(),
        method: method.to_owned(),
        reason: reason.to_owned(),
    });
}

/// Parameters sorted into their normalized roles: regular parameters keep
/// their location, v2 `in: body` supplies the body schema, v2 `formData`
/// fields become properties of a synthetic urlencoded schema.
#[derive(Debug, Default, Clone)]
struct ParamBuckets {
    parameters: Vec<ParameterIr>,
    body_schema: Option<Value>,
    form_fields: Vec<(String, Value)>,
}

impl ParamBuckets {
    fn collect(&mut self, list: &Value, index: &SchemaIndex) -> Result<(), String> {
        let Some(list) = list.as_array() else {
            return Err("parameters is not a sequence".into());
        };
        for entry in list {
            let Some(param) = index.resolve_entry(entry) else {
                // Unresolvable local ref: tolerated, the parameter is dropped.
                continue;
            };
            let Some(param) = param.as_object() else {
                continue;
            };
            let Some(name) = param.get("name").and_then(Value::as_str) else {
                continue;
            };
            let location = param.get("in").and_then(Value::as_str).unwrap_or("");
            match location {
                "body" => {
                    let mut schema = param
                        .get("schema")
                        .cloned()
                        .ok_or_else(|| format!("body parameter '{name}' has no schema"))?;
                    index.expand(&mut schema);
                    if !schema.is_object() {
                        return Err(format!("body parameter '{name}' schema is not a mapping"));
                    }
                    self.body_schema = Some(schema);
                }
                "formData" => {
                    self.form_fields.push((name.to_owned(), form_property(param)));
                }
                other => {
                    let Some(location) = ParameterLocation::from_in(other) else {
                        continue;
                    };
                    let ir = ParameterIr {
                        name: name.to_owned(),
                        location,
                        example: parameter_example(param, index),
                    };
                    // A redeclared name+in pair overrides the earlier
                    // (path-level) definition in place.
                    match self
                        .parameters
                        .iter_mut()
                        .find(|p| p.name == ir.name && p.location == ir.location)
                    {
                        Some(existing) => *existing = ir,
                        None => self.parameters.push(ir),
                    }
                }
            }
        }
        Ok(())
    }
}

/// Build the synthetic property schema for a v2 `formData` parameter so
/// the body resolver can treat v2 and v3 forms uniformly.
fn form_property(param: &Map<String, Value>) -> Value {
    let mut prop = Map::new();
    if let Some(ty) = param.get("type") {
        prop.insert("type".into(), ty.clone());
    }
    if let Some(example) = param
        .get("example")
        .or_else(|| param.get("x-example"))
        .or_else(|| param.get("default"))
    {
        prop.insert("example".into(), example.clone());
    }
    Value::Object(prop)
}

/// Example/default for a non-body parameter: the parameter's own
/// `example`/`x-example`/`default` first, then its schema's.
fn parameter_example(param: &Map<String, Value>, index: &SchemaIndex) -> Option<Value> {
    if let Some(value) = param
        .get("example")
        .or_else(|| param.get("x-example"))
        .or_else(|| param.get("default"))
    {
        return Some(value.clone());
    }
    let mut schema = param.get("schema")?.clone();
    index.expand(&mut schema);
    schema
        .get("example")
        .or_else(|| schema.get("default"))
        .cloned()
}

#[allow(clippy::too_many_arguments)]
fn normalize_operation(
    path: &str,
    method: http::Method,
    op_val: &Value,
    shared: &ParamBuckets,
    version: SpecVersion,
    index: &SchemaIndex,
    doc_consumes: &[String],
) -> Result<OperationIr, String> {
    let Some(op) = op_val.as_object() else {
        return Err("operation is not a mapping".into());
    };

    let summary = op.get("summary").and_then(Value::as_str).map(str::to_owned);
    let tag = op
        .get("tags")
        .and_then(Value::as_array)
        .and_then(|tags| tags.first())
        .and_then(Value::as_str)
        .map(str::to_owned);

    let mut buckets = shared.clone();
    if let Some(list) = op.get("parameters") {
        buckets.collect(list, index)?;
    }

    let body = match version {
        SpecVersion::V2 => v2_body_candidates(op, &buckets, doc_consumes),
        SpecVersion::V3 => v3_body_candidates(op, index)?,
    };

    Ok(OperationIr {
        method,
        path: path.to_owned(),
        summary,
        tag,
        parameters: buckets.parameters,
        body,
    })
}

/// v2 bodies: one candidate per `consumes` entry sharing the `in: body`
/// schema, or a single urlencoded candidate synthesized from `formData`
/// fields. Absent `consumes` defaults to `application/json`.
fn v2_body_candidates(
    op: &Map<String, Value>,
    buckets: &ParamBuckets,
    doc_consumes: &[String],
) -> Vec<BodyCandidate> {
    let op_consumes = content_types_of(op.get("consumes"));
    let consumes: &[String] = if op_consumes.is_empty() {
        doc_consumes
    } else {
        &op_consumes
    };

    if let Some(schema) = &buckets.body_schema {
        let example = schema.get("example").cloned();
        let types: Vec<String> = if consumes.is_empty() {
            vec!["application/json".into()]
        } else {
            consumes.to_vec()
        };
        return types
            .into_iter()
            .map(|content_type| BodyCandidate {
                content_type,
                schema: Some(schema.clone()),
                example: example.clone(),
            })
            .collect();
    }

    if !buckets.form_fields.is_empty() {
        let content_type = consumes
            .iter()
            .find(|ct| ct.as_str() == "application/x-www-form-urlencoded")
            .cloned()
            .unwrap_or_else(|| "application/x-www-form-urlencoded".into());
        let mut properties = Map::new();
        for (name, prop) in &buckets.form_fields {
            properties.insert(name.clone(), prop.clone());
        }
        let mut schema = Map::new();
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        return vec![BodyCandidate {
            content_type,
            schema: Some(Value::Object(schema)),
            example: None,
        }];
    }

    Vec::new()
}

/// v3 bodies: one candidate per `requestBody.content` entry, in
/// declaration order, with `$ref`s resolved through the index.
fn v3_body_candidates(
    op: &Map<String, Value>,
    index: &SchemaIndex,
) -> Result<Vec<BodyCandidate>, String> {
    let Some(request_body) = op.get("requestBody") else {
        return Ok(Vec::new());
    };
    let Some(request_body) = index.resolve_entry(request_body) else {
        return Err("requestBody $ref does not resolve".into());
    };
    let Some(content) = request_body.get("content") else {
        return Ok(Vec::new());
    };
    let Some(content) = content.as_object() else {
        return Err("requestBody content is not a mapping".into());
    };

    let mut candidates = Vec::new();
    for (content_type, media) in content {
        let schema = media.get("schema").map(|schema| {
            let mut schema = schema.clone();
            index.expand(&mut schema);
            schema
        });
        let example = media_example(media, schema.as_ref(), index);
        candidates.push(BodyCandidate {
            content_type: content_type.clone(),
            schema,
            example,
        });
    }
    Ok(candidates)
}

/// Media-type example precedence: `example`, first entry of `examples`,
/// then the schema's `example`/`default`.
fn media_example(media: &Value, schema: Option<&Value>, index: &SchemaIndex) -> Option<Value> {
    if let Some(example) = media.get("example") {
        return Some(example.clone());
    }
    if let Some(examples) = media.get("examples").and_then(Value::as_object) {
        for entry in examples.values() {
            let Some(entry) = index.resolve_entry(entry) else {
                continue;
            };
            if let Some(value) = entry.get("value") {
                return Some(value.clone());
            }
        }
    }
    schema.and_then(|s| s.get("example").or_else(|| s.get("default")).cloned())
}

fn content_types_of(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::parse_document;
    use serde_json::json;

    fn normalize_text(text: &str) -> SpecIr {
        let doc = parse_document(text).unwrap();
        normalize(&doc)
    }

    #[test]
    fn expands_local_schema_refs() {
        let root = json!({
            "components": {"schemas": {"Pet": {"type": "object", "properties": {"id": {"type": "integer"}}}}}
        });
        let Value::Object(root) = root else { unreachable!() };
        let index = SchemaIndex::build(&root, SpecVersion::V3);

        let mut value = json!({"$ref": "#/components/schemas/Pet"});
        index.expand(&mut value);
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["id"]["type"], "integer");
    }

    #[test]
    fn leaves_external_refs_untouched() {
        let index = SchemaIndex::default();
        let mut value = json!({"$ref": "other.yaml#/Pet"});
        index.expand(&mut value);
        assert_eq!(value["$ref"], "other.yaml#/Pet");
    }

    #[test]
    fn cyclic_refs_terminate() {
        let root = json!({
            "components": {"schemas": {"Node": {
                "type": "object",
                "properties": {"next": {"$ref": "#/components/schemas/Node"}}
            }}}
        });
        let Value::Object(root) = root else { unreachable!() };
        let index = SchemaIndex::build(&root, SpecVersion::V3);
        let mut value = json!({"$ref": "#/components/schemas/Node"});
        // Must not hang or overflow.
        index.expand(&mut value);
        assert_eq!(value["type"], "object");
    }

    #[test]
    fn v2_server_is_synthesized_from_host_triple() {
        let ir = normalize_text(
            r#"{"swagger": "2.0", "host": "api.example.com", "basePath": "/v1",
                "schemes": ["http", "https"], "paths": {}}"#,
        );
        assert_eq!(
            ir.servers,
            vec![ServerIr {
                url: "http://api.example.com/v1".into(),
                name: None
            }]
        );
    }

    #[test]
    fn v2_scheme_defaults_to_https() {
        let ir = normalize_text(r#"{"swagger": "2.0", "host": "api.example.com", "paths": {}}"#);
        assert_eq!(ir.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn v3_servers_keep_declaration_order_and_names() {
        let ir = normalize_text(
            "openapi: 3.0.0\nservers:\n  - url: https://prod.example.com\n    description: Production\n  - url: https://stage.example.com\npaths: {}\n",
        );
        assert_eq!(ir.servers.len(), 2);
        assert_eq!(ir.servers[0].name.as_deref(), Some("Production"));
        assert_eq!(ir.servers[1].name, None);
    }

    #[test]
    fn operations_follow_method_priority_within_a_path() {
        let ir = normalize_text(
            "openapi: 3.0.0\npaths:\n  /pets:\n    post:\n      summary: create\n    get:\n      summary: list\n",
        );
        let methods: Vec<&str> = ir.operations.iter().map(|o| o.method.as_str()).collect();
        assert_eq!(methods, ["GET", "POST"]);
    }

    #[test]
    fn unrecognized_verbs_are_recorded_not_fatal() {
        let ir = normalize_text(
            "openapi: 3.0.0\npaths:\n  /pets:\n    get:\n      summary: list\n    purge: {}\n",
        );
        assert_eq!(ir.operations.len(), 1);
        assert_eq!(ir.skipped.len(), 1);
        assert_eq!(ir.skipped[0].method, "PURGE");
    }

    #[test]
    fn malformed_operation_is_skipped() {
        let ir = normalize_text("openapi: 3.0.0\npaths:\n  /pets:\n    get: not-a-mapping\n");
        assert!(ir.operations.is_empty());
        assert_eq!(ir.skipped[0].reason, "operation is not a mapping");
    }

    #[test]
    fn path_level_parameters_are_shared() {
        let ir = normalize_text(
            r#"{"openapi": "3.0.0", "paths": {"/pets/{id}": {
                "parameters": [{"name": "id", "in": "path"}],
                "get": {"parameters": [{"name": "verbose", "in": "query"}]}
            }}}"#,
        );
        let names: Vec<&str> = ir.operations[0]
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["id", "verbose"]);
    }

    #[test]
    fn operation_parameter_overrides_shared_one_by_name_and_location() {
        let ir = normalize_text(
            r#"{"openapi": "3.0.0", "paths": {"/pets": {
                "parameters": [
                    {"name": "verbose", "in": "query", "example": "no"},
                    {"name": "verbose", "in": "header"}
                ],
                "get": {"parameters": [{"name": "verbose", "in": "query", "example": "yes"}]}
            }}}"#,
        );
        let params = &ir.operations[0].parameters;
        // Same name in a different location is untouched; the query one is
        // replaced in place, not appended.
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].location, ParameterLocation::Query);
        assert_eq!(params[0].example, Some(json!("yes")));
        assert_eq!(params[1].location, ParameterLocation::Header);
    }

    #[test]
    fn v2_form_data_becomes_urlencoded_candidate() {
        let ir = normalize_text(
            r#"{"swagger": "2.0", "paths": {"/login": {"post": {
                "consumes": ["application/x-www-form-urlencoded"],
                "parameters": [
                    {"name": "user", "in": "formData", "type": "string"},
                    {"name": "remember", "in": "formData", "type": "boolean", "default": false}
                ]
            }}}}"#,
        );
        let body = &ir.operations[0].body;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].content_type, "application/x-www-form-urlencoded");
        let props = body[0].schema.as_ref().unwrap()["properties"]
            .as_object()
            .unwrap();
        let keys: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, ["user", "remember"]);
        assert_eq!(props["remember"]["example"], json!(false));
    }

    #[test]
    fn v2_body_parameter_uses_consumes() {
        let ir = normalize_text(
            r##"{"swagger": "2.0", "consumes": ["application/json"], "paths": {"/pets": {"post": {
                "parameters": [{"name": "pet", "in": "body",
                                "schema": {"$ref": "#/definitions/Pet"}}]
            }}}, "definitions": {"Pet": {"type": "object", "example": {"id": 1}}}}"##,
        );
        let body = &ir.operations[0].body;
        assert_eq!(body[0].content_type, "application/json");
        assert_eq!(body[0].example, Some(json!({"id": 1})));
        assert_eq!(body[0].schema.as_ref().unwrap()["type"], "object");
    }

    #[test]
    fn v3_request_body_ref_resolves() {
        let ir = normalize_text(
            r##"{"openapi": "3.0.0", "paths": {"/pets": {"post": {
                "requestBody": {"$ref": "#/components/requestBodies/PetBody"}
            }}}, "components": {"requestBodies": {"PetBody": {
                "content": {"application/json": {"schema": {"type": "object"}}}
            }}}}"##,
        );
        let body = &ir.operations[0].body;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].content_type, "application/json");
    }

    #[test]
    fn media_examples_map_supplies_example() {
        let ir = normalize_text(
            r#"{"openapi": "3.0.0", "paths": {"/pets": {"post": {
                "requestBody": {"content": {"application/json": {
                    "schema": {"type": "object"},
                    "examples": {"first": {"value": {"id": 7}}}
                }}}
            }}}}"#,
        );
        assert_eq!(ir.operations[0].body[0].example, Some(json!({"id": 7})));
    }

    #[test]
    fn first_tag_wins() {
        let ir = normalize_text(
            "openapi: 3.0.0\npaths:\n  /pets:\n    get:\n      tags: [pets, animals]\n",
        );
        assert_eq!(ir.operations[0].tag.as_deref(), Some("pets"));
    }
}
