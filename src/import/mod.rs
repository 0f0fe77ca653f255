//! Environment and collection builders plus the public import entry
//! points. One call, one input document, one immutable output graph, with
//! no I/O and no cross-call state.

mod body;
mod url;

use crate::collection::{Collection, Environment, Folder, Request, Variable};
use crate::error::ImportError;
use crate::spec::{self, OperationIr, ServerIr, SkippedOperation, SpecIr};
use tracing::debug;

/// Variable key every imported environment exposes.
pub const BASE_URL_KEY: &str = "BaseUrl";

const FALLBACK_COLLECTION_NAME: &str = "Imported API";

/// Outcome of a successful import: the collection plus the operations
/// that were dropped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub collection: Collection,
    pub skipped: Vec<SkippedOperation>,
}

/// Convert OpenAPI text (2.0 or 3.x, JSON or YAML) into a request
/// collection. All-or-nothing at this boundary: on error no partial
/// collection is observable. Individual malformed operations never fail
/// the import; they are listed in [`ImportReport::skipped`].
pub fn import_text(text: &str) -> Result<ImportReport, ImportError> {
    let doc = spec::parse_document(text)?;
    let ir = spec::normalize(&doc);
    Ok(build_report(ir))
}

/// The plain success-or-nothing contract: `Some(collection)` on success,
/// `None` otherwise, with skipped-operation detail discarded.
pub fn try_import(text: &str) -> Option<Collection> {
    import_text(text).ok().map(|report| report.collection)
}

fn build_report(ir: SpecIr) -> ImportReport {
    let mut collection = Collection::new(
        ir.title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_COLLECTION_NAME.into()),
    );
    collection.environments = build_environments(&ir.servers);

    for op in &ir.operations {
        let request = build_request(op);
        match &op.tag {
            Some(tag) => folder_mut(&mut collection, tag).requests.push(request),
            None => collection.requests.push(request),
        }
    }

    debug!(
        environments = collection.environments.len(),
        folders = collection.folders.len(),
        root_requests = collection.requests.len(),
        skipped = ir.skipped.len(),
        "import complete"
    );
    ImportReport {
        collection,
        skipped: ir.skipped,
    }
}

/// One environment per server, in declaration order, each with a single
/// enabled non-secret `BaseUrl` variable. Identical URLs are not
/// de-duplicated; every server entry stands alone.
fn build_environments(servers: &[ServerIr]) -> Vec<Environment> {
    servers
        .iter()
        .enumerate()
        .map(|(i, server)| Environment {
            name: server
                .name
                .clone()
                .unwrap_or_else(|| format!("env{}", i + 1)),
            variables: vec![Variable {
                enabled: true,
                key: BASE_URL_KEY.into(),
                value: server.url.trim_end_matches('/').to_owned(),
                secret: false,
            }],
        })
        .collect()
}

/// Folder-per-first-tag memo: folders are created and appended at first
/// encounter, so folder order is the order of first appearance of each
/// tag in the document.
fn folder_mut<'a>(collection: &'a mut Collection, tag: &str) -> &'a mut Folder {
    let idx = match collection.folders.iter().position(|f| f.name == tag) {
        Some(idx) => idx,
        None => {
            collection.folders.push(Folder::new(tag));
            collection.folders.len() - 1
        }
    };
    &mut collection.folders[idx]
}

fn build_request(op: &OperationIr) -> Request {
    let name = op
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{} {}", op.method, op.path));
    Request {
        name,
        method: op.method.to_string(),
        url: url::build_url(&op.path, &op.parameters),
        body: body::resolve_body(&op.body),
    }
}
