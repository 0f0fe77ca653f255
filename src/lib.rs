//! # specdeck
//!
//! Convert OpenAPI definitions (2.0 "Swagger" and 3.x, JSON or YAML) into
//! a hierarchical, tool-agnostic request collection: folders named after
//! tags, one request per operation, and one environment per declared
//! server carrying a `BaseUrl` variable.
//!
//! ## Pipeline
//!
//! The import is a pure, synchronous transformation. Each stage is a
//! function of its input, with no shared mutable state:
//!
//! 1. [`spec::parse_document`]: raw text into an order-preserving tree,
//!    with version detection (`swagger: 2.x` / `openapi: 3.x`).
//! 2. [`spec::normalize`]: version-specific constructs (v2
//!    `host`/`basePath`/`schemes` and body/formData parameters, v3
//!    `servers` and `requestBody.content`) into one intermediate
//!    representation.
//! 3. [`import_text`]: environments, folders, requests, URLs and bodies
//!    out of the IR, best-effort per operation.
//!
//! ## Failure semantics
//!
//! The outer boundary is all-or-nothing: an unparsable document or a
//! missing version discriminator yields an [`ImportError`] and no partial
//! collection. A single malformed operation inside an otherwise valid
//! document is skipped and reported in [`ImportReport::skipped`].
//!
//! ```no_run
//! let text = std::fs::read_to_string("openapi.yaml")?;
//! let report = specdeck::import_text(&text)?;
//! println!("{} requests at root", report.collection.requests.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod collection;
pub mod error;
pub mod import;
pub mod spec;

pub use collection::{Body, BodyEntry, BodyMode, Collection, Environment, Folder, Request, Variable};
pub use error::ImportError;
pub use import::{import_text, try_import, ImportReport, BASE_URL_KEY};
pub use spec::SkippedOperation;
