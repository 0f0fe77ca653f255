use std::fmt;

/// Import failure
///
/// Only whole-document failures live here. A malformed individual
/// operation is never an error: it is skipped and reported through
/// [`crate::ImportReport::skipped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The raw text is not valid JSON/YAML, or its root is not a mapping.
    UnparsableDocument {
        /// Human-readable parse diagnostic
        reason: String,
    },
    /// No recognizable `swagger: 2.x` / `openapi: 3.x` discriminator.
    UnsupportedVersion {
        /// The discriminator value found in the document, if any
        found: Option<String>,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::UnparsableDocument { reason } => {
                write!(f, "document is not importable: {reason}")
            }
            ImportError::UnsupportedVersion { found: Some(found) } => {
                write!(
                    f,
                    "unsupported specification version '{found}'; expected swagger 2.x or openapi 3.x"
                )
            }
            ImportError::UnsupportedVersion { found: None } => {
                write!(
                    f,
                    "missing specification version; expected a top-level 'swagger' or 'openapi' field"
                )
            }
        }
    }
}

impl std::error::Error for ImportError {}
