//! Error types for mapping, normalization and export.

use thiserror::Error;

/// Boxed cause attached to render failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents errors that can occur while exporting bibliographic records.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No {entity_type} entities found for ids [{}]", ids.join(", "))]
    NotFound {
        entity_type: String,
        ids: Vec<String>,
    },

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Schema violation in record {record}: {field} expected {expected}, found {found}")]
    SchemaViolation {
        record: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to render {target}: {source}")]
    RenderFailure {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid mapping for format {format}: {message}")]
    InvalidMapping { format: String, message: String },

    #[error("Invalid format definition: {0}")]
    InvalidFormatDefinition(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExportError {
    /// Wraps an underlying renderer error.
    pub fn render<E>(target: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        ExportError::RenderFailure {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Returns true for errors a caller should answer with "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExportError::NotFound { .. } | ExportError::UnknownFormat(_)
        )
    }

    /// HTTP status a transport layer should answer this error with.
    pub fn status_code(&self) -> u16 {
        match self {
            ExportError::NotFound { .. } | ExportError::UnknownFormat(_) => 404,
            ExportError::SchemaViolation { .. } => 422,
            ExportError::RenderFailure { .. }
            | ExportError::InvalidMapping { .. }
            | ExportError::InvalidFormatDefinition(_)
            | ExportError::Config(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Config(err.to_string())
    }
}
