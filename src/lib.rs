//! Field mapping, normalization and export of bibliographic records.
//!
//! `bibcite` takes bibliography entities, maps their fields onto a citation
//! format, normalizes the values into the shape that format expects and
//! renders them as downloadable text.
//!
//! # Key Features
//!
//! - **Built-in formats**: CSL-JSON, BibTeX, RIS, EndNote 7 XML and CSV,
//!   each with a default mapping table
//! - **Configurable mappings**: JSON mapping configuration validated when
//!   the mapping is built, with first-registration-wins precedence
//! - **Normalization**: single-element lists collapse, dates become
//!   CSL date parts, DOIs and page ranges are cleaned up
//! - **Formatted citations**: CSL items can be handed to any
//!   [`render::StyleRenderer`]
//!
//! # Basic Usage
//!
//! ```rust
//! use bibcite::export::{Exporter, MemoryStorage};
//! use bibcite::field::SourceField;
//! use bibcite::record::SourceRecord;
//!
//! let mut record = SourceRecord::new("bibliography", "1")
//!     .with(SourceField::Type, "journal_article")
//!     .with(SourceField::Title, "A Study");
//! record.add_authors(["One, A", "Two, B"]);
//!
//! let exporter = Exporter::new(MemoryStorage::new().with_record(record));
//! let file = exporter.export("csl", "bibliography", "1").unwrap();
//!
//! let items: serde_json::Value = serde_json::from_slice(&file.bytes).unwrap();
//! assert_eq!(items[0]["type"], "article-journal");
//! assert_eq!(items[0]["author"][1]["family"], "Two");
//! ```
//!
//! # Normalizing Without Exporting
//!
//! ```rust
//! use bibcite::field::SourceField;
//! use bibcite::format::FormatDefinition;
//! use bibcite::mapping::FieldMapping;
//! use bibcite::normalize::{Normalized, Normalizer};
//! use bibcite::record::{SourceRecord, Value};
//!
//! let mapping = FieldMapping::default_for(&FormatDefinition::ris());
//! let record = SourceRecord::new("bibliography", "1")
//!     .with(SourceField::Keywords, Value::texts(["fish"]))
//!     .with(SourceField::Custom1, "not exported");
//!
//! let normalized = Normalizer::new(&mapping).normalize(&record).unwrap();
//! assert_eq!(normalized.get("KW"), Some(&Normalized::Text("fish".into())));
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result`], wrapping [`ExportError`]:
//!
//! ```rust
//! use bibcite::ExportError;
//! use bibcite::export::{Exporter, MemoryStorage};
//!
//! let exporter = Exporter::new(MemoryStorage::new());
//! match exporter.export("bibtex", "bibliography", "404") {
//!     Ok(file) => println!("{}", file.file_name()),
//!     Err(err @ ExportError::NotFound { .. }) => assert_eq!(err.status_code(), 404),
//!     Err(err) => panic!("unexpected error: {err}"),
//! }
//! ```
//!
//! # Thread Safety
//!
//! Format definitions, mappings, renderers and the format registry are
//! immutable once built and can be shared between threads.

pub mod error;
pub mod export;
pub mod field;
pub mod format;
pub mod mapping;
pub mod normalize;
pub mod record;
pub mod render;
mod regex;
mod utils;

// Reexports
pub use error::ExportError;
pub use export::{ExportFile, Exporter, FormatRegistry};
pub use field::SourceField;
pub use format::FormatDefinition;
pub use mapping::FieldMapping;
pub use normalize::{NormalizedRecord, Normalizer};
pub use record::SourceRecord;

/// A specialized Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormatDefinition>();
        assert_send_sync::<FieldMapping>();
        assert_send_sync::<FormatRegistry>();
    }

    #[test]
    fn test_error_display() {
        let error = ExportError::UnknownFormat("marc".to_string());
        assert_eq!(error.to_string(), "Unknown export format: marc");
    }
}
