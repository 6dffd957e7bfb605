//! Renderers turning normalized records into concrete citation syntax.
//!
//! Each built-in format has a [`Renderer`]. CSL additionally supports
//! formatted citations through an external [`StyleRenderer`].

#[cfg(feature = "bibtex")]
mod bibtex;
mod csl;
#[cfg(feature = "csv")]
mod csv;
#[cfg(feature = "xml")]
mod endnote_xml;
#[cfg(feature = "ris")]
mod ris;

#[cfg(feature = "bibtex")]
pub use bibtex::BibtexRenderer;
pub use csl::CslJsonRenderer;
#[cfg(feature = "csv")]
pub use csv::CsvRenderer;
#[cfg(feature = "xml")]
pub use endnote_xml::EndNoteXmlRenderer;
#[cfg(feature = "ris")]
pub use ris::RisRenderer;

use crate::Result;
use crate::error::BoxError;
use crate::format::FormatDefinition;
use crate::normalize::NormalizedRecord;
use std::fmt::Debug;

/// Trait for implementing format renderers.
pub trait Renderer: Debug + Send + Sync {
    /// Render a batch of normalized records into one text blob.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExportError::RenderFailure`] when the output cannot be produced.
    fn render(&self, records: &[NormalizedRecord], format: &FormatDefinition) -> Result<String>;
}

/// External processor that formats CSL-JSON items with a citation style.
pub trait StyleRenderer {
    /// Formats `items` with `style` (e.g. `apa`).
    fn render_style(
        &self,
        items: &[serde_json::Value],
        style: &str,
    ) -> std::result::Result<String, BoxError>;
}

/// Text of the entry type field, if the record has one.
pub(crate) fn entry_type<'a>(
    record: &'a NormalizedRecord,
    format: &FormatDefinition,
) -> Option<&'a str> {
    match record.get(format.type_field()?) {
        Some(crate::normalize::Normalized::Text(t)) => Some(t.as_str()),
        _ => None,
    }
}
