//! Export orchestration: loading entities, rendering batches and packaging
//! the result as a downloadable file.
//!
//! # Example
//!
//! ```
//! use bibcite::export::{Exporter, MemoryStorage};
//! use bibcite::field::SourceField;
//! use bibcite::record::SourceRecord;
//!
//! let storage = MemoryStorage::new().with_record(
//!     SourceRecord::new("bibliography", "42")
//!         .with(SourceField::Type, "journal_article")
//!         .with(SourceField::Title, "A Study")
//!         .with(SourceField::Year, 2020_i64),
//! );
//! let exporter = Exporter::new(storage);
//!
//! let file = exporter.export("bibtex", "bibliography", "42").unwrap();
//! assert_eq!(file.file_name(), "bibliography-42-BibTeX.bib");
//! assert!(file.text().starts_with("@article{bibliography42,"));
//! ```

use crate::format::FormatDefinition;
use crate::mapping::FieldMapping;
use crate::normalize::{BatchPolicy, Normalizer, NormalizedRecord};
use crate::record::SourceRecord;
use crate::render::{CslJsonRenderer, Renderer, StyleRenderer};
use crate::{ExportError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Format whose records feed style renderers.
const CSL_FORMAT: &str = "csl";

/// Exporter settings.
///
/// ```
/// use bibcite::export::ExportConfig;
/// use bibcite::normalize::BatchPolicy;
///
/// let config = ExportConfig::from_json(r#"{"batch_policy": "fail_batch"}"#).unwrap();
/// assert_eq!(config.default_style, "apa");
/// assert_eq!(config.batch_policy, BatchPolicy::FailBatch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Citation style used when none is requested.
    pub default_style: String,
    pub batch_policy: BatchPolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_style: "apa".to_string(),
            batch_policy: BatchPolicy::default(),
        }
    }
}

impl ExportConfig {
    /// Parses a JSON configuration; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] on malformed JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    #[must_use]
    pub fn with_default_style(mut self, style: impl Into<String>) -> Self {
        self.default_style = style.into();
        self
    }

    #[must_use]
    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }
}

/// A registered format: its mapping (which carries the definition) and renderer.
#[derive(Debug)]
pub struct ExportFormat {
    mapping: FieldMapping,
    renderer: Box<dyn Renderer>,
}

impl ExportFormat {
    pub fn new(mapping: FieldMapping, renderer: impl Renderer + 'static) -> Self {
        Self {
            mapping,
            renderer: Box::new(renderer),
        }
    }

    pub fn definition(&self) -> &FormatDefinition {
        self.mapping.format()
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }
}

/// Known export formats, looked up by id.
///
/// `Default` registers every built-in format enabled by crate features,
/// each with its default mapping table.
#[derive(Debug)]
pub struct FormatRegistry {
    formats: Vec<ExportFormat>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_builtin(FormatDefinition::csl(), CslJsonRenderer::new());
        #[cfg(feature = "bibtex")]
        registry.register_builtin(FormatDefinition::bibtex(), crate::render::BibtexRenderer::new());
        #[cfg(feature = "ris")]
        registry.register_builtin(FormatDefinition::ris(), crate::render::RisRenderer::new());
        #[cfg(feature = "xml")]
        registry.register_builtin(
            FormatDefinition::endnote_xml(),
            crate::render::EndNoteXmlRenderer::new(),
        );
        #[cfg(feature = "csv")]
        registry.register_builtin(FormatDefinition::csv(), crate::render::CsvRenderer::new());
        registry
    }
}

impl FormatRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    fn register_builtin(
        &mut self,
        definition: FormatDefinition,
        renderer: impl Renderer + 'static,
    ) {
        self.register(FieldMapping::default_for(&definition), renderer);
    }

    /// Registers a format, replacing any format with the same id.
    pub fn register(&mut self, mapping: FieldMapping, renderer: impl Renderer + 'static) {
        let format = ExportFormat::new(mapping, renderer);
        let id = format.definition().id();
        if let Some(existing) = self.formats.iter_mut().find(|f| f.definition().id() == id) {
            debug!(format = id, "replacing registered format");
            *existing = format;
        } else {
            self.formats.push(format);
        }
    }

    #[must_use]
    pub fn with_format(mut self, mapping: FieldMapping, renderer: impl Renderer + 'static) -> Self {
        self.register(mapping, renderer);
        self
    }

    /// Looks up a format by id.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnknownFormat`] when no format has this id.
    pub fn get(&self, id: &str) -> Result<&ExportFormat> {
        self.formats
            .iter()
            .find(|f| f.definition().id() == id)
            .ok_or_else(|| ExportError::UnknownFormat(id.to_string()))
    }

    /// Registered format ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|f| f.definition().id())
    }
}

/// Source of entities to export.
pub trait EntityStorage {
    /// Loads the entities with the given ids. Missing ids are left out.
    fn load_multiple(&self, entity_type: &str, ids: &[&str]) -> Vec<SourceRecord>;
}

/// In-memory [`EntityStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Vec<SourceRecord>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record, replacing one with the same entity type and id.
    pub fn insert(&mut self, record: SourceRecord) {
        match self
            .records
            .iter_mut()
            .find(|r| r.entity_type == record.entity_type && r.id == record.id)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    #[must_use]
    pub fn with_record(mut self, record: SourceRecord) -> Self {
        self.insert(record);
        self
    }
}

impl EntityStorage for MemoryStorage {
    fn load_multiple(&self, entity_type: &str, ids: &[&str]) -> Vec<SourceRecord> {
        ids.iter()
            .unique()
            .filter_map(|id| {
                self.records
                    .iter()
                    .find(|r| r.entity_type == entity_type && r.id == *id)
            })
            .cloned()
            .collect()
    }
}

/// Records to render together into one text blob.
#[derive(Debug, Clone)]
pub struct ExportBatch {
    pub entity_type: String,
    pub format_id: String,
    pub records: Vec<SourceRecord>,
    /// Filename to use instead of the format label.
    pub filename: Option<String>,
}

impl ExportBatch {
    pub fn new(
        entity_type: impl Into<String>,
        format_id: impl Into<String>,
        records: Vec<SourceRecord>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            format_id: format_id.into(),
            records,
            filename: None,
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    fn not_found(&self) -> ExportError {
        ExportError::NotFound {
            entity_type: self.entity_type.clone(),
            ids: self.records.iter().map(|r| r.id.clone()).collect(),
        }
    }
}

/// A rendered export ready to be sent as a download.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Filename without extension.
    pub filename: String,
    pub extension: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ExportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportFile")
            .field("filename", &self.filename)
            .field("extension", &self.extension)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ExportFile {
    /// Filename including the extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.extension)
    }

    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name())
    }

    /// Response headers for the download.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("Cache-Control", "no-cache".to_string()),
            ("Content-Type", self.mime_type.clone()),
            ("Content-Disposition", self.content_disposition()),
        ]
    }
}

/// Loads entities from storage and exports them in any registered format.
#[derive(Debug)]
pub struct Exporter<S> {
    storage: S,
    registry: FormatRegistry,
    config: ExportConfig,
}

impl<S: EntityStorage> Exporter<S> {
    /// Creates an exporter with the built-in formats and default settings.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            registry: FormatRegistry::default(),
            config: ExportConfig::default(),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Renders a batch with its format's renderer.
    ///
    /// # Errors
    ///
    /// [`ExportError::UnknownFormat`] for an unregistered format,
    /// [`ExportError::NotFound`] for an empty batch, schema violations
    /// according to the configured [`BatchPolicy`], and render failures.
    pub fn render(&self, batch: &ExportBatch) -> Result<String> {
        let format = self.registry.get(&batch.format_id)?;
        let records = self.normalize(batch, format)?;
        format.renderer().render(&records, format.definition())
    }

    /// Formats a batch as citations with an external style renderer.
    ///
    /// Style renderers consume CSL-JSON, so records always go through the
    /// registered `csl` mapping whatever format the batch names. `style`
    /// defaults to the configured default style.
    ///
    /// # Errors
    ///
    /// [`ExportError::UnknownFormat`] when no `csl` format is registered, the
    /// normalization errors of [`Exporter::render`], and
    /// [`ExportError::RenderFailure`] when the style renderer fails.
    pub fn render_citations(
        &self,
        batch: &ExportBatch,
        styler: &dyn StyleRenderer,
        style: Option<&str>,
    ) -> Result<String> {
        if batch.format_id != CSL_FORMAT {
            debug!(
                format = %batch.format_id,
                "formatting citations from csl records instead of batch format"
            );
        }
        let format = self.registry.get(CSL_FORMAT)?;
        let records = self.normalize(batch, format)?;
        let items = CslJsonRenderer::items(&records)?;
        let style = style.unwrap_or(&self.config.default_style);
        styler
            .render_style(&items, style)
            .map_err(|source| ExportError::RenderFailure {
                target: style.to_string(),
                source,
            })
    }

    /// Wraps rendered text as a file; the name defaults to the format label.
    pub fn package_as_file(
        &self,
        text: String,
        format: &FormatDefinition,
        filename: Option<&str>,
    ) -> ExportFile {
        ExportFile {
            filename: filename.unwrap_or(format.label()).to_string(),
            extension: format.extension().to_string(),
            mime_type: format.mime_type().to_string(),
            bytes: text.into_bytes(),
        }
    }

    /// Exports one entity as `<entity_type>-<id>-<label>`.
    ///
    /// # Errors
    ///
    /// [`ExportError::NotFound`] when the entity does not exist, plus the
    /// errors of [`Exporter::render`].
    pub fn export(&self, format_id: &str, entity_type: &str, id: &str) -> Result<ExportFile> {
        let format = self.registry.get(format_id)?.definition();
        let records = self.load(entity_type, &[id])?;
        let filename = format!("{entity_type}-{id}-{}", format.label());
        let batch = ExportBatch::new(entity_type, format_id, records).with_filename(filename);
        self.export_batch(&batch, format)
    }

    /// Exports several entities into one file named `<entity_type>-<label>`.
    ///
    /// # Errors
    ///
    /// [`ExportError::NotFound`] when `ids` is empty or none of them exist,
    /// plus the errors of [`Exporter::render`].
    pub fn export_multiple(
        &self,
        format_id: &str,
        entity_type: &str,
        ids: &[&str],
    ) -> Result<ExportFile> {
        let format = self.registry.get(format_id)?.definition();
        let records = self.load(entity_type, ids)?;
        let filename = format!("{entity_type}-{}", format.label());
        let batch = ExportBatch::new(entity_type, format_id, records).with_filename(filename);
        self.export_batch(&batch, format)
    }

    /// Exports the entities listed in a space separated id parameter.
    ///
    /// # Errors
    ///
    /// [`ExportError::NotFound`] when the parameter is missing or blank,
    /// otherwise as [`Exporter::export_multiple`].
    pub fn export_query(
        &self,
        format_id: &str,
        entity_type: &str,
        ids: Option<&str>,
    ) -> Result<ExportFile> {
        let ids: Vec<&str> = ids.map(parse_ids).unwrap_or_default();
        self.export_multiple(format_id, entity_type, &ids)
    }

    fn export_batch(&self, batch: &ExportBatch, format: &FormatDefinition) -> Result<ExportFile> {
        let text = self.render(batch)?;
        Ok(self.package_as_file(text, format, batch.filename.as_deref()))
    }

    fn load(&self, entity_type: &str, ids: &[&str]) -> Result<Vec<SourceRecord>> {
        let not_found = || ExportError::NotFound {
            entity_type: entity_type.to_string(),
            ids: ids.iter().map(|id| id.to_string()).collect(),
        };
        if ids.is_empty() {
            return Err(not_found());
        }
        let records = self.storage.load_multiple(entity_type, ids);
        if records.is_empty() {
            return Err(not_found());
        }
        debug!(entity_type, requested = ids.len(), loaded = records.len(), "loaded entities");
        Ok(records)
    }

    fn normalize(
        &self,
        batch: &ExportBatch,
        format: &ExportFormat,
    ) -> Result<Vec<NormalizedRecord>> {
        if batch.records.is_empty() {
            return Err(batch.not_found());
        }
        let outcome = Normalizer::new(format.mapping())
            .normalize_batch(&batch.records, self.config.batch_policy)?;
        if !outcome.skipped.is_empty() {
            warn!(
                format = format.definition().id(),
                skipped = outcome.skipped.len(),
                exported = outcome.records.len(),
                "records left out of export"
            );
        }
        Ok(outcome.records)
    }
}

/// Splits a space separated id list, ignoring empty items.
fn parse_ids(ids: &str) -> Vec<&str> {
    ids.split(' ').map(str::trim).filter(|id| !id.is_empty()).collect()
}
