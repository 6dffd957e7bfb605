//! Field mapping tables.
//!
//! A [`FieldMapping`] answers which target field a source field lands in for
//! one format, and optionally translates entity reference types into the
//! format's entry types.
//!
//! # Precedence
//!
//! The first registration wins. A later entry that reuses an already mapped
//! source field, or a target field that another source already claims, is
//! ignored. Normalized output therefore never has two sources for one key.
//!
//! # Example
//!
//! ```
//! use bibcite::field::SourceField;
//! use bibcite::format::FormatDefinition;
//! use bibcite::mapping::FieldMapping;
//!
//! let csl = FormatDefinition::csl();
//! let mut mapping = FieldMapping::new(&csl);
//! mapping.map(SourceField::Year, "issued").unwrap();
//! mapping.map(SourceField::Date, "issued").unwrap();
//!
//! assert_eq!(mapping.resolve_target_field(&SourceField::Year), Some("issued"));
//! assert_eq!(mapping.resolve_target_field(&SourceField::Date), None);
//! ```

mod defaults;

use crate::field::SourceField;
use crate::format::{FormatDefinition, REFERENCE_TYPES};
use crate::{ExportError, Result};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Serializable mapping configuration, keyed by target format names.
///
/// `fields` maps each format field to the entity field that fills it (or
/// `null` for none); `types` maps each format entry type to an entity
/// reference type.
///
/// ```
/// use bibcite::mapping::MappingConfig;
///
/// let config = MappingConfig::from_json(r#"{
///     "fields": {"title": "title", "issued": "bibcite_year", "note": null},
///     "types": {"article-journal": "journal_article"}
/// }"#).unwrap();
/// assert_eq!(config.fields.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub fields: BTreeMap<String, Option<String>>,
    pub types: BTreeMap<String, String>,
}

impl MappingConfig {
    /// Parses a JSON mapping configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`] on malformed JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// Mapping from source fields to one format's target fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    format: FormatDefinition,
    fields: Vec<(SourceField, CompactString)>,
    types: BTreeMap<CompactString, CompactString>,
}

impl FieldMapping {
    /// Creates an empty mapping for a format.
    pub fn new(format: &FormatDefinition) -> Self {
        Self {
            format: format.clone(),
            fields: Vec::new(),
            types: BTreeMap::new(),
        }
    }

    /// Built-in mapping table for one of the built-in formats.
    ///
    /// Unknown formats get an empty mapping.
    pub fn default_for(format: &FormatDefinition) -> Self {
        let mut mapping = Self::new(format);
        let (fields, types) = defaults::tables(format.id());
        for (source, target) in fields {
            if let Err(err) = mapping.map(source.clone(), target) {
                debug!(format = format.id(), %err, "skipping default mapping");
            }
        }
        for (source, target) in types {
            if let Err(err) = mapping.map_type(source, target) {
                debug!(format = format.id(), %err, "skipping default type mapping");
            }
        }
        mapping
    }

    /// Builds a mapping from configuration.
    ///
    /// Entries are registered in the format's field order, so when two
    /// format fields name the same source the earlier format field wins.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidMapping`] when an entry names a target the
    /// format does not declare, an unknown source field, or an invalid type.
    pub fn from_config(format: &FormatDefinition, config: &MappingConfig) -> Result<Self> {
        let mut mapping = Self::new(format);

        if let Some(target) = config.fields.keys().find(|t| !format.has_field(t)) {
            return Err(mapping.invalid(format!("unknown target field {target}")));
        }
        for target in format.field_names() {
            if let Some(Some(source)) = config.fields.get(target.as_str()) {
                mapping.map(SourceField::from_name(source), target)?;
            }
        }

        let ordered_types = format
            .entry_types()
            .filter_map(|t| config.types.get(t).map(|source| (source.as_str(), t)));
        if let Some(target) = config.types.keys().find(|t| !format.is_valid_type(t)) {
            return Err(mapping.invalid(format!("unknown entry type {target}")));
        }
        for (source, target) in ordered_types {
            mapping.map_type(source, target)?;
        }

        Ok(mapping)
    }

    /// Registers `source -> target`.
    ///
    /// Returns `Ok(false)` when the entry was ignored because the source or the
    /// target is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidMapping`] for unknown source fields or
    /// targets outside the format's field names.
    pub fn map(&mut self, source: SourceField, target: &str) -> Result<bool> {
        if !source.is_known() {
            return Err(self.invalid(format!("unknown source field {source}")));
        }
        if !self.format.has_field(target) {
            return Err(self.invalid(format!("unknown target field {target}")));
        }
        if let Some((existing, claimed)) = self
            .fields
            .iter()
            .find(|(s, t)| *s == source || t == target)
        {
            debug!(
                format = self.format.id(),
                ignored_source = %source,
                ignored_target = target,
                kept_source = %existing,
                kept_target = %claimed,
                "duplicate mapping ignored, first registration wins"
            );
            return Ok(false);
        }
        self.fields.push((source, target.into()));
        Ok(true)
    }

    /// Registers a translation from an entity reference type to a format type.
    ///
    /// Several reference types may translate to the same format type; the
    /// first translation registered for a reference type wins.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidMapping`] when either side is unknown.
    pub fn map_type(&mut self, source: &str, target: &str) -> Result<bool> {
        if !REFERENCE_TYPES.contains(&source) {
            return Err(self.invalid(format!("unknown reference type {source}")));
        }
        if !self.format.is_valid_type(target) {
            return Err(self.invalid(format!("unknown entry type {target}")));
        }
        if self.types.contains_key(source) {
            debug!(format = self.format.id(), source, target, "duplicate type mapping ignored");
            return Ok(false);
        }
        self.types.insert(source.into(), target.into());
        Ok(true)
    }

    pub fn format(&self) -> &FormatDefinition {
        &self.format
    }

    /// Target field for a source field, if mapped.
    pub fn resolve_target_field(&self, source: &SourceField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, target)| target.as_str())
    }

    /// Translates a reference type; untranslated types pass through.
    pub fn resolve_type<'a>(&'a self, entry_type: &'a str) -> &'a str {
        self.types
            .get(entry_type)
            .map(CompactString::as_str)
            .unwrap_or(entry_type)
    }

    pub fn is_valid_type(&self, entry_type: &str) -> bool {
        self.format.is_valid_type(entry_type)
    }

    /// Registered pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&SourceField, &str)> {
        self.fields.iter().map(|(s, t)| (s, t.as_str()))
    }

    /// Exports the table in configuration shape.
    pub fn to_config(&self) -> MappingConfig {
        let mut fields: BTreeMap<String, Option<String>> = self
            .format
            .field_names()
            .iter()
            .map(|f| (f.to_string(), None))
            .collect();
        for (source, target) in &self.fields {
            fields.insert(target.to_string(), Some(source.as_name().to_string()));
        }
        let mut types = BTreeMap::new();
        for (source, target) in &self.types {
            types
                .entry(target.to_string())
                .or_insert_with(|| source.to_string());
        }
        MappingConfig { fields, types }
    }

    fn invalid(&self, message: String) -> ExportError {
        ExportError::InvalidMapping {
            format: self.format.id().to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_first_registration_wins_for_targets() {
        let csl = FormatDefinition::csl();
        let mut mapping = FieldMapping::new(&csl);
        assert!(mapping.map(SourceField::Abstract, "abstract").unwrap());
        assert!(!mapping.map(SourceField::FrenchAbstract, "abstract").unwrap());

        assert_eq!(
            mapping.resolve_target_field(&SourceField::Abstract),
            Some("abstract")
        );
        assert_eq!(
            mapping.resolve_target_field(&SourceField::FrenchAbstract),
            None
        );
    }

    #[test]
    fn test_first_registration_wins_for_sources() {
        let csl = FormatDefinition::csl();
        let mut mapping = FieldMapping::new(&csl);
        mapping.map(SourceField::Title, "title").unwrap();
        mapping.map(SourceField::Title, "title-short").unwrap();
        assert_eq!(mapping.resolve_target_field(&SourceField::Title), Some("title"));
        assert_eq!(mapping.iter().count(), 1);
    }

    #[rstest]
    #[case(SourceField::Unknown("nid".into()), "title")]
    #[case(SourceField::Title, "not-a-csl-field")]
    fn test_invalid_mapping_rejected(#[case] source: SourceField, #[case] target: &str) {
        let mut mapping = FieldMapping::new(&FormatDefinition::csl());
        assert!(matches!(
            mapping.map(source, target),
            Err(ExportError::InvalidMapping { .. })
        ));
    }

    #[test]
    fn test_type_translation_passes_unknown_through() {
        let mut mapping = FieldMapping::new(&FormatDefinition::csl());
        mapping.map_type("journal_article", "article-journal").unwrap();
        assert_eq!(mapping.resolve_type("journal_article"), "article-journal");
        assert_eq!(mapping.resolve_type("zine"), "zine");
        assert!(mapping.is_valid_type("article-journal"));
        assert!(!mapping.is_valid_type("zine"));
    }

    #[test]
    fn test_invalid_type_mapping_rejected() {
        let mut mapping = FieldMapping::new(&FormatDefinition::csl());
        assert!(mapping.map_type("journal_article", "JOUR").is_err());
        assert!(mapping.map_type("zine", "book").is_err());
    }

    #[test]
    fn test_from_config_validates_targets() {
        let config = MappingConfig::from_json(r#"{"fields": {"nope": "title"}}"#).unwrap();
        let result = FieldMapping::from_config(&FormatDefinition::csl(), &config);
        assert!(matches!(result, Err(ExportError::InvalidMapping { .. })));
    }

    #[test]
    fn test_from_config_validates_sources() {
        let config = MappingConfig::from_json(r#"{"fields": {"title": "bibcite_nope"}}"#).unwrap();
        let result = FieldMapping::from_config(&FormatDefinition::csl(), &config);
        assert!(matches!(result, Err(ExportError::InvalidMapping { .. })));
    }

    #[test]
    fn test_from_config_follows_format_order() {
        // `title` precedes `title-short` in the CSL field list.
        let config = MappingConfig::from_json(
            r#"{"fields": {"title-short": "title", "title": "title", "note": null}}"#,
        )
        .unwrap();
        let mapping = FieldMapping::from_config(&FormatDefinition::csl(), &config).unwrap();
        assert_eq!(mapping.resolve_target_field(&SourceField::Title), Some("title"));
        assert_eq!(mapping.iter().count(), 1);
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            MappingConfig::from_json("{"),
            Err(ExportError::Config(_))
        ));
    }

    #[test]
    fn test_default_csl_mapping() {
        let mapping = FieldMapping::default_for(&FormatDefinition::csl());
        assert_eq!(mapping.resolve_target_field(&SourceField::Title), Some("title"));
        assert_eq!(mapping.resolve_target_field(&SourceField::Author), Some("author"));
        assert_eq!(mapping.resolve_target_field(&SourceField::Year), Some("issued"));
        assert_eq!(mapping.resolve_target_field(&SourceField::Keywords), Some("keyword"));
        // `bibcite_date` also targets `issued` and loses to the year.
        assert_eq!(mapping.resolve_target_field(&SourceField::Date), None);
        assert_eq!(mapping.resolve_type("journal_article"), "article-journal");
    }

    #[rstest]
    #[case(FormatDefinition::csl())]
    #[case(FormatDefinition::bibtex())]
    #[case(FormatDefinition::ris())]
    #[case(FormatDefinition::endnote_xml())]
    #[case(FormatDefinition::csv())]
    fn test_default_tables_are_valid(#[case] format: FormatDefinition) {
        let (fields, types) = defaults::tables(format.id());
        let mut mapping = FieldMapping::new(&format);
        for (source, target) in fields {
            mapping.map(source.clone(), target).unwrap();
        }
        for (source, target) in types {
            mapping.map_type(source, target).unwrap();
        }
        assert!(mapping.resolve_target_field(&SourceField::Title).is_some());
        assert!(mapping.resolve_target_field(&SourceField::Type).is_some());
    }

    #[test]
    fn test_config_round_trip() {
        let mapping = FieldMapping::default_for(&FormatDefinition::ris());
        let config = mapping.to_config();
        let rebuilt = FieldMapping::from_config(mapping.format(), &config).unwrap();
        for (source, target) in mapping.iter() {
            assert_eq!(rebuilt.resolve_target_field(source), Some(target));
        }
    }
}
