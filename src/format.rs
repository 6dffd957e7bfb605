//! Citation format definitions.
//!
//! A [`FormatDefinition`] describes one export format: the entry types it
//! accepts, the ordered set of field names it recognizes and a few per-field
//! scalar coercions. Definitions are built once and shared read-only.
//!
//! # Example
//!
//! ```
//! use bibcite::format::{Coercion, FormatDefinition};
//!
//! let format = FormatDefinition::builder("mini", "Mini")
//!     .extension("txt")
//!     .entry_types(["book"])
//!     .fields(["type", "title", "issued", "title"])
//!     .type_field("type")
//!     .coerce("issued", Coercion::Date)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(format.field_names().len(), 3);
//! assert!(format.is_valid_type("book"));
//! ```

use crate::{ExportError, Result};
use compact_str::CompactString;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Bibliography reference types, as stored in the entity `type` field.
pub const REFERENCE_TYPES: &[&str] = &[
    "artwork",
    "audiovisual",
    "bill",
    "book",
    "book_chapter",
    "broadcast",
    "case",
    "chart",
    "conference_paper",
    "conference_proceedings",
    "database",
    "film",
    "government_report",
    "hearing",
    "journal_article",
    "legal_ruling",
    "magazine_article",
    "manuscript",
    "map",
    "miscellaneous",
    "newspaper_article",
    "patent",
    "personal",
    "presentation",
    "report",
    "software",
    "statute",
    "thesis",
    "unpublished",
    "web_article",
];

const CSL_TYPES: &[&str] = &[
    "bill",
    "book",
    "chapter",
    "broadcast",
    "paper-conference",
    "motion_picture",
    "article-journal",
    "legal_case",
    "article-magazine",
    "manuscript",
    "map",
    "article-newspaper",
    "patent",
    "personal_communication",
    "report",
    "legislation",
    "thesis",
    "webpage",
    "article",
    "dataset",
    "entry",
    "entry-dictionary",
    "entry-encyclopedia",
    "figure",
    "graphic",
    "interview",
    "musical_score",
    "pamphlet",
    "post",
    "post-weblog",
    "review",
    "review-book",
    "song",
    "speech",
    "treaty",
];

// Kept as declared by the CSL mapping form: `author` and `container-title`
// appear twice and collapse on construction.
const CSL_FIELDS: &[&str] = &[
    "title",
    "type",
    "keyword",
    "author",
    "abstract",
    "issued",
    "collection-title",
    "container-title",
    "volume",
    "edition",
    "version",
    "chapter-number",
    "section",
    "issue",
    "number-of-volumes",
    "number",
    "page",
    "container",
    "event-date",
    "original-date",
    "publisher",
    "event-place",
    "publisher-place",
    "ISSN",
    "ISBN",
    "call-number",
    "citation-label",
    "URL",
    "DOI",
    "note",
    "original-title",
    "accessed",
    "annote",
    "archive",
    "archive_location",
    "archive-place",
    "author",
    "authority",
    "citation-number",
    "collection-editor",
    "collection-number",
    "composer",
    "container-author",
    "container-title",
    "container-title-short",
    "dimensions",
    "director",
    "editor",
    "editorial-director",
    "first-reference-note-number",
    "genre",
    "illustrator",
    "interviewer",
    "jurisdiction",
    "locator",
    "medium",
    "number-of-pages",
    "original-author",
    "original-publisher",
    "original-publisher-place",
    "page-first",
    "PMCID",
    "PMID",
    "recipient",
    "references",
    "reviewed-author",
    "reviewed-title",
    "scale",
    "source",
    "status",
    "submitted",
    "title-short",
    "translator",
    "year-suffix",
];

const BIBTEX_TYPES: &[&str] = &[
    "article",
    "book",
    "booklet",
    "conference",
    "inbook",
    "incollection",
    "inproceedings",
    "manual",
    "mastersthesis",
    "misc",
    "phdthesis",
    "proceedings",
    "techreport",
    "unpublished",
];

const BIBTEX_FIELDS: &[&str] = &[
    "type",
    "citekey",
    "author",
    "editor",
    "title",
    "journal",
    "booktitle",
    "series",
    "year",
    "month",
    "volume",
    "number",
    "pages",
    "edition",
    "chapter",
    "publisher",
    "address",
    "institution",
    "organization",
    "school",
    "howpublished",
    "isbn",
    "issn",
    "doi",
    "url",
    "keywords",
    "abstract",
    "note",
    "annote",
    "language",
];

const RIS_TYPES: &[&str] = &[
    "ABST", "BILL", "BOOK", "CASE", "CHAP", "COMP", "CONF", "CPAPER", "DATA", "ELEC", "GEN",
    "JOUR", "MAP", "MGZN", "MPCT", "NEWS", "PAT", "PCOMM", "RPRT", "SOUND", "STAT", "THES",
    "UNPB", "VIDEO",
];

const RIS_FIELDS: &[&str] = &[
    "TY", "TI", "T2", "T3", "ST", "AU", "A2", "KW", "AB", "PY", "DA", "Y2", "VL", "IS", "SP",
    "ET", "NV", "SE", "PB", "CY", "SN", "UR", "DO", "N1", "LA", "CN", "AN", "LB", "DB", "DP",
    "M3", "OP", "AD",
];

/// EndNote reference type names and their numeric codes.
pub const ENDNOTE_TYPES: &[(&str, u8)] = &[
    ("Generic", 13),
    ("Journal Article", 17),
    ("Book", 6),
    ("Book Section", 5),
    ("Edited Book", 28),
    ("Conference Paper", 47),
    ("Conference Proceedings", 10),
    ("Thesis", 32),
    ("Report", 27),
    ("Web Page", 12),
    ("Electronic Article", 43),
    ("Newspaper Article", 23),
    ("Magazine Article", 19),
    ("Patent", 25),
    ("Map", 20),
    ("Manuscript", 36),
    ("Dataset", 59),
    ("Film or Broadcast", 21),
    ("Personal Communication", 26),
    ("Statute", 31),
    ("Bill", 4),
    ("Case", 7),
    ("Unpublished Work", 34),
];

const ENDNOTE_FIELDS: &[&str] = &[
    "ref-type",
    "author",
    "secondary-author",
    "title",
    "secondary-title",
    "tertiary-title",
    "short-title",
    "alt-title",
    "translated-title",
    "keyword",
    "year",
    "pub-dates",
    "volume",
    "number",
    "pages",
    "edition",
    "section",
    "num-vols",
    "publisher",
    "pub-location",
    "isbn",
    "accession-num",
    "call-num",
    "label",
    "work-type",
    "url",
    "electronic-resource-num",
    "abstract",
    "notes",
    "research-notes",
    "language",
    "remote-database-name",
    "remote-database-provider",
    "auth-address",
    "reprint-edition",
    "orig-pub",
    "custom1",
    "custom2",
    "custom3",
    "custom4",
    "custom5",
    "custom6",
    "custom7",
];

const CSV_FIELDS: &[&str] = &[
    "type",
    "title",
    "author",
    "year",
    "date",
    "journal",
    "volume",
    "issue",
    "pages",
    "edition",
    "publisher",
    "place",
    "isbn",
    "issn",
    "doi",
    "url",
    "keywords",
    "abstract",
    "language",
    "notes",
];

/// Scalar coercion applied to values landing in a specific target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Assemble years and date strings into a date value.
    Date,
    /// Strip URL prefixes and markers from DOIs.
    Doi,
    /// Expand abbreviated page ranges.
    Pages,
}

/// Describes one citation export format.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDefinition {
    id: CompactString,
    label: CompactString,
    extension: CompactString,
    mime_type: CompactString,
    entry_types: BTreeSet<CompactString>,
    field_names: Vec<CompactString>,
    type_field: Option<CompactString>,
    key_field: Option<CompactString>,
    coercions: Vec<(CompactString, Coercion)>,
}

impl FormatDefinition {
    pub fn builder(id: &str, label: &str) -> FormatDefinitionBuilder {
        FormatDefinitionBuilder {
            id: id.into(),
            label: label.into(),
            extension: id.into(),
            mime_type: "text/plain".into(),
            entry_types: Vec::new(),
            field_names: Vec::new(),
            type_field: None,
            key_field: None,
            coercions: Vec::new(),
        }
    }

    /// Citation Style Language, serialized as CSL-JSON.
    pub fn csl() -> Self {
        Self::builder("csl", "CSL")
            .extension("json")
            .mime_type("application/vnd.citationstyles.csl+json")
            .entry_types(CSL_TYPES.iter().copied())
            .fields(CSL_FIELDS.iter().copied())
            .type_field("type")
            .coerce("issued", Coercion::Date)
            .coerce("accessed", Coercion::Date)
            .coerce("event-date", Coercion::Date)
            .coerce("original-date", Coercion::Date)
            .coerce("submitted", Coercion::Date)
            .coerce("DOI", Coercion::Doi)
            .coerce("page", Coercion::Pages)
            .build_static()
    }

    pub fn bibtex() -> Self {
        Self::builder("bibtex", "BibTeX")
            .extension("bib")
            .mime_type("application/x-bibtex")
            .entry_types(BIBTEX_TYPES.iter().copied())
            .fields(BIBTEX_FIELDS.iter().copied())
            .type_field("type")
            .key_field("citekey")
            .coerce("doi", Coercion::Doi)
            .coerce("pages", Coercion::Pages)
            .build_static()
    }

    pub fn ris() -> Self {
        Self::builder("ris", "RIS")
            .extension("ris")
            .mime_type("application/x-research-info-systems")
            .entry_types(RIS_TYPES.iter().copied())
            .fields(RIS_FIELDS.iter().copied())
            .type_field("TY")
            .coerce("DA", Coercion::Date)
            .coerce("Y2", Coercion::Date)
            .coerce("DO", Coercion::Doi)
            .coerce("SP", Coercion::Pages)
            .build_static()
    }

    pub fn endnote_xml() -> Self {
        Self::builder("endnote7xml", "EndNote 7 XML")
            .extension("xml")
            .mime_type("application/xml")
            .entry_types(ENDNOTE_TYPES.iter().map(|(name, _)| *name))
            .fields(ENDNOTE_FIELDS.iter().copied())
            .type_field("ref-type")
            .coerce("electronic-resource-num", Coercion::Doi)
            .coerce("pages", Coercion::Pages)
            .build_static()
    }

    pub fn csv() -> Self {
        Self::builder("csv", "CSV")
            .extension("csv")
            .mime_type("text/csv")
            .entry_types(REFERENCE_TYPES.iter().copied())
            .fields(CSV_FIELDS.iter().copied())
            .type_field("type")
            .coerce("doi", Coercion::Doi)
            .coerce("pages", Coercion::Pages)
            .build_static()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Field names in declaration order, duplicates removed.
    pub fn field_names(&self) -> &[CompactString] {
        &self.field_names
    }

    pub fn entry_types(&self) -> impl Iterator<Item = &str> {
        self.entry_types.iter().map(CompactString::as_str)
    }

    pub fn type_field(&self) -> Option<&str> {
        self.type_field.as_deref()
    }

    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    pub fn is_valid_type(&self, entry_type: &str) -> bool {
        self.entry_types.contains(entry_type)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Position of a field in declaration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.field_names.iter().position(|f| f == name)
    }

    pub fn coercion(&self, field: &str) -> Option<Coercion> {
        self.coercions
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, coercion)| *coercion)
    }
}

/// Builder for [`FormatDefinition`].
#[derive(Debug, Clone)]
pub struct FormatDefinitionBuilder {
    id: CompactString,
    label: CompactString,
    extension: CompactString,
    mime_type: CompactString,
    entry_types: Vec<CompactString>,
    field_names: Vec<CompactString>,
    type_field: Option<CompactString>,
    key_field: Option<CompactString>,
    coercions: Vec<(CompactString, Coercion)>,
}

impl FormatDefinitionBuilder {
    #[must_use]
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    #[must_use]
    pub fn entry_types<'a>(mut self, types: impl IntoIterator<Item = &'a str>) -> Self {
        self.entry_types.extend(types.into_iter().map(CompactString::from));
        self
    }

    #[must_use]
    pub fn fields<'a>(mut self, fields: impl IntoIterator<Item = &'a str>) -> Self {
        self.field_names.extend(fields.into_iter().map(CompactString::from));
        self
    }

    /// Target field that carries the entry type.
    #[must_use]
    pub fn type_field(mut self, field: &str) -> Self {
        self.type_field = Some(field.into());
        self
    }

    /// Target field whose value becomes the entry key instead of a regular field.
    #[must_use]
    pub fn key_field(mut self, field: &str) -> Self {
        self.key_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn coerce(mut self, field: &str, coercion: Coercion) -> Self {
        self.coercions.push((field.into(), coercion));
        self
    }

    /// Builds the definition, collapsing duplicate field names.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidFormatDefinition`] if the field list is
    /// empty or a type, key or coerced field is not one of the format's fields.
    pub fn build(self) -> Result<FormatDefinition> {
        let field_names: Vec<CompactString> = self.field_names.into_iter().unique().collect();
        if field_names.is_empty() {
            return Err(ExportError::InvalidFormatDefinition(format!(
                "format {} declares no fields",
                self.id
            )));
        }

        let referenced = self
            .type_field
            .iter()
            .chain(self.key_field.iter())
            .chain(self.coercions.iter().map(|(field, _)| field));
        for field in referenced {
            if !field_names.contains(field) {
                return Err(ExportError::InvalidFormatDefinition(format!(
                    "format {} references undeclared field {}",
                    self.id, field
                )));
            }
        }

        Ok(FormatDefinition {
            id: self.id,
            label: self.label,
            extension: self.extension,
            mime_type: self.mime_type,
            entry_types: self.entry_types.into_iter().collect(),
            field_names,
            type_field: self.type_field,
            key_field: self.key_field,
            coercions: self.coercions,
        })
    }

    // Built-in tables are covered by tests; a failure here is a bug in this file.
    fn build_static(self) -> FormatDefinition {
        match self.build() {
            Ok(format) => format,
            Err(err) => panic!("invalid built-in format: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_csl_duplicates_collapse() {
        let csl = FormatDefinition::csl();
        let authors = csl.field_names().iter().filter(|f| *f == "author").count();
        let containers = csl
            .field_names()
            .iter()
            .filter(|f| *f == "container-title")
            .count();
        assert_eq!(authors, 1);
        assert_eq!(containers, 1);
        assert_eq!(csl.field_names().len(), CSL_FIELDS.len() - 2);
        assert_eq!(csl.position("author"), Some(3));
    }

    #[rstest]
    #[case(FormatDefinition::csl())]
    #[case(FormatDefinition::bibtex())]
    #[case(FormatDefinition::ris())]
    #[case(FormatDefinition::endnote_xml())]
    #[case(FormatDefinition::csv())]
    fn test_builtin_formats_are_consistent(#[case] format: FormatDefinition) {
        assert!(!format.field_names().is_empty());
        let type_field = format.type_field().unwrap();
        assert!(format.has_field(type_field));
        assert!(format.entry_types().next().is_some());
    }

    #[rstest]
    #[case("article-journal", true)]
    #[case("book", true)]
    #[case("journal_article", false)]
    #[case("", false)]
    fn test_csl_valid_types(#[case] entry_type: &str, #[case] expected: bool) {
        assert_eq!(FormatDefinition::csl().is_valid_type(entry_type), expected);
    }

    #[test]
    fn test_empty_fields_rejected() {
        let result = FormatDefinition::builder("empty", "Empty").build();
        assert!(matches!(
            result,
            Err(ExportError::InvalidFormatDefinition(_))
        ));
    }

    #[test]
    fn test_undeclared_coercion_rejected() {
        let result = FormatDefinition::builder("x", "X")
            .fields(["title"])
            .coerce("issued", Coercion::Date)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_coercion_lookup() {
        let csl = FormatDefinition::csl();
        assert_eq!(csl.coercion("issued"), Some(Coercion::Date));
        assert_eq!(csl.coercion("DOI"), Some(Coercion::Doi));
        assert_eq!(csl.coercion("title"), None);
    }
}
