use bibcite::ExportError;
use bibcite::export::{ExportBatch, Exporter, MemoryStorage};
use bibcite::field::SourceField;
use bibcite::format::FormatDefinition;
use bibcite::mapping::{FieldMapping, MappingConfig};
use bibcite::normalize::{Normalized, Normalizer};
use bibcite::record::{SourceRecord, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn study() -> SourceRecord {
    SourceRecord::new("bibliography", "42")
        .with(SourceField::Title, "A Study")
        .with(SourceField::Author, Value::texts(["A. One", "B. Two"]))
        .with(SourceField::Type, "article-journal")
}

#[test]
fn csl_round_trip() {
    let csl = FormatDefinition::csl();
    let mut mapping = FieldMapping::new(&csl);
    mapping.map(SourceField::Title, "title").unwrap();
    mapping.map(SourceField::Author, "author").unwrap();
    mapping.map(SourceField::Type, "type").unwrap();

    let normalized = Normalizer::new(&mapping).normalize(&study()).unwrap();

    assert_eq!(normalized.get("title"), Some(&Normalized::Text("A Study".into())));
    assert_eq!(
        normalized.get("author"),
        Some(&Normalized::List(vec![
            Normalized::Text("A. One".into()),
            Normalized::Text("B. Two".into()),
        ]))
    );
    assert_eq!(normalized.get("type"), Some(&Normalized::Text("article-journal".into())));
    assert!(mapping.is_valid_type("article-journal"));
}

#[test]
fn normalization_is_idempotent() {
    let mapping = FieldMapping::default_for(&FormatDefinition::csl());
    let normalizer = Normalizer::new(&mapping);
    let record = study()
        .with(SourceField::Year, 1999_i64)
        .with(SourceField::Doi, "https://doi.org/10.1000/XYZ");

    assert_eq!(normalizer.normalize(&record).unwrap(), normalizer.normalize(&record).unwrap());
}

#[test]
fn unknown_fields_are_ignored() {
    let mapping = FieldMapping::default_for(&FormatDefinition::bibtex());
    let normalizer = Normalizer::new(&mapping);
    let plain = study();
    let mut extended = study();
    extended.set("field_legacy_import_id", "x-17");

    assert_eq!(normalizer.normalize(&extended).unwrap(), normalizer.normalize(&plain).unwrap());
}

#[rstest]
#[case(Vec::new(), Normalized::List(Vec::new()))]
#[case(vec!["only"], Normalized::Text("only".into()))]
#[case(
    vec!["a", "b"],
    Normalized::List(vec![Normalized::Text("a".into()), Normalized::Text("b".into())])
)]
fn keyword_lists_collapse(#[case] keywords: Vec<&str>, #[case] expected: Normalized) {
    let mapping = FieldMapping::default_for(&FormatDefinition::ris());
    let record =
        SourceRecord::new("bibliography", "1").with(SourceField::Keywords, Value::texts(keywords));

    let normalized = Normalizer::new(&mapping).normalize(&record).unwrap();
    assert_eq!(normalized.get("KW"), Some(&expected));
}

#[test]
fn configured_mapping_drives_export() {
    let config = MappingConfig::from_json(
        r#"{
            "fields": {"TI": "title", "T2": "bibcite_secondary_title", "TY": "type"},
            "types": {"BOOK": "book"}
        }"#,
    )
    .unwrap();
    let mapping = FieldMapping::from_config(&FormatDefinition::ris(), &config).unwrap();

    let mut registry = bibcite::FormatRegistry::default();
    registry.register(mapping, bibcite::render::RisRenderer::new());

    let storage = MemoryStorage::new().with_record(
        SourceRecord::new("bibliography", "9")
            .with(SourceField::Type, "book")
            .with(SourceField::Title, "Fish")
            .with(SourceField::SecondaryTitle, "Series")
            .with(SourceField::Year, 2001_i64),
    );
    let exporter = Exporter::new(storage).with_registry(registry);

    let file = exporter.export("ris", "bibliography", "9").unwrap();
    assert_eq!(file.file_name(), "bibliography-9-RIS.ris");
    assert_eq!(file.text(), "TY  - BOOK\nTI  - Fish\nT2  - Series\nER  - ");
}

#[test]
fn batch_export_uses_override_filename() {
    let exporter = Exporter::new(MemoryStorage::new());
    let batch =
        ExportBatch::new("bibliography", "csv", vec![study()]).with_filename("reading-list");

    let text = exporter.render(&batch).unwrap();
    let format = exporter.registry().get("csv").unwrap().definition();
    let file = exporter.package_as_file(text, format, batch.filename.as_deref());

    assert_eq!(file.file_name(), "reading-list.csv");
    assert!(file.text().starts_with("id,"));
}

#[rstest]
#[case("csl")]
#[case("bibtex")]
#[case("ris")]
#[case("endnote7xml")]
#[case("csv")]
fn missing_entity_is_not_found_in_every_format(#[case] format: &str) {
    let exporter = Exporter::new(MemoryStorage::new().with_record(study()));

    let err = exporter.export(format, "bibliography", "7").unwrap_err();
    assert!(matches!(err, ExportError::NotFound { .. }));
    assert_eq!(err.status_code(), 404);

    let err = exporter.export_multiple(format, "bibliography", &[]).unwrap_err();
    assert!(matches!(err, ExportError::NotFound { ref ids, .. } if ids.is_empty()));
}

#[test]
fn mapping_errors_surface_at_construction() {
    let config = MappingConfig::from_json(r#"{"fields": {"not-a-csl-field": "title"}}"#).unwrap();
    let err = FieldMapping::from_config(&FormatDefinition::csl(), &config).unwrap_err();
    assert!(matches!(err, ExportError::InvalidMapping { ref format, .. } if format == "csl"));
}
