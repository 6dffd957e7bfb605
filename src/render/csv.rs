use super::Renderer;
use crate::format::FormatDefinition;
use crate::normalize::NormalizedRecord;
use crate::{ExportError, Result};
use ::csv::WriterBuilder;

/// Separator for multi-valued cells, matching what CSV importers split on.
const LIST_SEPARATOR: &str = "; ";

/// Renders records as CSV with a header row.
///
/// Columns are the record id followed by every format field used by at least
/// one record, in the format's field order.
#[derive(Debug, Clone, Copy)]
pub struct CsvRenderer {
    delimiter: u8,
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Renderer for CsvRenderer {
    fn render(&self, records: &[NormalizedRecord], format: &FormatDefinition) -> Result<String> {
        let columns: Vec<&str> = format
            .field_names()
            .iter()
            .map(|f| f.as_str())
            .filter(|f| records.iter().any(|r| r.get(f).is_some()))
            .collect();

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());
        let fail = |e: ::csv::Error| ExportError::render(format.id(), e);

        writer
            .write_record(std::iter::once("id").chain(columns.iter().copied()))
            .map_err(fail)?;
        for record in records {
            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(record.id.clone());
            for column in &columns {
                row.push(
                    record
                        .get(column)
                        .map(|v| v.to_text(LIST_SEPARATOR))
                        .unwrap_or_default(),
                );
            }
            writer.write_record(&row).map_err(fail)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::render(format.id(), e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::render(format.id(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalized;
    use pretty_assertions::assert_eq;

    fn record(id: &str, fields: Vec<(&str, Normalized)>) -> NormalizedRecord {
        NormalizedRecord {
            entity_type: "bibliography".into(),
            id: id.into(),
            fields: fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    #[test]
    fn test_render_csv() {
        let records = vec![
            record(
                "1",
                vec![
                    ("title", Normalized::Text("First, with comma".into())),
                    (
                        "author",
                        Normalized::List(vec![
                            Normalized::Text("Doe, J".into()),
                            Normalized::Text("Roe, R".into()),
                        ]),
                    ),
                ],
            ),
            record("2", vec![("year", Normalized::Integer(2020))]),
        ];

        let output = CsvRenderer::new()
            .render(&records, &FormatDefinition::csv())
            .unwrap();
        assert_eq!(
            output,
            "id,title,author,year\n1,\"First, with comma\",\"Doe, J; Roe, R\",\n2,,,2020\n"
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let records = vec![record("1", vec![("title", Normalized::Text("T".into()))])];
        let output = CsvRenderer::new()
            .with_delimiter(b';')
            .render(&records, &FormatDefinition::csv())
            .unwrap();
        assert_eq!(output, "id;title\n1;T\n");
    }
}
