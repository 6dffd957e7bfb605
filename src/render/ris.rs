use super::{Renderer, entry_type};
use crate::format::FormatDefinition;
use crate::normalize::{Normalized, NormalizedRecord};
use crate::record::Date;
use crate::Result;
use itertools::Itertools;

/// Renders records as RIS, one tagged line per value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisRenderer;

impl RisRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render_entry(record: &NormalizedRecord, format: &FormatDefinition) -> String {
        let mut lines = Vec::new();
        let type_field = format.type_field().unwrap_or("TY");
        lines.push(line("TY", entry_type(record, format).unwrap_or("GEN")));

        for (tag, value) in &record.fields {
            if tag == type_field {
                continue;
            }
            for item in value.items() {
                match (tag.as_str(), item) {
                    ("SP", Normalized::Text(pages)) => match pages.split_once('-') {
                        Some((start, end)) => {
                            lines.push(line("SP", start.trim()));
                            lines.push(line("EP", end.trim()));
                        }
                        None => lines.push(line("SP", pages)),
                    },
                    (_, Normalized::Date(date)) => lines.push(line(tag, &ris_date(date))),
                    (_, other) => lines.push(line(tag, &other.to_text(" "))),
                }
            }
        }

        lines.push("ER  - ".to_string());
        lines.join("\n")
    }
}

impl Renderer for RisRenderer {
    fn render(&self, records: &[NormalizedRecord], format: &FormatDefinition) -> Result<String> {
        Ok(records
            .iter()
            .map(|record| Self::render_entry(record, format))
            .join("\n\n"))
    }
}

fn line(tag: &str, content: &str) -> String {
    format!("{tag}  - {content}")
}

/// RIS dates are `YYYY/MM/DD/other` with empty slots for missing parts.
fn ris_date(date: &Date) -> String {
    let month = date.month.map(|m| format!("{m:02}")).unwrap_or_default();
    let day = date.day.map(|d| format!("{d:02}")).unwrap_or_default();
    format!("{:04}/{}/{}/", date.year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_render_entry() {
        let record = NormalizedRecord {
            entity_type: "bibliography".into(),
            id: "1".into(),
            fields: vec![
                ("TY".into(), Normalized::Text("JOUR".into())),
                ("TI".into(), Normalized::Text("Test Article".into())),
                (
                    "AU".into(),
                    Normalized::List(vec![
                        Normalized::Text("Smith, John".into()),
                        Normalized::Text("Doe, Jane".into()),
                    ]),
                ),
                ("PY".into(), Normalized::Integer(2023)),
                ("SP".into(), Normalized::Text("100-110".into())),
            ],
        };

        let output = RisRenderer::new()
            .render(&[record], &FormatDefinition::ris())
            .unwrap();
        assert_eq!(
            output,
            concat!(
                "TY  - JOUR\n",
                "TI  - Test Article\n",
                "AU  - Smith, John\n",
                "AU  - Doe, Jane\n",
                "PY  - 2023\n",
                "SP  - 100\n",
                "EP  - 110\n",
                "ER  - ",
            )
        );
    }

    #[test]
    fn test_missing_type_defaults_to_generic() {
        let record = NormalizedRecord {
            entity_type: "bibliography".into(),
            id: "1".into(),
            fields: vec![("TI".into(), Normalized::Text("T".into()))],
        };
        let output = RisRenderer::new()
            .render(&[record], &FormatDefinition::ris())
            .unwrap();
        assert!(output.starts_with("TY  - GEN\n"));
        assert!(output.ends_with("ER  - "));
    }

    #[rstest]
    #[case(Date { year: 2020, month: None, day: None }, "2020///")]
    #[case(Date { year: 2020, month: Some(5), day: None }, "2020/05//")]
    #[case(Date { year: 2020, month: Some(5), day: Some(1) }, "2020/05/01/")]
    fn test_ris_date(#[case] date: Date, #[case] expected: &str) {
        assert_eq!(ris_date(&date), expected);
    }
}
