use super::Renderer;
use crate::format::FormatDefinition;
use crate::normalize::NormalizedRecord;
use crate::{ExportError, Result};

/// Renders records as a CSL-JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct CslJsonRenderer;

impl CslJsonRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// CSL-JSON items, one per record.
    pub fn items(records: &[NormalizedRecord]) -> Result<Vec<serde_json::Value>> {
        records.iter().map(NormalizedRecord::to_csl_json).collect()
    }
}

impl Renderer for CslJsonRenderer {
    fn render(&self, records: &[NormalizedRecord], format: &FormatDefinition) -> Result<String> {
        let items = Self::items(records)?;
        serde_json::to_string_pretty(&items).map_err(|e| ExportError::render(format.id(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalized;
    use crate::record::Date;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_csl_json() {
        let record = NormalizedRecord {
            entity_type: "bibliography".into(),
            id: "42".into(),
            fields: vec![
                ("title".into(), Normalized::Text("A Study".into())),
                ("type".into(), Normalized::Text("article-journal".into())),
                (
                    "author".into(),
                    Normalized::List(vec![
                        Normalized::Text("A. One".into()),
                        Normalized::Text("B. Two".into()),
                    ]),
                ),
                (
                    "issued".into(),
                    Normalized::Date(Date {
                        year: 2020,
                        month: Some(1),
                        day: None,
                    }),
                ),
            ],
        };

        let output = CslJsonRenderer::new()
            .render(&[record], &FormatDefinition::csl())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{
                "id": "42",
                "title": "A Study",
                "type": "article-journal",
                "author": ["A. One", "B. Two"],
                "issued": {"date-parts": [[2020, 1]]}
            }])
        );
    }
}
