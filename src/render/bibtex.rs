use super::{Renderer, entry_type};
use crate::format::FormatDefinition;
use crate::normalize::{Normalized, NormalizedRecord};
use crate::Result;
use itertools::Itertools;

/// Fields whose values are joined with `and` instead of commas.
const NAME_FIELDS: &[&str] = &["author", "editor"];

/// Fields written without escaping.
const VERBATIM_FIELDS: &[&str] = &["url", "doi"];

/// Renders records as BibTeX entries separated by blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct BibtexRenderer;

impl BibtexRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render_entry(record: &NormalizedRecord, format: &FormatDefinition) -> String {
        let entry_type = entry_type(record, format)
            .map(str::to_lowercase)
            .unwrap_or_else(|| "misc".to_string());
        let key = format
            .key_field()
            .and_then(|field| record.get(field))
            .map(|value| value.to_text(""))
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| format!("{}{}", record.entity_type, record.id));
        let key: String = key.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();

        let mut result = format!("@{entry_type}{{{key},\n");
        for (name, value) in &record.fields {
            if Some(name.as_str()) == format.type_field()
                || Some(name.as_str()) == format.key_field()
            {
                continue;
            }
            result.push_str("  ");
            result.push_str(name);
            result.push_str(" = ");
            result.push_str(&format_value(name, value));
            result.push_str(",\n");
        }
        result.push('}');
        result
    }
}

impl Renderer for BibtexRenderer {
    fn render(&self, records: &[NormalizedRecord], format: &FormatDefinition) -> Result<String> {
        Ok(records
            .iter()
            .map(|record| Self::render_entry(record, format))
            .join("\n\n"))
    }
}

fn format_value(name: &str, value: &Normalized) -> String {
    let text = match value {
        Normalized::Integer(n) => return n.to_string(),
        Normalized::Date(_) if name == "year" => {
            return value.year().map(|year| year.to_string()).unwrap_or_default();
        }
        Normalized::List(_) if NAME_FIELDS.contains(&name) => {
            value.items().iter().map(|item| item.to_text(" ")).join(" and ")
        }
        other => other.to_text(", "),
    };
    let text = if VERBATIM_FIELDS.contains(&name) {
        text
    } else {
        escape_value(&text)
    };
    format!("{{{text}}}")
}

/// Escapes characters with special meaning in BibTeX values, braces included.
fn escape_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '&' | '%' | '#' | '_' | '{' | '}') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
