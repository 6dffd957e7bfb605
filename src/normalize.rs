//! Normalization of source records into format-shaped structures.
//!
//! The normalizer walks a [`SourceRecord`], resolves each field through a
//! [`FieldMapping`], and applies the collapsing rule: a list with exactly one
//! element becomes that element, any other list (including an empty one)
//! stays a list. Compound values are normalized recursively with the same
//! rule.
//!
//! # Example
//!
//! ```
//! use bibcite::format::FormatDefinition;
//! use bibcite::mapping::FieldMapping;
//! use bibcite::normalize::{Normalized, Normalizer};
//! use bibcite::record::{SourceRecord, Value};
//!
//! let mapping = FieldMapping::default_for(&FormatDefinition::csl());
//! let record = SourceRecord::new("bibliography", "1")
//!     .with("title", "A Study")
//!     .with("author", Value::texts(["Jane Doe"]));
//!
//! let normalized = Normalizer::new(&mapping).normalize(&record).unwrap();
//! assert_eq!(normalized.get("author"), Some(&Normalized::Text("Jane Doe".into())));
//! ```

use crate::field::{FieldShape, SourceField};
use crate::format::Coercion;
use crate::mapping::FieldMapping;
use crate::record::{Date, SourceRecord, Value};
use crate::utils::{format_doi, format_page_numbers, parse_date};
use crate::{ExportError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// A normalized value, shaped for the target format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Text(String),
    Integer(i64),
    Date(#[serde(serialize_with = "serialize_date_parts")] Date),
    List(Vec<Normalized>),
    Map(BTreeMap<String, Normalized>),
}

impl Normalized {
    /// Flattens the value to display text.
    ///
    /// Contributor maps render as "Family, Given"; lists are joined with `separator`.
    pub fn to_text(&self, separator: &str) -> String {
        match self {
            Normalized::Text(text) => text.clone(),
            Normalized::Integer(n) => n.to_string(),
            Normalized::Date(date) => format_date(date),
            Normalized::List(items) => items
                .iter()
                .map(|item| item.to_text(separator))
                .collect::<Vec<_>>()
                .join(separator),
            Normalized::Map(parts) => contributor_name(parts),
        }
    }

    /// Elements of a list, or the value itself.
    pub fn items(&self) -> Vec<&Normalized> {
        match self {
            Normalized::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    /// Publication year carried by a date or integer.
    pub fn year(&self) -> Option<i64> {
        match self {
            Normalized::Integer(n) => Some(*n),
            Normalized::Date(date) => Some(i64::from(date.year)),
            _ => None,
        }
    }
}

fn serialize_date_parts<S: Serializer>(
    date: &Date,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct DateParts {
        #[serde(rename = "date-parts")]
        date_parts: [Vec<i32>; 1],
    }
    DateParts {
        date_parts: [date.parts()],
    }
    .serialize(serializer)
}

fn format_date(date: &Date) -> String {
    match (date.month, date.day) {
        (Some(month), Some(day)) => format!("{:04}-{:02}-{:02}", date.year, month, day),
        (Some(month), None) => format!("{:04}-{:02}", date.year, month),
        _ => date.year.to_string(),
    }
}

fn contributor_name(parts: &BTreeMap<String, Normalized>) -> String {
    let part = |key: &str| parts.get(key).map(|v| v.to_text(" "));
    if let Some(literal) = part("literal") {
        return literal;
    }
    let family = [part("non-dropping-particle"), part("family")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let given = [part("given"), part("dropping-particle")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let mut name = match (family.is_empty(), given.is_empty()) {
        (false, false) => format!("{family}, {given}"),
        (false, true) => family,
        (true, _) => given,
    };
    if let Some(suffix) = part("suffix") {
        name.push_str(", ");
        name.push_str(&suffix);
    }
    name
}

/// Per-record output of the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub entity_type: String,
    pub id: String,
    /// Target fields in the format's declaration order.
    pub fields: Vec<(String, Normalized)>,
}

impl NormalizedRecord {
    pub fn get(&self, field: &str) -> Option<&Normalized> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// CSL-JSON item: the record id plus every normalized field.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::RenderFailure`] if a value cannot be serialized.
    pub fn to_csl_json(&self) -> Result<serde_json::Value> {
        let mut item = serde_json::Map::new();
        item.insert("id".to_string(), serde_json::Value::String(self.id.clone()));
        for (name, value) in &self.fields {
            let value = serde_json::to_value(value).map_err(|e| ExportError::render("csl", e))?;
            item.insert(name.clone(), value);
        }
        Ok(serde_json::Value::Object(item))
    }
}

/// What to do when one record of a batch violates the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Drop the offending record and keep going.
    #[default]
    SkipRecord,
    /// Abort the whole batch on the first violation.
    FailBatch,
}

/// Normalized batch plus the records that were skipped.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<NormalizedRecord>,
    pub skipped: Vec<ExportError>,
}

/// Converts source records into normalized records for one format.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    mapping: &'a FieldMapping,
}

impl<'a> Normalizer<'a> {
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self { mapping }
    }

    /// Normalizes one record.
    ///
    /// Unmapped and unknown fields are dropped. Unknown entry types pass
    /// through with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::SchemaViolation`] when a mapped field's value
    /// does not have the field's declared shape.
    pub fn normalize(&self, record: &SourceRecord) -> Result<NormalizedRecord> {
        let format = self.mapping.format();
        let mut fields = BTreeMap::new();

        for (source, value) in &record.fields {
            let Some(target) = self.mapping.resolve_target_field(source) else {
                trace!(record = %record.id, field = %source, "dropping unmapped field");
                continue;
            };
            check_shape(record, source, value)?;

            let mut normalized = normalize_value(value, format.coercion(target));
            if format.type_field() == Some(target) {
                normalized = self.normalize_type(record, normalized);
            }
            if let Some(position) = format.position(target) {
                fields.insert(position, (target.to_string(), normalized));
            }
        }

        Ok(NormalizedRecord {
            entity_type: record.entity_type.clone(),
            id: record.id.clone(),
            fields: fields.into_values().collect(),
        })
    }

    /// Normalizes a batch according to `policy`.
    ///
    /// # Errors
    ///
    /// With [`BatchPolicy::FailBatch`], the first violation. With
    /// [`BatchPolicy::SkipRecord`], the first violation only when every record
    /// of a non-empty batch failed.
    pub fn normalize_batch(
        &self,
        records: &[SourceRecord],
        policy: BatchPolicy,
    ) -> Result<BatchOutcome> {
        let mut normalized = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for record in records {
            match self.normalize(record) {
                Ok(n) => normalized.push(n),
                Err(err) if policy == BatchPolicy::SkipRecord => {
                    warn!(record = %record.id, %err, "skipping record");
                    skipped.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        if normalized.is_empty() && !skipped.is_empty() {
            return Err(skipped.remove(0));
        }

        Ok(BatchOutcome {
            records: normalized,
            skipped,
        })
    }

    fn normalize_type(&self, record: &SourceRecord, value: Normalized) -> Normalized {
        let entry_type = match value {
            Normalized::Text(entry_type) => entry_type,
            other => return other,
        };
        let resolved = self.mapping.resolve_type(&entry_type);
        if !self.mapping.is_valid_type(resolved) {
            warn!(
                record = %record.id,
                entry_type = resolved,
                format = self.mapping.format().id(),
                "entry type not valid for format, passing through"
            );
        }
        Normalized::Text(resolved.to_string())
    }
}

fn check_shape(record: &SourceRecord, field: &SourceField, value: &Value) -> Result<()> {
    let Some(shape) = field.shape() else {
        return Ok(());
    };
    // Single-valued fields may still arrive as a one-item list; that item is checked.
    let value = match (shape, value) {
        (FieldShape::Text | FieldShape::Integer, Value::List(items)) if items.len() == 1 => {
            &items[0]
        }
        _ => value,
    };
    let valid = match (shape, value) {
        (FieldShape::Text, Value::Text(_)) => true,
        (FieldShape::Integer, Value::Integer(_)) => true,
        (FieldShape::Sequence, Value::List(items)) => {
            !items.iter().any(|item| matches!(item, Value::List(_)))
        }
        _ => false,
    };
    if valid {
        return Ok(());
    }
    let found = match value {
        Value::List(items) if shape == FieldShape::Sequence => items
            .iter()
            .find(|item| matches!(item, Value::List(_)))
            .map_or("list", |_| "nested list"),
        other => other.kind(),
    };
    Err(ExportError::SchemaViolation {
        record: record.id.clone(),
        field: field.as_name().to_string(),
        expected: shape.as_str(),
        found,
    })
}

fn normalize_value(value: &Value, coercion: Option<Coercion>) -> Normalized {
    match value {
        Value::List(items) if items.len() == 1 => normalize_value(&items[0], coercion),
        Value::List(items) => Normalized::List(
            items
                .iter()
                .map(|item| normalize_value(item, coercion))
                .collect(),
        ),
        Value::Compound(parts) => Normalized::Map(
            parts
                .iter()
                .map(|(key, part)| (key.clone(), normalize_value(part, None)))
                .collect(),
        ),
        Value::Text(text) => coerce_text(text, coercion),
        Value::Integer(n) => match coercion {
            Some(Coercion::Date) => match i32::try_from(*n) {
                Ok(year) => Normalized::Date(Date {
                    year,
                    month: None,
                    day: None,
                }),
                Err(_) => Normalized::Integer(*n),
            },
            _ => Normalized::Integer(*n),
        },
    }
}

fn coerce_text(text: &str, coercion: Option<Coercion>) -> Normalized {
    match coercion {
        Some(Coercion::Date) => parse_date(text)
            .map(Normalized::Date)
            .unwrap_or_else(|| Normalized::Text(text.to_string())),
        Some(Coercion::Doi) => {
            Normalized::Text(format_doi(text).unwrap_or_else(|| text.to_string()))
        }
        Some(Coercion::Pages) => Normalized::Text(format_page_numbers(text)),
        None => Normalized::Text(text.to_string()),
    }
}
