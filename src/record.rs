//! Source records delivered by entity storage.
//!
//! A [`SourceRecord`] is a plain snapshot of one Bibliography entity. Storage
//! fills it in before the record reaches the normalization pipeline; nothing in
//! this crate reaches back into the storage layer.

use crate::field::SourceField;
use crate::utils::parse_author_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A calendar date with optional month and day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl Date {
    /// Date parts in CSL order, stopping at the first missing component.
    pub fn parts(&self) -> Vec<i32> {
        let mut parts = vec![self.year];
        if let Some(month) = self.month {
            parts.push(i32::from(month));
            if let Some(day) = self.day {
                parts.push(i32::from(day));
            }
        }
        parts
    }
}

/// Represents an author of a citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// The author's family name (surname)
    pub family_name: String,
    /// The author's given name (first name)
    pub given_name: String,
    /// Optional suffix such as "Jr."
    pub suffix: Option<String>,
}

impl Author {
    /// Parses "Family, Given" or "Family Given".
    pub fn parse(name: &str) -> Self {
        let (family_name, given_name) = parse_author_name(name);
        Author {
            family_name,
            given_name,
            suffix: None,
        }
    }
}

/// A field value as delivered by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    List(Vec<Value>),
    /// Structured value with named subfields, e.g. a contributor.
    Compound(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the value's shape, used in schema violation reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::List(_) => "list",
            Value::Compound(_) => "compound",
        }
    }

    /// Builds a list of text values.
    pub fn texts<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(|s| Value::Text(s.into())).collect())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Author> for Value {
    fn from(author: Author) -> Self {
        let mut parts = BTreeMap::new();
        if !author.family_name.is_empty() {
            parts.insert("family".to_string(), Value::Text(author.family_name));
        }
        if !author.given_name.is_empty() {
            parts.insert("given".to_string(), Value::Text(author.given_name));
        }
        if let Some(suffix) = author.suffix {
            parts.insert("suffix".to_string(), Value::Text(suffix));
        }
        Value::Compound(parts)
    }
}

/// One bibliographic entry, keyed by source field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub entity_type: String,
    pub id: String,
    pub fields: BTreeMap<SourceField, Value>,
}

impl SourceRecord {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field, replacing any previous value.
    #[must_use]
    pub fn with(mut self, field: impl Into<SourceField>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<SourceField>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Adds contributors parsed from "Family, Given" strings to the author field.
    pub fn add_authors<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let authors = names.into_iter().map(|n| Value::from(Author::parse(n)));
        match self.fields.entry(SourceField::Author).or_insert_with(|| Value::List(Vec::new())) {
            Value::List(items) => items.extend(authors),
            other => {
                let previous = std::mem::replace(other, Value::List(Vec::new()));
                if let Value::List(items) = other {
                    items.push(previous);
                    items.extend(authors);
                }
            }
        }
    }

    pub fn get(&self, field: &SourceField) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Entry type as stored on the entity, if any.
    pub fn entry_type(&self) -> Option<&str> {
        match self.fields.get(&SourceField::Type) {
            Some(Value::Text(t)) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_date_parts_stop_at_missing_component() {
        let date = Date {
            year: 2020,
            month: None,
            day: Some(3),
        };
        assert_eq!(date.parts(), vec![2020]);

        let date = Date {
            year: 2020,
            month: Some(5),
            day: Some(3),
        };
        assert_eq!(date.parts(), vec![2020, 5, 3]);
    }

    #[test]
    fn test_author_into_compound() {
        let value = Value::from(Author::parse("Doe, Jane"));
        let Value::Compound(parts) = value else {
            panic!("expected compound");
        };
        assert_eq!(parts.get("family"), Some(&Value::Text("Doe".to_string())));
        assert_eq!(parts.get("given"), Some(&Value::Text("Jane".to_string())));
        assert!(!parts.contains_key("suffix"));
    }

    #[test]
    fn test_add_authors_appends() {
        let mut record = SourceRecord::new("bibliography", "1");
        record.add_authors(["Doe, Jane"]);
        record.add_authors(["Smith, John"]);
        match record.get(&SourceField::Author) {
            Some(Value::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("unexpected author value: {:?}", other),
        }
    }

    #[test]
    fn test_record_builder_and_entry_type() {
        let record = SourceRecord::new("bibliography", "7")
            .with("type", "book")
            .with("bibcite_year", 2001_i64)
            .with("unknown_field", "x");
        assert_eq!(record.entry_type(), Some("book"));
        assert_eq!(
            record.get(&SourceField::Year),
            Some(&Value::Integer(2001))
        );
        assert!(record.get(&SourceField::Unknown("unknown_field".into())).is_some());
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let value: Value = serde_json::from_str(r#"["a", {"family": "Doe"}, 3]"#).unwrap();
        assert_eq!(value.kind(), "list");
    }
}
