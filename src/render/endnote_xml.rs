//! EndNote 7 XML output.
//!
//! Grouped fields (contributors, titles, keywords, dates, urls) are written
//! inside their EndNote wrapper elements; every other field is written as a
//! flat element named after the field.

use super::{Renderer, entry_type};
use crate::format::{ENDNOTE_TYPES, FormatDefinition};
use crate::normalize::NormalizedRecord;
use crate::{ExportError, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

const GENERIC_TYPE: (&str, u8) = ("Generic", 13);

/// (wrapper path, field, element) for grouped fields.
const GROUPED: &[(&[&str], &str, &str)] = &[
    (&["contributors", "authors"], "author", "author"),
    (&["contributors", "secondary-authors"], "secondary-author", "author"),
    (&["titles"], "title", "title"),
    (&["titles"], "secondary-title", "secondary-title"),
    (&["titles"], "tertiary-title", "tertiary-title"),
    (&["titles"], "short-title", "short-title"),
    (&["titles"], "alt-title", "alt-title"),
    (&["titles"], "translated-title", "translated-title"),
    (&["keywords"], "keyword", "keyword"),
    (&["dates"], "year", "year"),
    (&["dates", "pub-dates"], "pub-dates", "date"),
    (&["urls", "related-urls"], "url", "url"),
];

/// Renders records as an EndNote 7 XML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndNoteXmlRenderer;

impl EndNoteXmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for EndNoteXmlRenderer {
    fn render(&self, records: &[NormalizedRecord], format: &FormatDefinition) -> Result<String> {
        let mut xml = XmlOut {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            target: format.id(),
        };

        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.start("xml")?;
        xml.start("records")?;
        for record in records {
            write_record(&mut xml, record, format)?;
        }
        xml.end("records")?;
        xml.end("xml")?;

        String::from_utf8(xml.writer.into_inner())
            .map_err(|e| ExportError::render(format.id(), e))
    }
}

fn write_record(
    xml: &mut XmlOut<'_>,
    record: &NormalizedRecord,
    format: &FormatDefinition,
) -> Result<()> {
    xml.start("record")?;

    let type_field = format.type_field().unwrap_or("ref-type");
    let (name, code) = entry_type(record, format)
        .and_then(|t| ENDNOTE_TYPES.iter().find(|(name, _)| *name == t).copied())
        .unwrap_or(GENERIC_TYPE);
    let mut ref_type = BytesStart::new("ref-type");
    ref_type.push_attribute(("name", name));
    xml.event(Event::Start(ref_type))?;
    xml.text(&code.to_string())?;
    xml.end("ref-type")?;

    // Write each wrapper path once, with all its grouped fields.
    let mut open: Vec<&str> = Vec::new();
    for (path, field, element) in GROUPED {
        let Some(value) = record.get(field) else {
            continue;
        };
        let common = open.iter().zip(path.iter()).take_while(|(a, b)| a == b).count();
        while open.len() > common {
            if let Some(name) = open.pop() {
                xml.end(name)?;
            }
        }
        for name in path.iter().skip(common) {
            xml.start(name)?;
            open.push(name);
        }
        for item in value.items() {
            xml.element(element, &item.to_text(" "))?;
        }
    }
    while let Some(name) = open.pop() {
        xml.end(name)?;
    }

    for (field, value) in &record.fields {
        if field == type_field || GROUPED.iter().any(|(_, f, _)| *f == field.as_str()) {
            continue;
        }
        xml.element(field, &value.to_text("; "))?;
    }

    xml.end("record")
}

struct XmlOut<'a> {
    writer: Writer<Vec<u8>>,
    target: &'a str,
}

impl XmlOut<'_> {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| ExportError::render(self.target, e))
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name)?;
        self.text(text)?;
        self.end(name)
    }
}
