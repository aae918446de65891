//! XML reader wrapper and helper traits used by the workbook parser.

use crate::error::AuditError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),
}

/// Streaming XML reader configured for spreadsheet parts.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        // `<c r="A1"/>` is reported as Start + End so the row/cell loops stay uniform
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Reads the next event, `None` at end of document.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, AuditError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(AuditError::XmlError(error)),
        }
    }
}

pub(crate) trait XmlNodeHelper<'a> {
    /// Gets the unescaped value of the named attribute.
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, AuditError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, AuditError> {
        self.try_get_attribute(name)?
            .map(|attribute: Attribute<'a>| -> Result<Cow<'a, str>, AuditError> {
                Ok(attribute.unescape_value()?)
            })
            .transpose()
    }
}

pub(crate) trait XmlTextContextHelper {
    /// Appends the text behind an entity or character reference (`&amp;`, `&#x41;`).
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), AuditError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), AuditError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = if let Some(hex) = number.strip_prefix('x') {
                u32::from_str_radix(hex, 16)?
            } else {
                number.parse::<u32>()?
            };
            if let Some(character) = char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            return Err(XmlError::ParseEntityError(raw.to_string()).into());
        }
        Ok(())
    }
}

/// Loops over the events of an [`XmlReader`], dispatching to the given arms
/// and ignoring everything else.
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

pub(crate) use match_xml_events;
