//! XML document encoding for a [`ContactCollection`].
//!
//! Layout:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
//! <contactBook name="Contacts">
//!     <contacts>
//!         <contact>
//!             <uuid>6f1c…</uuid>
//!             <name>Ana</name>
//!             <lastName>Lopez</lastName>
//!             <email>ana@x.com</email>
//!             <address>1 Main St</address>
//!             <phone>555-1234</phone>
//!         </contact>
//!     </contacts>
//! </contactBook>
//! ```
//!
//! Absent fields are not written. When reading, an empty element is the
//! empty string, unknown elements are skipped, and stored values are taken
//! as-is without re-running the email/phone validators.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::collection::ContactCollection;
use crate::models::{ContactRecord, Field};

const ROOT: &str = "contactBook";
const LIST: &str = "contacts";
const ITEM: &str = "contact";
const INDENT: usize = 4;

/// Error produced while encoding or decoding a contact document.
#[derive(Debug)]
pub enum CodecError {
    /// Malformed XML or an I/O failure inside the XML writer.
    Xml(String),
    /// The document has no root element.
    MissingRoot,
    /// The root element is not `<contactBook>`.
    UnexpectedRoot(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Xml(e) => write!(f, "invalid contact document: {}", e),
            CodecError::MissingRoot => write!(f, "contact document has no <{}> element", ROOT),
            CodecError::UnexpectedRoot(tag) => {
                write!(f, "expected <{}> root element, found <{}>", ROOT, tag)
            }
        }
    }
}

impl std::error::Error for CodecError {}

fn xml_err(e: impl std::fmt::Display) -> CodecError {
    CodecError::Xml(e.to_string())
}

/// Element name used for `field` in the document.
fn element_name(field: Field) -> &'static str {
    match field {
        Field::Id => "uuid",
        other => other.as_str(),
    }
}

fn field_for_element(tag: &[u8]) -> Option<Field> {
    match tag {
        b"uuid" | b"id" => Some(Field::Id),
        b"name" => Some(Field::Name),
        b"lastName" => Some(Field::LastName),
        b"email" => Some(Field::Email),
        b"address" => Some(Field::Address),
        b"phone" => Some(Field::Phone),
        _ => None,
    }
}

fn assign(record: &mut ContactRecord, field: Field, value: String) {
    let slot = match field {
        Field::Id => &mut record.id,
        Field::Name => &mut record.name,
        Field::LastName => &mut record.last_name,
        Field::Email => &mut record.email,
        Field::Address => &mut record.address,
        Field::Phone => &mut record.phone,
    };
    *slot = Some(value);
}

/// Serializes `collection` to an indented XML document.
pub fn encode(collection: &ContactCollection) -> Result<String, CodecError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new(ROOT).with_attributes([("name", collection.name())]),
        ))
        .map_err(xml_err)?;

    if collection.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(LIST)))
            .map_err(xml_err)?;
    } else {
        writer
            .write_event(Event::Start(BytesStart::new(LIST)))
            .map_err(xml_err)?;
        for record in collection.records() {
            write_record(&mut writer, record)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(LIST)))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT)))
        .map_err(xml_err)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_err)?;
    xml.push('\n');
    Ok(xml)
}

fn write_record(writer: &mut Writer<Vec<u8>>, record: &ContactRecord) -> Result<(), CodecError> {
    writer
        .write_event(Event::Start(BytesStart::new(ITEM)))
        .map_err(xml_err)?;
    for field in Field::ALL {
        if let Some(value) = record.get(field) {
            let tag = element_name(field);
            writer
                .write_event(Event::Start(BytesStart::new(tag)))
                .map_err(xml_err)?;
            writer
                .write_event(Event::Text(BytesText::new(value)))
                .map_err(xml_err)?;
            writer
                .write_event(Event::End(BytesEnd::new(tag)))
                .map_err(xml_err)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(ITEM)))
        .map_err(xml_err)?;
    Ok(())
}

fn root_name(start: &BytesStart<'_>) -> Result<Option<String>, CodecError> {
    let tag = start.local_name();
    if tag.as_ref() != ROOT.as_bytes() {
        return Err(CodecError::UnexpectedRoot(
            String::from_utf8_lossy(tag.as_ref()).into_owned(),
        ));
    }
    match start.try_get_attribute("name").map_err(xml_err)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_err)?.into_owned())),
        None => Ok(None),
    }
}

/// Parses a contact document.
///
/// `default_name` is used when the root element carries no `name`
/// attribute. Stored ids are kept; see
/// [`ContactCollection::from_records`] for how bad ids are repaired.
pub fn decode(xml: &str, default_name: &str) -> Result<ContactCollection, CodecError> {
    let mut reader = Reader::from_str(xml);

    let mut root: Option<Option<String>> = None;
    let mut records = Vec::new();
    let mut current: Option<ContactRecord> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => {
                if root.is_none() {
                    root = Some(root_name(&e)?);
                } else if current.is_some() {
                    field = field_for_element(e.local_name().as_ref());
                    text.clear();
                } else if e.local_name().as_ref() == ITEM.as_bytes() {
                    current = Some(ContactRecord::new());
                }
            }
            Event::Empty(e) => {
                if root.is_none() {
                    root = Some(root_name(&e)?);
                } else if let Some(record) = current.as_mut() {
                    if let Some(f) = field_for_element(e.local_name().as_ref()) {
                        assign(record, f, String::new());
                    }
                } else if e.local_name().as_ref() == ITEM.as_bytes() {
                    records.push(ContactRecord::new());
                }
            }
            Event::Text(t) => {
                if field.is_some() {
                    text.push_str(&t.unescape().map_err(xml_err)?);
                }
            }
            Event::CData(c) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                if let Some(f) = field.take() {
                    if let Some(record) = current.as_mut() {
                        assign(record, f, std::mem::take(&mut text));
                    }
                } else if e.local_name().as_ref() == ITEM.as_bytes() {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let name = match root {
        None => return Err(CodecError::MissingRoot),
        Some(name) => name.unwrap_or_else(|| default_name.to_string()),
    };
    Ok(ContactCollection::from_records(name, records))
}
