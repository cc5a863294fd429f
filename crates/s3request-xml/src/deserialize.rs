//! Parsing S3 error XML.
//!
//! The parser is deliberately schema-agnostic: it accepts any root element
//! and records each direct child's tag name and text, in document order.
//! Interpreting the fields is left to the caller.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::XmlError;

/// One child element of the error document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorElement {
    /// Tag name exactly as it appears in the document (e.g. `RequestId`).
    pub name: String,
    /// Text content, with entities resolved.
    pub text: String,
}

/// A parsed error document: the root tag and its direct children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorDocument {
    /// Root element name, normally `Error`.
    pub root: String,
    /// Child elements in document order.
    pub elements: Vec<ErrorElement>,
}

impl ErrorDocument {
    /// Text of the first child element named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|element| element.name == name)
            .map(|element| element.text.as_str())
    }
}

/// Parse an S3 error body.
///
/// # Errors
///
/// Returns `XmlError` if the body is not well-formed XML or has no root element.
///
/// # Examples
///
/// ```
/// use s3request_xml::parse_error_document;
///
/// let doc = parse_error_document(b"<Error><Code>NoSuchKey</Code></Error>").unwrap();
/// assert_eq!(doc.get("Code"), Some("NoSuchKey"));
/// assert!(parse_error_document(b"Internal Server Error").is_err());
/// ```
pub fn parse_error_document(xml: &[u8]) -> Result<ErrorDocument, XmlError> {
    let mut reader = Reader::from_reader(xml);

    // Skip the XML declaration and find the root element.
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let root = element_name(e.name().as_ref())?;
                let elements = read_children(&mut reader, &root)?;
                return Ok(ErrorDocument { root, elements });
            }
            Event::Empty(e) => {
                return Ok(ErrorDocument {
                    root: element_name(e.name().as_ref())?,
                    elements: Vec::new(),
                });
            }
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                if !decoded.trim().is_empty() {
                    return Err(XmlError::MissingElement("root element".to_string()));
                }
            }
            Event::Eof => {
                return Err(XmlError::MissingElement("root element".to_string()));
            }
            // Skip declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }
}

fn element_name(raw: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(raw)
        .map(ToOwned::to_owned)
        .map_err(|e| XmlError::ParseError(e.to_string()))
}

/// Read the direct children of the root until its end tag.
fn read_children(reader: &mut Reader<&[u8]>, root: &str) -> Result<Vec<ErrorElement>, XmlError> {
    let mut elements = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(e.name().as_ref())?;
                let text = read_text_content(reader)?;
                elements.push(ErrorElement { name, text });
            }
            Event::Empty(e) => {
                elements.push(ErrorElement {
                    name: element_name(e.name().as_ref())?,
                    text: String::new(),
                });
            }
            Event::End(_) => return Ok(elements),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(format!(
                    "unexpected EOF in {root}"
                )));
            }
            _ => {}
        }
    }
}

/// Read the text content of the current element and consume its end tag.
///
/// Only the element's own text is collected; nested elements are skipped.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?
                {
                    text.push(ch);
                } else {
                    let entity = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&entity)
                        .ok_or_else(|| {
                            XmlError::ParseError(format!("unknown entity: {entity}"))
                        })?;
                    text.push_str(resolved);
                }
            }
            Event::CData(e) => {
                let raw = std::str::from_utf8(&e)
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(raw);
            }
            Event::Start(_) => skip_element(reader)?,
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_string(),
                ));
            }
            _ => {}
        }
    }
}
