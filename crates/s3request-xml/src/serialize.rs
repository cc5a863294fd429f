//! Rendering S3 error XML.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

/// Format an S3 error as XML.
///
/// `Code` and `Message` come first, followed by `fields` in the given order.
/// The output is what [`parse_error_document`](crate::parse_error_document)
/// reads back.
///
/// ```
/// use s3request_xml::{error_to_xml, parse_error_document};
///
/// let body = error_to_xml("NoSuchKey", "The specified key does not exist.", &[
///     ("Key", "missing.txt"),
/// ]);
/// let doc = parse_error_document(&body)?;
/// assert_eq!(doc.get("Key"), Some("missing.txt"));
/// # Ok::<(), s3request_xml::XmlError>(())
/// ```
///
/// # Example output
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error>
///   <Code>NoSuchBucket</Code>
///   <Message>The specified bucket does not exist</Message>
///   <BucketName>mybucket</BucketName>
/// </Error>
/// ```
#[must_use]
pub fn error_to_xml(code: &str, message: &str, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    // Writing to Vec<u8> is infallible; if this fails it means a logic error.
    if let Err(e) = write_error_xml(&mut buf, code, message, fields) {
        tracing::error!(error = %e, "failed to serialize S3 error XML");
        buf.clear();
    }
    buf
}

fn write_error_xml(
    buf: &mut Vec<u8>,
    code: &str,
    message: &str,
    fields: &[(&str, &str)],
) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(code))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(message))?;
        for (name, value) in fields {
            w.create_element(*name)
                .write_text_content(BytesText::new(value))?;
        }
        Ok(())
    })?;

    Ok(())
}
