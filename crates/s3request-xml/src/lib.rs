//! S3 XML error documents for s3request.
//!
//! S3 reports failures with a flat `<Error>` element (`noErrorWrapping: true`):
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Error>
//!   <Code>NoSuchKey</Code>
//!   <Message>The specified key does not exist.</Message>
//!   <Key>missing.txt</Key>
//!   <RequestId>4442587FB7D0A2F9</RequestId>
//! </Error>
//! ```
//!
//! # Key components
//!
//! - [`parse_error_document`] reads such a body into an [`ErrorDocument`]
//! - [`error_to_xml`] is the inverse, for anything that has to answer like
//!   S3 does, such as a stand-in for an S3-compatible endpoint

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::{ErrorDocument, ErrorElement, parse_error_document};
pub use error::XmlError;
pub use serialize::error_to_xml;
