//! Error types.
use std::fmt;

/// An error while writing a document with [`crate::xmlwriter::XmlWriter`].
#[derive(Debug)]
pub enum XmlWriterError {
    /// The underlying writer failed.
    IO(std::io::Error),
    /// The written document couldn't be read back as a string.
    UTF8(std::string::FromUtf8Error),
    /// An element was closed while none were open.
    ClosedUnopenedElement,
    /// An attribute was written outside of a start tag.
    AttributeWrittenBeforeElement,
    /// A declaration was written after the start of the document.
    DeclarationAlreadyWritten,
    /// Text was written outside of the root element.
    TextBeforeElement,
}

impl fmt::Display for XmlWriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO(err) => err.fmt(f),
            Self::UTF8(err) => err.fmt(f),
            Self::ClosedUnopenedElement => f.write_str("closed an element while none were open"),
            Self::AttributeWrittenBeforeElement => {
                f.write_str("wrote an attribute outside of a start tag")
            }
            Self::DeclarationAlreadyWritten => {
                f.write_str("wrote a declaration after the start of the document")
            }
            Self::TextBeforeElement => f.write_str("wrote text outside of the root element"),
        }
    }
}

impl std::error::Error for XmlWriterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(err) => Some(err),
            Self::UTF8(err) => Some(err),
            _ => None,
        }
    }
}
