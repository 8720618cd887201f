//! Error types.
use std::fmt::Display;

use layerkit_ast::{error::XmlWriterError, parse::ParseError};

use crate::namespace::Role;

#[derive(Debug)]
/// Errors which may occur while extracting a layer from a document
pub enum ExtractError {
    /// The document couldn't be parsed
    Parse(ParseError),
    /// The document parsed doesn't have a root element
    MissingRoot,
    /// The root element doesn't declare the prefix required for the role
    MissingNamespace(Role),
    /// The `width` or `height` of the root element is missing or isn't a whole number
    InvalidDimension {
        /// The name of the attribute read
        attribute: &'static str,
        /// The value of the attribute, if present
        value: Option<String>,
    },
    /// The resulting document couldn't be serialized
    Serialize(XmlWriterError),
    /// The resulting document couldn't be written to the output
    Write(std::io::Error),
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => f.write_fmt(format_args!("Failed to parse document: {e}")),
            Self::MissingRoot => f.write_str("The document has no root element"),
            Self::MissingNamespace(role) => f.write_fmt(format_args!(
                "The root element doesn't declare the `{}` namespace used for {role}",
                role.prefix()
            )),
            Self::InvalidDimension {
                attribute,
                value: Some(value),
            } => f.write_fmt(format_args!(
                "Expected `{attribute}` to be a whole number, found `{value}`"
            )),
            Self::InvalidDimension {
                attribute,
                value: None,
            } => f.write_fmt(format_args!(
                "The root element has no `{attribute}` attribute"
            )),
            Self::Serialize(e) => f.write_fmt(format_args!("Failed to serialize document: {e}")),
            Self::Write(e) => f.write_fmt(format_args!("Failed to write document: {e}")),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::Write(e) => Some(e),
            Self::MissingRoot | Self::MissingNamespace(_) | Self::InvalidDimension { .. } => None,
        }
    }
}

impl From<ParseError> for ExtractError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<XmlWriterError> for ExtractError {
    fn from(value: XmlWriterError) -> Self {
        Self::Serialize(value)
    }
}
