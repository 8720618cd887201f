/*!
A streaming XML writer, based on the [xmlwriter](https://docs.rs/xmlwriter/latest/xmlwriter/index.html)
crate.

The writer checks the order of calls and escapes what's written, but names are written as given.
Misuse is returned as an [`XmlWriterError`] rather than a panic.

```
use layerkit_ast::xmlwriter::{Indent, Options, XmlWriter};

let mut w = XmlWriter::new(
    Vec::new(),
    Options {
        indent: Indent::Spaces(2),
        ..Options::default()
    },
);
w.start_element("svg")?;
w.write_attribute("viewBox", "0 0 96 96")?;
w.start_element("g")?;
w.write_attribute("inkscape:label", "icon")?;

let xml = String::from_utf8(w.end_document()?)?;
assert_eq!(xml, "<svg viewBox=\"0 0 96 96\">\n  <g inkscape:label=\"icon\"/>\n</svg>\n");
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use std::fmt::{self, Display, Write as _};
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::XmlWriterError;

/// A result from writing part of a document.
pub type Result = std::result::Result<(), XmlWriterError>;

/// The indentation of written nodes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub enum Indent {
    /// No indentation or line breaks are added, so the document's own whitespace is kept.
    #[default]
    None,
    /// Indent with the given number of spaces.
    Spaces(u8),
    /// Indent with tabs.
    Tabs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The error returned when a string isn't `none`, `tabs`, or a number of spaces
pub struct ParseIndentError(String);

/// Options for writing a document.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Options {
    /// Quote attribute values with `'` instead of `"`.
    ///
    /// Default: disabled
    pub use_single_quote: bool,
    /// How nested nodes are indented. Whitespace-only text is dropped by the serializer when
    /// indenting.
    ///
    /// Default: `None`
    pub indent: Indent,
    /// Write empty elements as `<g/>` instead of `<g></g>`.
    ///
    /// Default: enabled
    pub enable_self_closing: bool,
    /// Start a serialized document with `<?xml version="1.0" encoding="UTF-8"?>`.
    ///
    /// Default: enabled
    pub xml_declaration: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            use_single_quote: false,
            indent: Indent::None,
            enable_self_closing: true,
            xml_declaration: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum State {
    /// Nothing has been written
    Empty,
    /// Between nodes
    Document,
    /// Within a start tag, after its name or attributes
    Attributes,
}

#[derive(Clone, Debug)]
struct OpenElement {
    name: String,
    has_children: bool,
}

#[derive(Clone, Copy, Debug)]
enum Escape {
    Comment,
    Text,
    AttributeValue(char),
}

/// Formats into an io writer, replacing the characters which can't appear in the current
/// context with entities. Whitespace within attribute values is written as character references
/// so it isn't normalized to spaces when read back.
struct Escaped<'w, W: Write> {
    writer: &'w mut W,
    escape: Escape,
    error: Option<io::Error>,
}

impl<W: Write> Escaped<'_, W> {
    fn is_escaped(&self, c: char) -> bool {
        match self.escape {
            Escape::Comment => false,
            Escape::Text => matches!(c, '&' | '<' | '>'),
            Escape::AttributeValue(quote) => {
                matches!(c, '&' | '<' | '>' | '\n' | '\r' | '\t') || c == quote
            }
        }
    }

    fn write_escaped(&mut self, s: &str) -> io::Result<()> {
        let mut rest = s;
        while let Some(index) = rest.find(|c| self.is_escaped(c)) {
            let (plain, tail) = rest.split_at(index);
            self.writer.write_all(plain.as_bytes())?;
            let entity = match tail.as_bytes().first() {
                Some(b'&') => "&amp;",
                Some(b'<') => "&lt;",
                Some(b'>') => "&gt;",
                Some(b'"') => "&quot;",
                Some(b'\n') => "&#10;",
                Some(b'\r') => "&#13;",
                Some(b'\t') => "&#9;",
                _ => "&apos;",
            };
            self.writer.write_all(entity.as_bytes())?;
            rest = &tail[1..];
        }
        self.writer.write_all(rest.as_bytes())
    }
}

impl<W: Write> fmt::Write for Escaped<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_escaped(s).map_err(|error| {
            self.error = Some(error);
            fmt::Error
        })
    }
}

fn write_escaped<W: Write, T: Display + ?Sized>(
    writer: &mut W,
    escape: Escape,
    value: &T,
) -> Result {
    let mut escaped = Escaped {
        writer,
        escape,
        error: None,
    };
    if write!(escaped, "{value}").is_err() {
        let error = escaped
            .error
            .take()
            .unwrap_or_else(|| io::Error::other("failed to format value"));
        return Err(XmlWriterError::IO(error));
    }
    Ok(())
}

/// An XML writer.
#[derive(Clone, Debug)]
pub struct XmlWriter<W: Write> {
    writer: W,
    options: Options,
    state: State,
    open_elements: Vec<OpenElement>,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a writer which writes the document to `writer`.
    pub fn new(writer: W, options: Options) -> Self {
        XmlWriter {
            writer,
            options,
            state: State::Empty,
            open_elements: Vec::new(),
        }
    }

    /// Returns whether the writer adds its own line breaks and indentation
    pub fn is_indented(&self) -> bool {
        self.options.indent != Indent::None
    }

    /// Writes an XML declaration, such as `<?xml version="1.0" encoding="UTF-8"?>`
    ///
    /// # Errors
    ///
    /// When anything was written beforehand, or io fails
    pub fn write_declaration(&mut self, value: &str) -> Result {
        if self.state != State::Empty {
            return Err(XmlWriterError::DeclarationAlreadyWritten);
        }
        write!(self.writer, "<?xml {value}?>").map_err(XmlWriterError::IO)?;
        self.state = State::Document;
        Ok(())
    }

    /// Writes a processing instruction, such as `<?xml-stylesheet href="style.css"?>`
    ///
    /// # Errors
    ///
    /// When io fails
    pub fn write_processing_instruction(&mut self, target: &str, value: Option<&str>) -> Result {
        self.begin_node()?;
        let written = match value {
            Some(value) => write!(self.writer, "<?{target} {value}?>"),
            None => write!(self.writer, "<?{target}?>"),
        };
        written.map_err(XmlWriterError::IO)
    }

    /// Writes a comment. A `--` within the text isn't escaped.
    ///
    /// # Errors
    ///
    /// When io fails
    pub fn write_comment(&mut self, text: &str) -> Result {
        self.begin_node()?;
        self.writer.write_all(b"<!--").map_err(XmlWriterError::IO)?;
        write_escaped(&mut self.writer, Escape::Comment, text)?;
        self.writer.write_all(b"-->").map_err(XmlWriterError::IO)
    }

    /// Writes the `<name` of a start tag. The tag stays open for attributes until the next node
    /// is written.
    ///
    /// # Errors
    ///
    /// When io fails
    pub fn start_element<N: Display + ?Sized>(&mut self, name: &N) -> Result {
        self.begin_node()?;
        let name = name.to_string();
        write!(self.writer, "<{name}").map_err(XmlWriterError::IO)?;
        self.open_elements.push(OpenElement {
            name,
            has_children: false,
        });
        self.state = State::Attributes;
        Ok(())
    }

    /// Writes an attribute to the open start tag, escaping `&<>` and the quote character in the
    /// value.
    ///
    /// # Errors
    ///
    /// When no start tag is open, or io fails
    pub fn write_attribute<N: Display + ?Sized, V: Display + ?Sized>(
        &mut self,
        name: &N,
        value: &V,
    ) -> Result {
        if self.state != State::Attributes {
            return Err(XmlWriterError::AttributeWrittenBeforeElement);
        }
        let quote = if self.options.use_single_quote {
            '\''
        } else {
            '"'
        };
        write!(self.writer, " {name}={quote}").map_err(XmlWriterError::IO)?;
        write_escaped(&mut self.writer, Escape::AttributeValue(quote), value)?;
        write!(self.writer, "{quote}").map_err(XmlWriterError::IO)
    }

    /// Writes text within the current element, escaping `&<>`.
    ///
    /// # Errors
    ///
    /// When no element is open, or io fails
    pub fn write_text<T: Display + ?Sized>(&mut self, text: &T) -> Result {
        if self.open_elements.is_empty() {
            return Err(XmlWriterError::TextBeforeElement);
        }
        self.begin_node()?;
        write_escaped(&mut self.writer, Escape::Text, text)
    }

    /// Closes the most recently opened element.
    ///
    /// # Errors
    ///
    /// When no element is open, or io fails
    pub fn end_element(&mut self) -> Result {
        let Some(element) = self.open_elements.pop() else {
            return Err(XmlWriterError::ClosedUnopenedElement);
        };

        let written = if element.has_children {
            self.write_line_break()?;
            self.write_indent()?;
            write!(self.writer, "</{}>", element.name)
        } else if self.options.enable_self_closing {
            self.writer.write_all(b"/>")
        } else {
            write!(self.writer, "></{}>", element.name)
        };
        written.map_err(XmlWriterError::IO)?;

        self.state = State::Document;
        Ok(())
    }

    /// Closes all open elements and returns the writer.
    ///
    /// # Errors
    ///
    /// When io fails
    pub fn end_document(mut self) -> std::result::Result<W, XmlWriterError> {
        while !self.open_elements.is_empty() {
            self.end_element()?;
        }
        self.write_line_break()?;
        Ok(self.writer)
    }

    /// Closes an open start tag and moves to where the next node starts. Nodes outside the root
    /// element are always put on their own line.
    fn begin_node(&mut self) -> Result {
        if self.state == State::Attributes {
            self.writer.write_all(b">").map_err(XmlWriterError::IO)?;
            if let Some(parent) = self.open_elements.last_mut() {
                parent.has_children = true;
            }
        }

        let was_empty = self.state == State::Empty;
        self.state = State::Document;
        if was_empty {
            return Ok(());
        }
        if self.open_elements.is_empty() {
            self.writer.write_all(b"\n").map_err(XmlWriterError::IO)?;
        } else {
            self.write_line_break()?;
        }
        self.write_indent()
    }

    fn write_line_break(&mut self) -> Result {
        if self.is_indented() {
            self.writer.write_all(b"\n").map_err(XmlWriterError::IO)?;
        }
        Ok(())
    }

    fn write_indent(&mut self) -> Result {
        let unit = match self.options.indent {
            Indent::None => return Ok(()),
            Indent::Tabs => String::from("\t"),
            Indent::Spaces(n) => " ".repeat(usize::from(n)),
        };
        let indent = unit.repeat(self.open_elements.len());
        self.writer
            .write_all(indent.as_bytes())
            .map_err(XmlWriterError::IO)
    }
}

impl Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Tabs => f.write_str("tabs"),
            Self::Spaces(n) => n.fmt(f),
        }
    }
}

impl FromStr for Indent {
    type Err = ParseIndentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "tabs" => Ok(Self::Tabs),
            n => n
                .parse()
                .map(Self::Spaces)
                .map_err(|_| ParseIndentError(n.to_string())),
        }
    }
}

impl TryFrom<String> for Indent {
    type Error = ParseIndentError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Indent> for String {
    fn from(value: Indent) -> Self {
        value.to_string()
    }
}

impl Display for ParseIndentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected `none`, `tabs`, or a number of spaces, found `{}`",
            self.0
        )
    }
}
impl std::error::Error for ParseIndentError {}

#[test]
fn indent_from_str() {
    assert_eq!("none".parse(), Ok(Indent::None));
    assert_eq!("tabs".parse(), Ok(Indent::Tabs));
    assert_eq!("2".parse(), Ok(Indent::Spaces(2)));
    assert!("two".parse::<Indent>().is_err());
    assert!("-1".parse::<Indent>().is_err());
    assert_eq!(Indent::Spaces(4).to_string(), "4");
}

#[test]
fn writes_top_level_nodes_on_separate_lines() -> Result {
    let mut w = XmlWriter::new(Vec::<u8>::new(), Options::default());
    w.write_declaration(r#"version="1.0" encoding="UTF-8""#)?;
    w.write_comment(" Created with Inkscape ")?;
    w.start_element("svg")?;
    w.write_text("\n  ")?;
    w.start_element("g")?;
    w.end_element()?;
    w.write_text("\n")?;
    w.end_element()?;
    let result = String::from_utf8(w.end_document()?).map_err(XmlWriterError::UTF8)?;

    pretty_assertions::assert_eq!(
        result,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- Created with Inkscape -->\n<svg>\n  <g/>\n</svg>"
    );
    Ok(())
}

#[test]
fn escapes_attributes_and_text() -> Result {
    let mut w = XmlWriter::new(Vec::<u8>::new(), Options::default());
    w.start_element("text")?;
    w.write_attribute("label", "\"a\" & <b>")?;
    w.write_text("1 < 2 & 'x'")?;
    let result = String::from_utf8(w.end_document()?).map_err(XmlWriterError::UTF8)?;
    assert_eq!(
        result,
        "<text label=\"&quot;a&quot; &amp; &lt;b&gt;\">1 &lt; 2 &amp; 'x'</text>"
    );

    let mut w = XmlWriter::new(
        Vec::<u8>::new(),
        Options {
            use_single_quote: true,
            enable_self_closing: false,
            ..Options::default()
        },
    );
    w.start_element("g")?;
    w.write_attribute("label", "it's \"quoted\"")?;
    let result = String::from_utf8(w.end_document()?).map_err(XmlWriterError::UTF8)?;
    assert_eq!(result, "<g label='it&apos;s \"quoted\"'></g>");

    let mut w = XmlWriter::new(Vec::<u8>::new(), Options::default());
    w.start_element("text")?;
    w.write_attribute("label", "a\nb\r\nc\td")?;
    w.write_text("a\nb\td")?;
    let result = String::from_utf8(w.end_document()?).map_err(XmlWriterError::UTF8)?;
    assert_eq!(
        result,
        "<text label=\"a&#10;b&#13;&#10;c&#9;d\">a\nb\td</text>"
    );
    Ok(())
}

#[test]
fn indents_with_tabs() -> Result {
    let mut w = XmlWriter::new(
        Vec::<u8>::new(),
        Options {
            indent: Indent::Tabs,
            ..Options::default()
        },
    );
    w.start_element("svg")?;
    w.start_element("g")?;
    w.write_comment("layer")?;
    let result = String::from_utf8(w.end_document()?).map_err(XmlWriterError::UTF8)?;
    assert_eq!(result, "<svg>\n\t<g>\n\t\t<!--layer-->\n\t</g>\n</svg>\n");
    Ok(())
}

#[test]
fn rejects_misplaced_nodes() -> Result {
    let mut w = XmlWriter::new(Vec::<u8>::new(), Options::default());
    assert!(matches!(
        w.write_text("text"),
        Err(XmlWriterError::TextBeforeElement)
    ));
    assert!(matches!(
        w.write_attribute("width", "96"),
        Err(XmlWriterError::AttributeWrittenBeforeElement)
    ));
    assert!(matches!(
        w.end_element(),
        Err(XmlWriterError::ClosedUnopenedElement)
    ));
    w.start_element("svg")?;
    assert!(matches!(
        w.write_declaration("version=\"1.0\""),
        Err(XmlWriterError::DeclarationAlreadyWritten)
    ));
    Ok(())
}
