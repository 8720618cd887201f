//! Functions for serializing XML trees
use std::io::Write;

use crate::{
    error::XmlWriterError,
    node::{self, NodeData},
    xmlwriter::XmlWriter,
};

pub use crate::xmlwriter::{Indent, Options};

/// The declaration written at the start of a document
pub const XML_DECLARATION: &str = r#"version="1.0" encoding="UTF-8""#;

/// An XML node serializer
pub trait Node {
    /// Serializes the node with the default options
    ///
    /// # Errors
    /// If the underlying serialization fails
    fn serialize(&self) -> Result<String, XmlWriterError> {
        self.serialize_with_options(Options::default())
    }

    /// Serializes the node into a string
    ///
    /// # Errors
    /// If the underlying serialization fails
    fn serialize_with_options(&self, options: Options) -> Result<String, XmlWriterError> {
        let bytes = self.serialize_into(Vec::new(), options)?;
        String::from_utf8(bytes).map_err(XmlWriterError::UTF8)
    }

    /// Serializes the node into the given writer, returning the writer once the document is
    /// complete.
    ///
    /// # Errors
    /// If the underlying serialization fails
    fn serialize_into<W: Write>(&self, sink: W, options: Options) -> Result<W, XmlWriterError>;
}

impl Node for node::Node<'_> {
    fn serialize_into<W: Write>(&self, sink: W, options: Options) -> Result<W, XmlWriterError> {
        let mut xml = XmlWriter::new(sink, options);

        if options.xml_declaration && self.node_type() == node::Type::Document {
            xml.write_declaration(XML_DECLARATION)?;
        }
        serialize_node(self, &mut xml)?;

        xml.end_document()
    }
}

fn serialize_node<W: Write>(
    node: &node::Node<'_>,
    xml: &mut XmlWriter<W>,
) -> Result<(), XmlWriterError> {
    match &node.node_data {
        NodeData::Document => {}
        NodeData::Element {
            name,
            namespaces,
            attrs,
        } => {
            xml.start_element(name)?;
            for ns in namespaces {
                xml.write_attribute(&ns.attribute_name(), &ns.uri)?;
            }
            for attr in attrs.borrow().iter() {
                xml.write_attribute(&attr.name, &attr.value)?;
            }
        }
        NodeData::Text(text) => {
            if xml.is_indented() && node.is_whitespace() {
                return Ok(());
            }
            xml.write_text(text.borrow().as_str())?;
        }
        NodeData::Comment(text) => xml.write_comment(text)?,
        NodeData::PI { target, value } => {
            xml.write_processing_instruction(target, value.as_deref())?;
        }
    }

    for child in node.child_nodes_iter() {
        serialize_node(child, xml)?;
    }

    if node.node_type() == node::Type::Element {
        xml.end_element()?;
    }
    Ok(())
}

#[cfg(all(test, feature = "parse"))]
mod tests {
    use super::{Indent, Node as _, Options};
    use crate::parse::{parse_with_options, ParsingOptions};

    const SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Created with Inkscape -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="16">
  <g inkscape:label="a &amp; b"><text>1 &lt; 2</text></g>
</svg>"#;

    #[test]
    fn serialize_keeps_whitespace() {
        let result = parse_with_options(SOURCE, ParsingOptions::default(), |dom, _| {
            dom.serialize()
        })
        .unwrap()
        .unwrap();
        insta::assert_snapshot!(result, @r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <!-- Created with Inkscape -->
        <svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="16">
          <g inkscape:label="a &amp; b"><text>1 &lt; 2</text></g>
        </svg>
        "#);
    }

    #[test]
    fn serialize_indented() {
        let options = Options {
            indent: Indent::Spaces(2),
            xml_declaration: false,
            ..Options::default()
        };
        let result = parse_with_options(SOURCE, ParsingOptions::default(), |dom, _| {
            let svg = dom.find_element().unwrap();
            svg.serialize_with_options(options)
        })
        .unwrap()
        .unwrap();
        pretty_assertions::assert_eq!(
            result,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="16">
  <g inkscape:label="a &amp; b">
    <text>
      1 &lt; 2
    </text>
  </g>
</svg>
"#
        );
    }

    #[test]
    fn serialize_default_namespace_undeclaration() {
        let source = r#"<svg xmlns="http://www.w3.org/2000/svg"><g><foo xmlns=""><bar/></foo></g></svg>"#;
        let options = Options {
            xml_declaration: false,
            ..Options::default()
        };
        let result = parse_with_options(source, ParsingOptions::default(), |dom, _| {
            dom.serialize_with_options(options)
        })
        .unwrap()
        .unwrap();
        assert_eq!(result, source);

        let document = roxmltree::Document::parse(&result).unwrap();
        for local in ["foo", "bar"] {
            let element = document
                .descendants()
                .find(|n| n.tag_name().name() == local)
                .unwrap();
            assert!(matches!(element.tag_name().namespace(), None | Some("")));
        }
    }

    #[test]
    fn serialize_into_writer() {
        let sink = parse_with_options("<a><b/></a>", ParsingOptions::default(), |dom, _| {
            dom.serialize_into(Vec::new(), Options::default())
        })
        .unwrap()
        .unwrap();
        assert_eq!(
            sink,
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a><b/></a>".to_vec()
        );
    }
}
