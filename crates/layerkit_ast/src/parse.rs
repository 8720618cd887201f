//! Parsing methods using roxmltree
//!
//! # Quirks
//!
//! Roxmltree has some notable quirks
//!
//! - The XML declaration and DTD are skipped
//! - CDATA sections are merged into text
//! - Prefixes aren't retained, so they are recovered from the namespaces in scope, preferring
//!   the default namespace for elements
use std::{cell::RefCell, fmt::Display};

pub use roxmltree::ParsingOptions;

use crate::{
    arena::Allocator,
    name::{Namespace, QualName, XML_NAMESPACE},
    node::{Attribute, NodeData, Ref},
};

/// The deepest an element may be nested before parsing is abandoned
pub const MAX_DEPTH: u32 = 1024;

#[derive(Debug)]
/// The errors which may occur while parsing a document with roxmltree.
pub enum ParseError {
    /// The source couldn't be read as UTF-8
    UTF8(std::str::Utf8Error),
    /// The document parsed had a depth greater than [`MAX_DEPTH`] elements
    NodesLimitReached,
    /// The document couldn't be parsed by roxmltree
    ROXML(roxmltree::Error),
}

/// Parses `source` and passes the resulting document to `f`, which is where the tree can be
/// edited and serialized. The arena holding the tree is dropped once `f` returns.
///
/// # Errors
///
/// If roxmltree fails to parse the source, or the tree is too deep
pub fn parse_with_options<F, R>(source: &str, options: ParsingOptions, f: F) -> Result<R, ParseError>
where
    F: for<'arena> FnOnce(Ref<'arena>, &Allocator<'arena>) -> R,
{
    let xml = roxmltree::Document::parse_with_options(source, options).map_err(ParseError::ROXML)?;
    let arena = Allocator::new_arena_with_capacity(xml.descendants().count());
    let allocator = Allocator::new(&arena);
    let dom = parse(&xml, &allocator)?;
    Ok(f(dom, &allocator))
}

/// Parses the bytes of a UTF-8 encoded document, see [`parse_with_options`].
///
/// # Errors
///
/// If the bytes aren't UTF-8, roxmltree fails to parse the source, or the tree is too deep
pub fn parse_bytes_with_options<F, R>(
    source: &[u8],
    options: ParsingOptions,
    f: F,
) -> Result<R, ParseError>
where
    F: for<'arena> FnOnce(Ref<'arena>, &Allocator<'arena>) -> R,
{
    let source = std::str::from_utf8(source).map_err(ParseError::UTF8)?;
    parse_with_options(source, options, f)
}

/// parse an xml document already in roxmltree representation
///
/// # Errors
///
/// If the depth of the tree is too deep
pub fn parse<'arena>(
    xml: &roxmltree::Document<'_>,
    allocator: &Allocator<'arena>,
) -> Result<Ref<'arena>, ParseError> {
    let document = allocator.alloc(NodeData::Document);
    parse_xml_node_children(document, allocator, xml.root(), 0)?;
    Ok(document)
}

fn parse_xml_node_children<'arena>(
    node: Ref<'arena>,
    allocator: &Allocator<'arena>,
    parent: roxmltree::Node<'_, '_>,
    depth: u32,
) -> Result<(), ParseError> {
    for xml_child in parent.children() {
        if let Some(child) = parse_xml_node(allocator, xml_child, depth)? {
            node.append_child(child);
        }
    }
    Ok(())
}

fn parse_xml_node<'arena>(
    allocator: &Allocator<'arena>,
    node: roxmltree::Node<'_, '_>,
    depth: u32,
) -> Result<Option<Ref<'arena>>, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::NodesLimitReached);
    }

    let child = match node.node_type() {
        roxmltree::NodeType::Root => return Ok(None),
        roxmltree::NodeType::PI => {
            let Some(pi) = node.pi() else {
                return Ok(None);
            };
            allocator.alloc(NodeData::PI {
                target: pi.target.into(),
                value: pi.value.map(Into::into),
            })
        }
        roxmltree::NodeType::Element => parse_element(allocator, node),
        roxmltree::NodeType::Comment => {
            allocator.alloc(NodeData::Comment(node.text().unwrap_or_default().into()))
        }
        roxmltree::NodeType::Text => allocator.alloc(NodeData::Text(RefCell::new(
            node.text().unwrap_or_default().into(),
        ))),
    };
    parse_xml_node_children(child, allocator, node, depth + 1)?;
    Ok(Some(child))
}

fn parse_element<'arena>(
    allocator: &Allocator<'arena>,
    xml_node: roxmltree::Node<'_, '_>,
) -> Ref<'arena> {
    let tag_name = xml_node.tag_name();
    let name = QualName::new(
        element_prefix(xml_node, tag_name.namespace()),
        tag_name.name().into(),
        tag_name.namespace().map(Into::into),
    );
    let attrs = xml_node
        .attributes()
        .map(|attr| Attribute {
            name: QualName::new(
                attribute_prefix(xml_node, attr.namespace()),
                attr.name().into(),
                attr.namespace().map(Into::into),
            ),
            value: attr.value().into(),
        })
        .collect();

    allocator.alloc(NodeData::Element {
        name,
        namespaces: declared_namespaces(xml_node),
        attrs: RefCell::new(attrs),
    })
}

/// Finds the prefix to write an element's tag with. Elements may use the default namespace.
fn element_prefix(xml_node: roxmltree::Node<'_, '_>, uri: Option<&str>) -> Option<String> {
    let uri = uri?;
    if xml_node
        .namespaces()
        .any(|ns| ns.name().is_none() && ns.uri() == uri)
    {
        return None;
    }
    attribute_prefix(xml_node, Some(uri))
}

/// Finds the prefix to write an attribute with. Attributes never use the default namespace.
fn attribute_prefix(xml_node: roxmltree::Node<'_, '_>, uri: Option<&str>) -> Option<String> {
    let uri = uri?;
    if uri == XML_NAMESPACE {
        return Some("xml".into());
    }
    let prefix = xml_node
        .namespaces()
        .filter(|ns| ns.uri() == uri)
        .find_map(roxmltree::Namespace::name);
    if prefix.is_none() {
        log::debug!("no prefix in scope for {uri}");
    }
    prefix.map(Into::into)
}

/// Returns the namespaces which are in scope for the element but not its parent.
///
/// An empty default namespace is kept, since `xmlns=""` takes the element out of the namespace
/// its parent declared.
fn declared_namespaces(xml_node: roxmltree::Node<'_, '_>) -> Vec<Namespace> {
    let parent = xml_node.parent_element();
    xml_node
        .namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| ns.name().is_none() || !ns.uri().is_empty())
        .filter(|ns| {
            !parent.is_some_and(|parent| {
                parent
                    .namespaces()
                    .any(|p| p.name() == ns.name() && p.uri() == ns.uri())
            })
        })
        .map(|ns| Namespace {
            prefix: ns.name().map(Into::into),
            uri: ns.uri().into(),
        })
        .collect()
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UTF8(err) => err.fmt(f),
            Self::NodesLimitReached => f.write_str("The depth of the document parsed was too deep"),
            Self::ROXML(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UTF8(err) => Some(err),
            Self::ROXML(err) => Some(err),
            Self::NodesLimitReached => None,
        }
    }
}

#[cfg(test)]
const INKSCAPE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Created with Inkscape -->
<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" xmlns="http://www.w3.org/2000/svg" xmlns:svg="http://www.w3.org/2000/svg" width="512" height="512">
  <sodipodi:namedview id="base" inkscape:zoom="1"/>
  <g inkscape:groupmode="layer" inkscape:label="icon" xml:space="preserve"/>
</svg>"#;

#[test]
fn parse_roxmltree() {
    use crate::node::Type;

    let result = parse_with_options(INKSCAPE_DOCUMENT, ParsingOptions::default(), |dom, _| {
        let children: Vec<_> = dom.child_nodes_iter().map(|n| n.node_type()).collect();
        assert_eq!(children, vec![Type::Comment, Type::Element]);

        let svg = dom.find_element().unwrap();
        assert!(svg.is(Some("http://www.w3.org/2000/svg"), "svg"));
        assert!(svg.qual_name().prefix.is_none());
        assert_eq!(
            svg.lookup_namespace_uri(Some("sodipodi")),
            Some("http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd")
        );
        assert_eq!(
            svg.lookup_namespace_uri(None),
            Some("http://www.w3.org/2000/svg")
        );
        assert_eq!(svg.get_attribute_local("width").as_deref(), Some("512"));

        let children = svg.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].qual_name().to_string(), "sodipodi:namedview");
        assert!(children[0].namespaces().is_empty());

        let layer = children[1];
        assert_eq!(layer.qual_name().to_string(), "g");
        let names: Vec<_> = layer
            .attributes()
            .iter()
            .map(|a| a.name.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["inkscape:groupmode", "inkscape:label", "xml:space"]
        );
        assert_eq!(
            layer
                .get_attribute_ns(Some("http://www.inkscape.org/namespaces/inkscape"), "label")
                .as_deref(),
            Some("icon")
        );
    });
    assert!(result.is_ok());
}

#[test]
fn parse_nested_declarations() {
    let source = r#"<svg xmlns="http://www.w3.org/2000/svg"><g xmlns:x="urn:x" x:a="1"><x:b/></g></svg>"#;
    parse_with_options(source, ParsingOptions::default(), |dom, _| {
        let svg = dom.find_element().unwrap();
        let g = svg.children()[0];
        assert_eq!(
            g.namespaces(),
            &[Namespace {
                prefix: Some("x".into()),
                uri: "urn:x".into()
            }]
        );
        let b = g.children()[0];
        assert!(b.namespaces().is_empty());
        assert_eq!(b.qual_name().to_string(), "x:b");
    })
    .unwrap();
}

#[test]
fn parse_errors() {
    let result = parse_with_options("<svg>", ParsingOptions::default(), |_, _| ());
    assert!(matches!(result, Err(ParseError::ROXML(_))));

    let result = parse_bytes_with_options(&[0x3c, 0xff, 0xfe], ParsingOptions::default(), |_, _| ());
    assert!(matches!(result, Err(ParseError::UTF8(_))));
}
