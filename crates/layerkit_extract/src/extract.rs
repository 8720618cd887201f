use std::{io::Write, num::NonZeroU32};

use layerkit_ast::{
    node::Ref,
    parse::{parse_bytes_with_options, ParsingOptions},
    serialize::{Node as _, Options},
};

use crate::{
    context::Context,
    error::ExtractError,
    jobs::{Canvas, FilterLayers, Job as _, ResizeCanvas, StripGuides, DEFAULT_SIZE},
};

#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "camelCase")
)]
/// Extracts a single layer from an Inkscape document.
///
/// Guides are removed from the namedview, every other labelled layer is removed, and the canvas
/// is resized to a `size` square.
pub struct Extract {
    /// The label of the layer to keep
    pub layer: String,
    /// The width and height of the resulting canvas
    #[cfg_attr(feature = "serde", serde(default = "default_size"))]
    pub size: NonZeroU32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What was changed by an extraction
pub struct Report {
    /// The canvas of the document before it was resized
    pub canvas: Canvas,
    /// The number of guides removed from the namedview
    pub guides_removed: usize,
    /// The labels of the layers removed, in document order
    pub layers_removed: Vec<String>,
    /// The number of layers kept because they have no label
    pub unlabeled_layers: usize,
    /// Whether a layer with the requested label was in the document
    pub found: bool,
}

#[cfg(feature = "serde")]
fn default_size() -> NonZeroU32 {
    DEFAULT_SIZE
}

impl Extract {
    /// Creates an extraction of `layer` onto a canvas of the default size
    pub fn new(layer: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            size: DEFAULT_SIZE,
        }
    }

    /// Runs the extraction over a parsed document, which may be either a document node or its
    /// root element.
    ///
    /// # Errors
    ///
    /// If the editor namespaces aren't declared or the canvas isn't measured in whole numbers
    pub fn run(&self, dom: Ref<'_>) -> Result<Report, ExtractError> {
        let context = Context::new(dom)?;

        let guides_removed = StripGuides.run(&context)?;
        let filtered = FilterLayers {
            layer: self.layer.clone(),
        }
        .run(&context)?;
        let canvas = ResizeCanvas { size: self.size }.run(&context)?;

        Ok(Report {
            canvas,
            guides_removed,
            layers_removed: filtered.removed,
            unlabeled_layers: filtered.unlabeled,
            found: filtered.found,
        })
    }

    /// Parses the document, runs the extraction, and serializes the result.
    ///
    /// # Errors
    ///
    /// If the source isn't a well-formed UTF-8 document, or any of the steps of [`Extract::run`]
    /// fail
    pub fn transform(
        &self,
        source: &[u8],
        options: Options,
    ) -> Result<(Vec<u8>, Report), ExtractError> {
        let parsing_options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let (mut output, report) = parse_bytes_with_options(source, parsing_options, |dom, _| {
            let report = self.run(dom)?;
            let output = dom.serialize_into(Vec::new(), options)?;
            Ok::<_, ExtractError>((output, report))
        })??;
        // whitespace after the root element isn't part of the tree
        if source.ends_with(b"\n") && !output.ends_with(b"\n") {
            output.push(b'\n');
        }
        Ok((output, report))
    }

    /// Transforms the document and writes the result to `sink`.
    ///
    /// Nothing is written unless the whole document was transformed.
    ///
    /// # Errors
    ///
    /// If the document can't be transformed or written
    pub fn extract_into<W: Write>(
        &self,
        source: &[u8],
        mut sink: W,
        options: Options,
    ) -> Result<Report, ExtractError> {
        let (output, report) = self.transform(source, options)?;
        sink.write_all(&output).map_err(ExtractError::Write)?;
        sink.flush().map_err(ExtractError::Write)?;
        Ok(report)
    }
}

#[cfg(test)]
const ICON_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Created with Inkscape (http://www.inkscape.org/) -->
<svg
   width="512"
   height="512"
   viewBox="0 0 512 512"
   version="1.1"
   id="svg1"
   xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
   xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
   xmlns="http://www.w3.org/2000/svg"
   xmlns:svg="http://www.w3.org/2000/svg">
  <sodipodi:namedview
     id="namedview1"
     inkscape:document-units="px">
    <sodipodi:guide
       position="0,512"
       orientation="1,0"
       id="guide1" />
  </sodipodi:namedview>
  <defs
     id="defs1" />
  <g
     inkscape:label="background"
     inkscape:groupmode="layer"
     id="layer1">
    <rect
       style="fill:#ffffff"
       id="rect1"
       width="512"
       height="512"
       x="0"
       y="0" />
  </g>
  <g
     inkscape:groupmode="layer"
     id="layer2"
     inkscape:label="icon">
    <path
       style="fill:#000000"
       d="M 0,0 H 96 V 96 Z"
       id="path1" />
  </g>
</svg>
"#;

#[test]
fn extract_icon() -> anyhow::Result<()> {
    let extract = Extract::new("icon");
    let (output, report) = extract.transform(ICON_DOCUMENT.as_bytes(), Options::default())?;

    assert_eq!(
        report,
        Report {
            canvas: Canvas {
                width: 512,
                height: 512
            },
            guides_removed: 1,
            layers_removed: vec!["background".into()],
            unlabeled_layers: 0,
            found: true,
        }
    );

    let output = String::from_utf8(output)?;
    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!--"));
    assert!(output.ends_with("</svg>\n"));

    let document = roxmltree::Document::parse(&output)?;
    let svg = document.root_element();
    assert_eq!(svg.attribute("width"), Some("96"));
    assert_eq!(svg.attribute("height"), Some("96"));
    assert_eq!(svg.attribute("viewBox"), Some("0 0 96 96"));
    assert_eq!(svg.attribute("id"), Some("svg1"));

    let ids: Vec<_> = svg
        .children()
        .filter_map(|child| child.attribute("id"))
        .collect();
    assert_eq!(ids, vec!["namedview1", "defs1", "layer2"]);

    let sodipodi = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";
    assert!(!svg
        .descendants()
        .any(|node| node.tag_name().namespace() == Some(sodipodi)
            && node.tag_name().name() == "guide"));
    assert!(svg.descendants().any(|node| node.attribute("id") == Some("path1")));
    Ok(())
}

#[test]
fn extract_preserves_kept_content() -> anyhow::Result<()> {
    let source = br#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="96" height="96"><g inkscape:groupmode="layer" inkscape:label="icon"><foo xmlns=""/><text data-lines="a&#10;b&#13;c&#9;d"/></g></svg>"#;
    let (output, report) = Extract::new("icon").transform(source, Options::default())?;
    assert!(report.found);

    let output = String::from_utf8(output)?;
    assert!(output.ends_with("</svg>"));
    let document = roxmltree::Document::parse(&output)?;
    let find = |local: &str| {
        document
            .descendants()
            .find(|node| node.tag_name().name() == local)
            .ok_or_else(|| anyhow::anyhow!("missing <{local}>"))
    };

    let foo = find("foo")?;
    assert!(matches!(foo.tag_name().namespace(), None | Some("")));
    let text = find("text")?;
    assert_eq!(
        text.tag_name().namespace(),
        Some("http://www.w3.org/2000/svg")
    );
    assert_eq!(text.attribute("data-lines"), Some("a\nb\rc\td"));
    Ok(())
}

#[test]
fn extract_into_writes_nothing_on_error() {
    let source = br#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="48px" height="48"><g inkscape:groupmode="layer" inkscape:label="icon"/></svg>"#;
    let mut sink = Vec::new();

    let result = Extract::new("icon").extract_into(source, &mut sink, Options::default());
    assert!(matches!(
        result,
        Err(ExtractError::InvalidDimension {
            attribute: "width",
            ..
        })
    ));
    assert!(sink.is_empty());
}

#[test]
fn extract_into_writer() -> anyhow::Result<()> {
    let source = br#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="32" height="32"><g inkscape:groupmode="layer" inkscape:label="a"/><g inkscape:groupmode="layer" inkscape:label="b"/></svg>"#;
    let mut sink = Vec::new();

    let extract = Extract {
        layer: "b".into(),
        size: NonZeroU32::new(16).ok_or_else(|| anyhow::anyhow!("zero size"))?,
    };
    let report = extract.extract_into(
        source,
        &mut sink,
        Options {
            xml_declaration: false,
            ..Options::default()
        },
    )?;
    assert!(report.found);
    insta::assert_snapshot!(String::from_utf8(sink)?, @r#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="16" height="16" viewBox="0 0 16 16"><g inkscape:groupmode="layer" inkscape:label="b"/></svg>"#);
    Ok(())
}

#[test]
fn extract_rejects_malformed_documents() {
    let extract = Extract::new("icon");
    assert!(matches!(
        extract.transform(b"<svg", Options::default()),
        Err(ExtractError::Parse(_))
    ));
    assert!(matches!(
        extract.transform(
            br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#,
            Options::default()
        ),
        Err(ExtractError::MissingNamespace(_))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn extract_from_json() -> anyhow::Result<()> {
    let extract: Extract = serde_json::from_str(r#"{ "layer": "icon" }"#)?;
    assert_eq!(extract.size, DEFAULT_SIZE);
    assert_eq!(extract.layer, "icon");

    let extract: Extract = serde_json::from_str(r#"{ "layer": "icon", "size": 48 }"#)?;
    assert_eq!(extract.size.get(), 48);

    assert!(serde_json::from_str::<Extract>(r#"{ "layer": "icon", "size": 0 }"#).is_err());
    Ok(())
}
