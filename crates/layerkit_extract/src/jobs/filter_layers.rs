use layerkit_ast::element::Element;

use crate::{context::Context, error::ExtractError, namespace::Role};

use super::Job;

#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "camelCase")
)]
/// Removes every top-level Inkscape layer whose label isn't `layer`.
///
/// Groups which aren't layers and layers without a label are left alone.
pub struct FilterLayers {
    /// The label of the layer to keep. Labels are compared exactly.
    pub layer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// What was done to the layers of a document
pub struct Filtered {
    /// The labels of the layers removed, in document order
    pub removed: Vec<String>,
    /// The number of layers kept because they have no label
    pub unlabeled: usize,
    /// Whether a layer with the requested label was in the document
    pub found: bool,
}

#[derive(Debug, Clone, Copy)]
/// A `<g inkscape:groupmode="layer">` element
pub struct Layer<'arena> {
    element: Element<'arena>,
}

impl<'arena> Layer<'arena> {
    /// Returns the element as a layer when it's an svg group in layer mode
    pub fn classify(element: Element<'arena>, context: &Context<'arena>) -> Option<Self> {
        if !context.is(&element, Role::Structural, "g") {
            return None;
        }
        let group_mode = context.attribute(&element, Role::EditorGeometry, "groupmode")?;
        (group_mode == "layer").then_some(Self { element })
    }

    /// Returns the `inkscape:label` of the layer
    pub fn label(&self, context: &Context<'arena>) -> Option<String> {
        context.attribute(&self.element, Role::EditorGeometry, "label")
    }

    /// Returns the element of the layer
    pub fn element(&self) -> Element<'arena> {
        self.element
    }
}

impl Job for FilterLayers {
    type Output = Filtered;

    fn run(&self, context: &Context<'_>) -> Result<Self::Output, ExtractError> {
        log::info!("Clearing layers != {}", self.layer);

        let mut filtered = Filtered::default();
        for element in context.root.children() {
            let Some(layer) = Layer::classify(element, context) else {
                continue;
            };
            match layer.label(context) {
                None => {
                    log::debug!("keeping unlabeled layer");
                    filtered.unlabeled += 1;
                }
                Some(label) if label == self.layer => filtered.found = true,
                Some(label) => {
                    log::debug!("removing layer {label}");
                    layer.element().remove_with_preceding_whitespace();
                    filtered.removed.push(label);
                }
            }
        }
        Ok(filtered)
    }
}

#[cfg(test)]
fn filter(layer: &str, source: &str) -> anyhow::Result<(String, Filtered)> {
    super::test_job(
        &FilterLayers {
            layer: layer.into(),
        },
        source,
    )
}

#[cfg(test)]
const LAYERS: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd">
  <g inkscape:groupmode="layer" inkscape:label="background" id="layer1"/>
  <g inkscape:groupmode="layer" inkscape:label="icon" id="layer2"/>
  <g inkscape:groupmode="layer" inkscape:label="shadow" id="layer3"/>
  <g inkscape:groupmode="layer" id="layer4"/>
  <g inkscape:label="background" id="group1"/>
  <g inkscape:groupmode="other" inkscape:label="background" id="group2"/>
  <rect inkscape:groupmode="layer" inkscape:label="background" id="rect1"/>
</svg>"#;

#[cfg(test)]
fn ids(xml: &str) -> anyhow::Result<Vec<String>> {
    let document = roxmltree::Document::parse(xml)?;
    Ok(document
        .root_element()
        .children()
        .filter_map(|child| child.attribute("id"))
        .map(String::from)
        .collect())
}

#[test]
fn filter_layers() -> anyhow::Result<()> {
    let (xml, filtered) = filter("icon", LAYERS)?;
    assert_eq!(
        filtered,
        Filtered {
            removed: vec!["background".into(), "shadow".into()],
            unlabeled: 1,
            found: true,
        }
    );
    assert_eq!(
        ids(&xml)?,
        vec!["layer2", "layer4", "group1", "group2", "rect1"]
    );
    insta::assert_snapshot!(xml, @r#"
    <svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd">
      <g inkscape:groupmode="layer" inkscape:label="icon" id="layer2"/>
      <g inkscape:groupmode="layer" id="layer4"/>
      <g inkscape:label="background" id="group1"/>
      <g inkscape:groupmode="other" inkscape:label="background" id="group2"/>
      <rect inkscape:groupmode="layer" inkscape:label="background" id="rect1"/>
    </svg>
    "#);
    Ok(())
}

#[test]
fn filter_each_label_keeps_only_that_layer() -> anyhow::Result<()> {
    for (label, id) in [
        ("background", "layer1"),
        ("icon", "layer2"),
        ("shadow", "layer3"),
    ] {
        let (xml, filtered) = filter(label, LAYERS)?;
        assert!(filtered.found);
        assert_eq!(filtered.removed.len(), 2);
        let kept = ids(&xml)?;
        assert_eq!(kept.first().map(String::as_str), Some(id));
        assert_eq!(kept.len(), 5);
    }
    Ok(())
}

#[test]
fn filter_adjacent_layers() -> anyhow::Result<()> {
    let (xml, filtered) = filter(
        "keep",
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"><g inkscape:groupmode="layer" inkscape:label="a"/><g inkscape:groupmode="layer" inkscape:label="b"/><g inkscape:groupmode="layer" inkscape:label="c"/><g inkscape:groupmode="layer" inkscape:label="keep"/><g inkscape:groupmode="layer" inkscape:label="d"/></svg>"#,
    )?;
    assert_eq!(filtered.removed, vec!["a", "b", "c", "d"]);
    let document = roxmltree::Document::parse(&xml)?;
    let labels: Vec<_> = document
        .root_element()
        .children()
        .filter_map(|child| child.attribute(("http://www.inkscape.org/namespaces/inkscape", "label")))
        .collect();
    assert_eq!(labels, vec!["keep"]);
    Ok(())
}

#[test]
fn filter_missing_layer() -> anyhow::Result<()> {
    let (xml, filtered) = filter("missing", LAYERS)?;
    assert!(!filtered.found);
    assert_eq!(filtered.removed, vec!["background", "icon", "shadow"]);
    assert_eq!(ids(&xml)?, vec!["layer4", "group1", "group2", "rect1"]);
    Ok(())
}

#[test]
fn filter_aliased_namespaces() -> anyhow::Result<()> {
    let (xml, filtered) = filter(
        "icon",
        r#"<svg xmlns="urn:svg" xmlns:inkscape="urn:ink" xmlns:sodipodi="urn:sodi" xmlns:i="urn:ink"><g i:groupmode="layer" i:label="icon"/><g i:groupmode="layer" i:label="other"/><g xmlns:x="http://www.inkscape.org/namespaces/inkscape" x:groupmode="layer" x:label="other"/></svg>"#,
    )?;
    assert!(filtered.found);
    assert_eq!(filtered.removed, vec!["other"]);
    let document = roxmltree::Document::parse(&xml)?;
    assert_eq!(document.root_element().children().count(), 2);
    Ok(())
}

#[test]
fn filter_layers_is_case_sensitive() -> anyhow::Result<()> {
    let (_, filtered) = filter("Icon", LAYERS)?;
    assert!(!filtered.found);
    assert_eq!(filtered.removed.len(), 3);
    Ok(())
}
