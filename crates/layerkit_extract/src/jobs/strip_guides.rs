use layerkit_ast::element::Element;

use crate::{context::Context, error::ExtractError, namespace::Role};

use super::Job;

#[derive(Debug, Clone, Copy, Default)]
/// Removes every `sodipodi:guide` from the `sodipodi:namedview` children of the root element.
///
/// The namedview itself and its other children are kept. Runs to the number of guides removed.
pub struct StripGuides;

impl Job for StripGuides {
    type Output = usize;

    fn run(&self, context: &Context<'_>) -> Result<Self::Output, ExtractError> {
        let mut removed = 0;
        for namedview in context.root.children() {
            if context.is(&namedview, Role::EditorMetadata, "namedview") {
                removed += strip(namedview, context);
            }
        }
        Ok(removed)
    }
}

fn strip<'arena>(parent: Element<'arena>, context: &Context<'arena>) -> usize {
    let mut removed = 0;
    for child in parent.children() {
        if context.is(&child, Role::EditorMetadata, "guide") {
            log::debug!(
                "removing guide {}",
                child.get_attribute_local("id").as_deref().unwrap_or("")
            );
            child.remove_with_preceding_whitespace();
            removed += 1;
        } else {
            removed += strip(child, context);
        }
    }
    removed
}

#[test]
fn strip_guides() -> anyhow::Result<()> {
    use super::test_job;

    let (xml, removed) = test_job(
        &StripGuides,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <sodipodi:namedview id="base" inkscape:zoom="2">
    <sodipodi:guide id="guide1" position="0,48"/>
    <inkscape:grid id="grid1"/>
    <sodipodi:guide id="guide2" position="48,0"/>
  </sodipodi:namedview>
  <g id="content"/>
</svg>"#,
    )?;
    assert_eq!(removed, 2);
    insta::assert_snapshot!(xml, @r#"
    <svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
      <sodipodi:namedview id="base" inkscape:zoom="2">
        <inkscape:grid id="grid1"/>
      </sodipodi:namedview>
      <g id="content"/>
    </svg>
    "#);
    Ok(())
}

#[test]
fn strip_guides_without_namedview() -> anyhow::Result<()> {
    use super::test_job;

    let source = r#"<svg xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"><g/></svg>"#;
    let (xml, removed) = test_job(&StripGuides, source)?;
    assert_eq!(removed, 0);
    assert_eq!(xml, source);
    Ok(())
}

#[test]
fn strip_guides_from_namedview_without_guides() -> anyhow::Result<()> {
    use super::test_job;

    let source = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <sodipodi:namedview id="base" pagecolor="#ffffff" inkscape:zoom="2">
    <inkscape:grid id="grid1" type="xygrid"/>
    <inkscape:page x="0" y="0" width="96" height="96"/>
  </sodipodi:namedview>
  <g id="content"/>
</svg>"##;
    let (xml, removed) = test_job(&StripGuides, source)?;
    assert_eq!(removed, 0);
    pretty_assertions::assert_eq!(xml, source);
    Ok(())
}

#[test]
fn strip_nested_guides_once() -> anyhow::Result<()> {
    use super::test_job;

    let (xml, removed) = test_job(
        &StripGuides,
        r#"<svg xmlns:s="urn:aliased-sodipodi" xmlns:sodipodi="urn:aliased-sodipodi" xmlns:inkscape="urn:inkscape"><s:namedview><s:guide><s:guide/></s:guide></s:namedview></svg>"#,
    )?;
    assert_eq!(removed, 1);
    let document = roxmltree::Document::parse(&xml)?;
    let namedview = document
        .root_element()
        .first_element_child()
        .ok_or_else(|| anyhow::anyhow!("namedview was removed"))?;
    assert_eq!(namedview.tag_name().name(), "namedview");
    assert_eq!(namedview.children().count(), 0);
    Ok(())
}
