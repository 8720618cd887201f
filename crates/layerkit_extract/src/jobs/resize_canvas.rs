use std::num::NonZeroU32;

use layerkit_ast::element::Element;

use crate::{context::Context, error::ExtractError};

use super::Job;

/// The size of an icon's canvas when none is given
pub const DEFAULT_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(95);

#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "camelCase")
)]
/// Sets the `width` and `height` of the root element to `size`, with a matching `viewBox`.
///
/// The canvas grows or shrinks from the top-left corner and the artwork isn't moved or scaled,
/// so the layer should already be aligned to the top-left of the new canvas.
pub struct ResizeCanvas {
    /// The width and height of the new canvas
    pub size: NonZeroU32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The dimensions of a canvas
pub struct Canvas {
    /// The `width` of the root element
    pub width: i64,
    /// The `height` of the root element
    pub height: i64,
}

impl Default for ResizeCanvas {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE }
    }
}

impl Job for ResizeCanvas {
    /// The canvas before it was resized
    type Output = Canvas;

    fn run(&self, context: &Context<'_>) -> Result<Self::Output, ExtractError> {
        let root = context.root;
        let canvas = Canvas {
            width: dimension(root, "width")?,
            height: dimension(root, "height")?,
        };
        log::info!("Current canvas: {} x {}", canvas.width, canvas.height);

        let size = self.size;
        root.set_attribute_local("width", size.to_string());
        root.set_attribute_local("height", size.to_string());
        root.set_attribute_local("viewBox", format!("0 0 {size} {size}"));
        log::info!("New canvas: {size} x {size}");

        Ok(canvas)
    }
}

/// Reads a dimension of the root element as a whole number. Units, such as `px`, aren't accepted.
fn dimension(root: Element<'_>, attribute: &'static str) -> Result<i64, ExtractError> {
    let Some(value) = root.get_attribute_local(attribute) else {
        return Err(ExtractError::InvalidDimension {
            attribute,
            value: None,
        });
    };
    value
        .trim_matches(|c: char| c.is_ascii_whitespace())
        .parse()
        .map_err(|_| ExtractError::InvalidDimension {
            attribute,
            value: Some(value.to_string()),
        })
}

#[cfg(test)]
fn resize(size: u32, source: &str) -> anyhow::Result<(String, Canvas)> {
    let size = NonZeroU32::new(size).ok_or_else(|| anyhow::anyhow!("size must be positive"))?;
    super::test_job(&ResizeCanvas { size }, source)
}

#[test]
fn resize_canvas() -> anyhow::Result<()> {
    let (xml, canvas) = resize(
        96,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="512" height="256" viewBox="0 0 512 256" id="svg1"/>"#,
    )?;
    assert_eq!(
        canvas,
        Canvas {
            width: 512,
            height: 256
        }
    );
    insta::assert_snapshot!(xml, @r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="96" height="96" viewBox="0 0 96 96" id="svg1"/>"#);
    Ok(())
}

#[test]
fn resize_canvas_adds_view_box() -> anyhow::Result<()> {
    let (xml, _) = resize(
        24,
        r#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width=" +48 " height="-48"/>"#,
    )?;
    pretty_assertions::assert_eq!(
        xml,
        r#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="24" height="24" viewBox="0 0 24 24"/>"#
    );
    Ok(())
}

#[test]
fn resize_canvas_is_idempotent() -> anyhow::Result<()> {
    let (once, _) = resize(
        96,
        r#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" width="512" height="512"/>"#,
    )?;
    let (twice, canvas) = resize(96, &once)?;
    assert_eq!(once, twice);
    assert_eq!(
        canvas,
        Canvas {
            width: 96,
            height: 96
        }
    );
    Ok(())
}

#[test]
fn resize_canvas_invalid_dimensions() {
    let source = |width: &str| {
        format!(
            r#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape" {width} height="48"/>"#
        )
    };

    for (width, expected) in [
        (r#"width="48px""#, Some("48px")),
        (r#"width="48.5""#, Some("48.5")),
        (r#"width="""#, Some("")),
        ("", None),
    ] {
        let error = resize(96, &source(width))
            .err()
            .and_then(|e| e.downcast::<ExtractError>().ok());
        match error {
            Some(ExtractError::InvalidDimension { attribute, value }) => {
                assert_eq!(attribute, "width");
                assert_eq!(value.as_deref(), expected);
            }
            other => panic!("expected invalid width for `{width}`, found {other:?}"),
        }
    }
}
