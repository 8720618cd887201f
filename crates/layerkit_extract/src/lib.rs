/*!
Extracts a single layer from a multi-layer Inkscape document, producing a standalone icon.

A layer is a top-level `<g inkscape:groupmode="layer">` element, named by its `inkscape:label`.
An extraction

1. removes the `sodipodi:guide` elements from the `sodipodi:namedview`,
2. removes every labelled layer other than the one requested, and
3. resizes the canvas to a square, 96 by 96 unless another size is given.

Groups which aren't layers, layers without a label, and any other content are left as they are.

# Example

```
use layerkit_ast::serialize::Options;
use layerkit_extract::Extract;

let source = r#"<svg
    xmlns="http://www.w3.org/2000/svg"
    xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
    xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
    width="512" height="512">
  <g inkscape:groupmode="layer" inkscape:label="background"/>
  <g inkscape:groupmode="layer" inkscape:label="icon"/>
</svg>"#;

let (output, report) = Extract::new("icon")
    .transform(source.as_bytes(), Options::default())
    .unwrap();
assert!(report.found);
assert_eq!(report.layers_removed, vec!["background"]);
assert!(String::from_utf8(output).unwrap().contains(r#"viewBox="0 0 96 96""#));
```
*/

mod context;
pub mod error;
mod extract;
mod jobs;
mod namespace;

pub use crate::context::Context;
pub use crate::error::ExtractError;
pub use crate::extract::{Extract, Report};
pub use crate::jobs::*;
pub use crate::namespace::{Namespaces, Role};

#[cfg(test)]
#[ctor::ctor]
fn init_test() {
    let _ = env_logger::builder().is_test(true).try_init();
}
