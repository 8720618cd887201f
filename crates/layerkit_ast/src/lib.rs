/*!
The layerkit AST is an arena-allocated XML tree which can be parsed from a string, edited in
place, and serialized back into XML.

# Example

```
use layerkit_ast::{
    parse::{parse_with_options, ParsingOptions},
    serialize::{Node as _, Options},
};

let result = parse_with_options(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="16"><g/></svg>"#,
    ParsingOptions::default(),
    |dom, _allocator| {
        let svg = dom.find_element().expect("document has a root element");
        svg.set_attribute_local("width", "32".into());
        dom.serialize_with_options(Options {
            xml_declaration: false,
            ..Options::default()
        })
    },
);
assert_eq!(
    result.unwrap().unwrap(),
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="32"><g/></svg>"#
);
```
*/

pub mod arena;
pub mod element;
pub mod error;
pub mod name;
pub mod node;

#[cfg(feature = "parse")]
pub mod parse;

#[cfg(feature = "serialize")]
pub mod serialize;
#[cfg(feature = "serialize")]
pub mod xmlwriter;
