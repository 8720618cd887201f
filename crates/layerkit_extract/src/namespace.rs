//! Binds the namespaces an Inkscape document is read with.
use std::fmt::Display;

use layerkit_ast::element::Element;

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The part a namespace plays in an Inkscape document
pub enum Role {
    /// The namespace of SVG elements, such as `<g>`
    Structural,
    /// The namespace of `sodipodi:namedview` and its guides
    EditorMetadata,
    /// The namespace of `inkscape:groupmode` and `inkscape:label`
    EditorGeometry,
}

impl Role {
    /// Returns the prefix the role is declared with on the root element
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Structural => "svg",
            Self::EditorMetadata => "sodipodi",
            Self::EditorGeometry => "inkscape",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural => f.write_str("svg elements"),
            Self::EditorMetadata => f.write_str("editor metadata"),
            Self::EditorGeometry => f.write_str("layer attributes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The uris of each [`Role`], as declared by the document
pub struct Namespaces {
    structural: Option<String>,
    editor_metadata: String,
    editor_geometry: String,
}

impl Namespaces {
    /// Reads the namespaces declared on the root element.
    ///
    /// The structural namespace is the one bound to `svg`, falling back to the default namespace
    /// and then to the namespace of the root element itself.
    ///
    /// # Errors
    ///
    /// If `sodipodi` or `inkscape` isn't declared on the root element
    pub fn resolve(root: Element<'_>) -> Result<Self, ExtractError> {
        let structural = root
            .lookup_namespace_uri(Some(Role::Structural.prefix()))
            .or_else(|| root.lookup_namespace_uri(None))
            .or_else(|| root.qual_name().ns())
            .filter(|uri| !uri.is_empty())
            .map(String::from);
        let lookup = |role: Role| {
            root.lookup_namespace_uri(Some(role.prefix()))
                .map(String::from)
                .ok_or(ExtractError::MissingNamespace(role))
        };

        let namespaces = Self {
            structural,
            editor_metadata: lookup(Role::EditorMetadata)?,
            editor_geometry: lookup(Role::EditorGeometry)?,
        };
        log::debug!("resolved namespaces: {namespaces:?}");
        Ok(namespaces)
    }

    /// Returns the uri of the given role. Only the structural namespace may be absent.
    pub fn uri(&self, role: Role) -> Option<&str> {
        match role {
            Role::Structural => self.structural.as_deref(),
            Role::EditorMetadata => Some(&self.editor_metadata),
            Role::EditorGeometry => Some(&self.editor_geometry),
        }
    }
}

#[cfg(test)]
fn resolve(source: &str) -> Result<Namespaces, ExtractError> {
    use layerkit_ast::parse::{parse_with_options, ParsingOptions};

    parse_with_options(source, ParsingOptions::default(), |dom, _| {
        Namespaces::resolve(dom.find_element().ok_or(ExtractError::MissingRoot)?)
    })?
}

#[test]
fn resolve_declared_namespaces() -> anyhow::Result<()> {
    let namespaces = resolve(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:svg="urn:svg" xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape"/>"#,
    )?;
    assert_eq!(namespaces.uri(Role::Structural), Some("urn:svg"));
    assert_eq!(namespaces.uri(Role::EditorMetadata), Some("urn:sodipodi"));
    assert_eq!(namespaces.uri(Role::EditorGeometry), Some("urn:inkscape"));

    let namespaces = resolve(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape"/>"#,
    )?;
    assert_eq!(
        namespaces.uri(Role::Structural),
        Some("http://www.w3.org/2000/svg")
    );

    let namespaces =
        resolve(r#"<svg xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape"/>"#)?;
    assert_eq!(namespaces.uri(Role::Structural), None);

    let namespaces = resolve(
        r#"<svg xmlns="" xmlns:sodipodi="urn:sodipodi" xmlns:inkscape="urn:inkscape"/>"#,
    )?;
    assert_eq!(namespaces.uri(Role::Structural), None);
    Ok(())
}

#[test]
fn resolve_missing_namespaces() {
    assert!(matches!(
        resolve(r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="urn:inkscape"/>"#),
        Err(ExtractError::MissingNamespace(Role::EditorMetadata))
    ));
    assert!(matches!(
        resolve(r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="urn:sodipodi"/>"#),
        Err(ExtractError::MissingNamespace(Role::EditorGeometry))
    ));
}
