//! XML qualified name types.
use std::fmt::Display;

/// The namespace implicitly bound to the `xml` prefix of every document.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Default)]
/// A qualified name used for the names of tags and attributes.
///
/// Names are compared by their namespace and local part through [`QualName::matches`]; the
/// prefix is only kept so the name can be written back the way it was read.
pub struct QualName {
    /// The prefix (e.g. `inkscape` of `inkscape:label`) of a qualified name.
    pub prefix: Option<String>,
    /// The local name (e.g. the `label` of `inkscape:label`) of a qualified name.
    pub local: String,
    /// The resolved uri of the name
    pub ns: Option<String>,
}

impl QualName {
    /// Creates a qualified name from its parts
    pub fn new(prefix: Option<String>, local: String, ns: Option<String>) -> Self {
        Self { prefix, local, ns }
    }

    /// Creates a name without a prefix or namespace, such as the `width` of `<svg width="16">`
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
            ns: None,
        }
    }

    /// Returns the namespace of the qualified name.
    pub fn ns(&self) -> Option<&str> {
        self.ns.as_deref()
    }

    /// Returns whether the name resolves to `local` within the namespace `ns`, regardless of
    /// which prefix the document used for it.
    pub fn matches(&self, ns: Option<&str>, local: &str) -> bool {
        self.local == local && self.ns() == ns
    }
}

impl Display for QualName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(p) => f.write_fmt(format_args!("{p}:{}", self.local)),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
/// A namespace declared on an element.
pub struct Namespace {
    /// The prefix bound by the declaration, or `None` for the default namespace
    pub prefix: Option<String>,
    /// The uri the prefix resolves to
    pub uri: String,
}

impl Namespace {
    /// Returns the name of the attribute declaring this namespace, i.e. `xmlns` or
    /// `xmlns:prefix`
    pub fn attribute_name(&self) -> QualName {
        match &self.prefix {
            Some(prefix) => QualName::new(Some("xmlns".into()), prefix.clone(), None),
            None => QualName::local("xmlns"),
        }
    }
}

#[test]
fn qual_name_display() {
    let name = QualName::new(
        Some("inkscape".into()),
        "label".into(),
        Some("http://www.inkscape.org/namespaces/inkscape".into()),
    );
    assert_eq!(name.to_string(), "inkscape:label");
    assert_eq!(QualName::local("width").to_string(), "width");
}

#[test]
fn qual_name_matches_ignores_prefix() {
    let uri = "http://www.inkscape.org/namespaces/inkscape";
    let aliased = QualName::new(Some("ink".into()), "label".into(), Some(uri.into()));
    assert!(aliased.matches(Some(uri), "label"));
    assert!(!aliased.matches(None, "label"));
    assert!(!aliased.matches(Some(uri), "groupmode"));
}

#[test]
fn namespace_attribute_name() {
    let default = Namespace {
        prefix: None,
        uri: "http://www.w3.org/2000/svg".into(),
    };
    assert_eq!(default.attribute_name().to_string(), "xmlns");

    let prefixed = Namespace {
        prefix: Some("sodipodi".into()),
        uri: "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd".into(),
    };
    assert_eq!(prefixed.attribute_name().to_string(), "xmlns:sodipodi");
}
