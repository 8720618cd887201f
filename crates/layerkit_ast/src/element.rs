//! XML element types.
use std::cell;

use crate::{
    name::{Namespace, QualName},
    node::{Attribute, Node, NodeData, Ref},
};

#[derive(Clone, Copy, Debug)]
/// An XML element type.
pub struct Element<'arena> {
    node: Ref<'arena>,
}

impl<'arena> Element<'arena> {
    /// Converts the provided node into an element, if the node type matches an element
    pub fn new(node: Ref<'arena>) -> Option<Self> {
        match node.node_data {
            NodeData::Element { .. } => Some(Self { node }),
            _ => None,
        }
    }

    /// Returns the node backing this element
    pub fn node(&self) -> Ref<'arena> {
        self.node
    }

    fn data(&self) -> (&'arena QualName, &'arena [Namespace], &'arena cell::RefCell<Vec<Attribute>>) {
        match &self.node.node_data {
            NodeData::Element {
                name,
                namespaces,
                attrs,
            } => (name, namespaces, attrs),
            _ => unreachable!("element was created from a non-element node"),
        }
    }

    /// Returns the qualified name of the element's tag
    pub fn qual_name(&self) -> &'arena QualName {
        self.data().0
    }

    /// Returns whether the element's tag resolves to `local` within the namespace `ns`
    pub fn is(&self, ns: Option<&str>, local: &str) -> bool {
        self.qual_name().matches(ns, local)
    }

    /// Returns the namespaces declared on this element.
    ///
    /// For the root element, these are all the namespaces declared by the document's root.
    pub fn namespaces(&self) -> &'arena [Namespace] {
        self.data().1
    }

    /// Returns the uri bound to `prefix` by a declaration on this element. The default namespace
    /// is looked up with `None`.
    pub fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<&'arena str> {
        self.namespaces()
            .iter()
            .find(|ns| ns.prefix.as_deref() == prefix)
            .map(|ns| ns.uri.as_str())
    }

    /// Returns a read-only view of the element's attributes.
    ///
    /// [MDN | attributes](https://developer.mozilla.org/en-US/docs/Web/API/Element/attributes)
    pub fn attributes(&self) -> cell::Ref<'arena, Vec<Attribute>> {
        self.data().2.borrow()
    }

    /// Returns the value of the attribute named `local` within the namespace `ns`.
    ///
    /// [MDN | getAttributeNS](https://developer.mozilla.org/en-US/docs/Web/API/Element/getAttributeNS)
    pub fn get_attribute_ns(&self, ns: Option<&str>, local: &str) -> Option<cell::Ref<'arena, str>> {
        cell::Ref::filter_map(self.attributes(), |attrs| {
            attrs
                .iter()
                .find(|a| a.name.matches(ns, local))
                .map(|a| a.value.as_str())
        })
        .ok()
    }

    /// Returns the value of the attribute named `local` without a namespace.
    ///
    /// [MDN | getAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/getAttribute)
    pub fn get_attribute_local(&self, local: &str) -> Option<cell::Ref<'arena, str>> {
        self.get_attribute_ns(None, local)
    }

    /// Sets the value of an attribute without a namespace, returning the previous value.
    ///
    /// An existing attribute keeps its position; a new attribute is added after the others.
    ///
    /// [MDN | setAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/setAttribute)
    pub fn set_attribute_local(&self, local: &str, value: String) -> Option<String> {
        let mut attrs = self.data().2.borrow_mut();
        if let Some(attr) = attrs.iter_mut().find(|a| a.name.matches(None, local)) {
            Some(std::mem::replace(&mut attr.value, value))
        } else {
            attrs.push(Attribute {
                name: QualName::local(local),
                value,
            });
            None
        }
    }

    /// Returns an iterator over the child elements of this element.
    ///
    /// The iteration ends early if the current child is removed; see [`Element::children`].
    pub fn children_iter(&self) -> impl Iterator<Item = Self> {
        self.node.child_nodes_iter().filter_map(Self::new)
    }

    /// Returns a snapshot of the child elements of this element.
    ///
    /// [MDN | children](https://developer.mozilla.org/en-US/docs/Web/API/Element/children)
    pub fn children(&self) -> Vec<Self> {
        self.children_iter().collect()
    }

    /// Detaches the element from its parent.
    ///
    /// [MDN | remove](https://developer.mozilla.org/en-US/docs/Web/API/Element/remove)
    pub fn remove(&self) {
        self.node.remove();
    }

    /// Detaches the element from its parent, along with the whitespace that indented it.
    ///
    /// This prevents removed elements from leaving behind blank lines in the serialized
    /// document.
    pub fn remove_with_preceding_whitespace(&self) {
        if let Some(previous) = self.node.previous_sibling().filter(|n| n.is_whitespace()) {
            previous.remove();
        }
        self.remove();
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node.ptr_eq(other.node)
    }
}

impl Eq for Element<'_> {}

impl<'arena> std::ops::Deref for Element<'arena> {
    type Target = Node<'arena>;

    fn deref(&self) -> &Self::Target {
        self.node
    }
}

#[test]
fn element_attributes() {
    use crate::arena::Allocator;

    let arena = Allocator::new_arena();
    let allocator = Allocator::new(&arena);
    let inkscape = "http://www.inkscape.org/namespaces/inkscape";
    let node = allocator.alloc(NodeData::Element {
        name: QualName::local("g"),
        namespaces: vec![],
        attrs: cell::RefCell::new(vec![
            Attribute {
                name: QualName::new(Some("inkscape".into()), "label".into(), Some(inkscape.into())),
                value: "icon".into(),
            },
            Attribute {
                name: QualName::local("id"),
                value: "layer1".into(),
            },
        ]),
    });
    let element = Element::new(node).unwrap();

    assert_eq!(
        element.get_attribute_ns(Some(inkscape), "label").as_deref(),
        Some("icon")
    );
    assert!(element.get_attribute_local("label").is_none());

    assert_eq!(element.set_attribute_local("id", "layer2".into()), Some("layer1".into()));
    assert_eq!(element.set_attribute_local("opacity", "1".into()), None);
    let names: Vec<_> = element
        .attributes()
        .iter()
        .map(|a| a.name.to_string())
        .collect();
    assert_eq!(names, vec!["inkscape:label", "id", "opacity"]);
}
