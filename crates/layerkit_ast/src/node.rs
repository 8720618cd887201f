//! XML node types.
use std::cell::{Cell, RefCell};

use crate::{
    element::Element,
    name::{Namespace, QualName},
};

/// A reference to a node
pub type Ref<'arena> = &'arena Node<'arena>;
/// A settable reference to a node
pub type Link<'arena> = Cell<Option<Ref<'arena>>>;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
/// An enum which specifies the type of node.
///
/// [MDN | nodeType](https://developer.mozilla.org/en-US/docs/Web/API/Node/nodeType)
pub enum Type {
    /// A `Document` node
    Document,
    /// An [Element] node like `<g>` or `<svg>`
    Element,
    /// The actual text inside an element
    Text,
    /// A `Comment` node, such as `<!-- ... -->`
    Comment,
    /// A `ProcessingInstruction` of an XML document, such as `<?xml-stylesheet ... ?>`
    ProcessingInstruction,
}

#[derive(PartialEq, Eq, Clone, Debug)]
/// The attribute of an element's attributes.
pub struct Attribute {
    /// The name of an attribute (e.g. `foo` of `foo="bar"`)
    pub name: QualName,
    /// The value of an attribute (e.g. `"bar"` of `foo="bar"`)
    pub value: String,
}

#[derive(Debug)]
/// The data of a node in an XML document.
pub enum NodeData {
    /// The document, which contains the root element, PIs, and comments.
    Document,
    /// An element. (e.g. `<g inkscape:label="icon">...</g>`)
    Element {
        /// The qualified name of the element's tag.
        name: QualName,
        /// The namespaces declared by this element, in addition to those of its ancestors.
        namespaces: Vec<Namespace>,
        /// The attributes of the element.
        attrs: RefCell<Vec<Attribute>>,
    },
    /// A processing instruction. (e.g. `<?xml-stylesheet href="a.css"?>`)
    PI {
        /// The name of the application to which the instruction is targeted
        target: String,
        /// Data for the application
        value: Option<String>,
    },
    /// A comment node. (e.g. `<!-- foo -->`)
    Comment(String),
    /// A text node. (e.g. `foo` of `<text>foo</text>`)
    Text(RefCell<String>),
}

#[derive(derive_more::Debug)]
/// An XML node type.
pub struct Node<'arena> {
    #[debug(skip)]
    /// The node's parent.
    pub parent: Link<'arena>,
    #[debug(skip)]
    /// The node after this of the node's parent's children
    pub next_sibling: Link<'arena>,
    #[debug(skip)]
    /// The node before this of the node's parent's children
    pub previous_sibling: Link<'arena>,
    #[debug(skip)]
    /// The node's first child.
    pub first_child: Link<'arena>,
    #[debug(skip)]
    /// The node's last child.
    pub last_child: Link<'arena>,
    /// The node's type and associated data.
    pub node_data: NodeData,
}

/// An iterator over the children of a node.
///
/// The next sibling is read lazily, so removing the current node while iterating ends the
/// iteration early. Collect the children first when the tree is edited during iteration.
pub struct ChildNodes<'arena> {
    next: Option<Ref<'arena>>,
}

impl<'arena> Iterator for ChildNodes<'arena> {
    type Item = Ref<'arena>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling.get();
        Some(current)
    }
}

impl<'arena> Node<'arena> {
    /// Creates a node which isn't attached to any tree
    pub fn new(node_data: NodeData) -> Self {
        Self {
            parent: Cell::new(None),
            next_sibling: Cell::new(None),
            previous_sibling: Cell::new(None),
            first_child: Cell::new(None),
            last_child: Cell::new(None),
            node_data,
        }
    }

    /// Returns an enum that identifies what the node is.
    ///
    /// [MDN | nodeType](https://developer.mozilla.org/en-US/docs/Web/API/Node/nodeType)
    pub fn node_type(&self) -> Type {
        match &self.node_data {
            NodeData::Document => Type::Document,
            NodeData::Element { .. } => Type::Element,
            NodeData::PI { .. } => Type::ProcessingInstruction,
            NodeData::Comment(_) => Type::Comment,
            NodeData::Text(_) => Type::Text,
        }
    }

    /// Whether the given reference points to this node
    pub fn ptr_eq(&self, other: &Node<'_>) -> bool {
        std::ptr::eq(
            std::ptr::from_ref(self).cast::<()>(),
            std::ptr::from_ref(other).cast::<()>(),
        )
    }

    /// Returns an iterator over the children of this node
    pub fn child_nodes_iter(&self) -> ChildNodes<'arena> {
        ChildNodes {
            next: self.first_child.get(),
        }
    }

    /// Returns the node immediately preceding itself from the parent's list of children
    ///
    /// [MDN | previousSibling](https://developer.mozilla.org/en-US/docs/Web/API/Node/previousSibling)
    pub fn previous_sibling(&self) -> Option<Ref<'arena>> {
        self.previous_sibling.get()
    }

    /// Does a breadth-first search to find an element from the current node, returning this node
    /// if it is an element.
    pub fn find_element(&'arena self) -> Option<Element<'arena>> {
        let mut queue = std::collections::VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            if let Some(element) = Element::new(node) {
                return Some(element);
            }
            queue.extend(node.child_nodes_iter());
        }
        None
    }

    /// Returns whether this node is text made up of only whitespace
    pub fn is_whitespace(&self) -> bool {
        match &self.node_data {
            NodeData::Text(text) => text.borrow().trim().is_empty(),
            _ => false,
        }
    }

    /// Adds a node to the end of the list of children of this node.
    ///
    /// The child should be detached from any previous parent before calling this.
    ///
    /// [MDN | appendChild](https://developer.mozilla.org/en-US/docs/Web/API/Node/appendChild)
    pub fn append_child(&'arena self, child: Ref<'arena>) {
        // parent
        child.parent.set(Some(self));

        // parent children
        let last_child = self.last_child.replace(Some(child));
        if self.first_child.get().is_none() {
            self.first_child.set(Some(child));
        }

        // siblings
        child.previous_sibling.set(last_child);
        if let Some(last_child) = last_child {
            last_child.next_sibling.set(Some(child));
        }
    }

    /// Detaches the node from its parent and siblings.
    ///
    /// The node's own children stay attached to it.
    ///
    /// [MDN | remove](https://developer.mozilla.org/en-US/docs/Web/API/Element/remove)
    pub fn remove(&self) {
        let previous_sibling = self.previous_sibling.take();
        let next_sibling = self.next_sibling.take();
        let parent = self.parent.take();
        if let Some(previous_sibling) = previous_sibling {
            if let Some(next_sibling) = next_sibling {
                // prev -> ~self~ -> next
                next_sibling.previous_sibling.set(Some(previous_sibling));
            } else if let Some(parent) = parent {
                // prev -> ~self~ -> None
                parent.last_child.set(Some(previous_sibling));
            }
            previous_sibling.next_sibling.set(next_sibling);
        } else if let Some(next_sibling) = next_sibling {
            next_sibling.previous_sibling.set(None);
            if let Some(parent) = parent {
                // None -> ~self~ -> next
                parent.first_child.set(Some(next_sibling));
            }
        } else if let Some(parent) = parent {
            // None -> ~self~ -> None
            parent.first_child.set(None);
            parent.last_child.set(None);
        }
    }
}

#[cfg(test)]
fn text<'arena>(allocator: &crate::arena::Allocator<'arena>, value: &str) -> Ref<'arena> {
    allocator.alloc(NodeData::Text(RefCell::new(value.into())))
}

#[test]
fn remove_relinks_siblings() {
    use crate::arena::Allocator;

    let arena = Allocator::new_arena();
    let allocator = Allocator::new(&arena);
    let parent = allocator.alloc(NodeData::Document);
    let a = text(&allocator, "a");
    let b = text(&allocator, "b");
    let c = text(&allocator, "c");
    parent.append_child(a);
    parent.append_child(b);
    parent.append_child(c);

    b.remove();
    let remaining: Vec<_> = parent
        .child_nodes_iter()
        .filter_map(|node| match &node.node_data {
            NodeData::Text(text) => Some(text.borrow().clone()),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec!["a", "c"]);
    assert!(b.parent.get().is_none());
    assert!(c.previous_sibling().is_some_and(|n| n.ptr_eq(a)));

    a.remove();
    c.remove();
    assert!(parent.first_child.get().is_none());
    assert!(parent.last_child.get().is_none());
}
