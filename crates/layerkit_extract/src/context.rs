use layerkit_ast::{element::Element, node::Ref};

use crate::{
    error::ExtractError,
    namespace::{Namespaces, Role},
};

#[derive(Debug, Clone)]
/// The document-wide state shared by each job
pub struct Context<'arena> {
    /// The root element of the document
    pub root: Element<'arena>,
    /// The namespaces declared by the root element
    pub namespaces: Namespaces,
}

impl<'arena> Context<'arena> {
    /// Creates a context for the root element of `dom`, which may be either a document or its
    /// root element.
    ///
    /// # Errors
    ///
    /// If there is no root element or it doesn't declare the editor namespaces
    pub fn new(dom: Ref<'arena>) -> Result<Self, ExtractError> {
        let root = dom.find_element().ok_or(ExtractError::MissingRoot)?;
        let namespaces = Namespaces::resolve(root)?;
        Ok(Self { root, namespaces })
    }

    /// Returns whether the element is named `local` within the namespace of `role`
    pub fn is(&self, element: &Element<'arena>, role: Role, local: &str) -> bool {
        element.is(self.namespaces.uri(role), local)
    }

    /// Returns the value of the attribute named `local` within the namespace of `role`
    pub fn attribute(&self, element: &Element<'arena>, role: Role, local: &str) -> Option<String> {
        element
            .get_attribute_ns(self.namespaces.uri(role), local)
            .map(|value| value.to_string())
    }
}
