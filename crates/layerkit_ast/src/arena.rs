//! The arena used to allocate nodes
use crate::node::{Node, NodeData, Ref};

/// An arena for [`Node`] values
pub type Arena<'arena> = typed_arena::Arena<Node<'arena>>;

/// The allocator for adding new nodes that live as long as the document
#[derive(Clone, Copy)]
pub struct Allocator<'arena> {
    /// The arena for new nodes
    arena: &'arena Arena<'arena>,
}

impl<'arena> Allocator<'arena> {
    /// Returns an empty arena for an allocator to borrow
    pub fn new_arena() -> Arena<'arena> {
        typed_arena::Arena::new()
    }

    /// Returns an empty arena with room for `n` nodes
    pub fn new_arena_with_capacity(n: usize) -> Arena<'arena> {
        typed_arena::Arena::with_capacity(n)
    }

    /// Creates a new allocator to assign nodes that live as long as the document requires.
    pub fn new(arena: &'arena Arena<'arena>) -> Self {
        Self { arena }
    }

    /// Allocates a detached node with the given [`NodeData`]
    pub fn alloc(&self, node_data: NodeData) -> Ref<'arena> {
        self.arena.alloc(Node::new(node_data))
    }
}
