//! A parent-linked, ordered-children tree (spec.md §4.7's "pointer-tree").
//!
//! Backs both the AST (`cc-ast::node`) and the symbol-table scope tree
//! (`cc-ast::symbol_table`): both need "each node has one parent and an
//! ordered list of children" with stable handles that survive further
//! mutation, which an `IndexVec`-backed arena gives for free without the
//! `Rc<RefCell<..>>` cycles a pointer-based tree would need in Rust.

use cc_util::index_vec::{Idx, IndexVec};

use crate::queue::Queue;

/// A handle to a node in a [`Tree`]. Stable for the tree's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeNodeId(u32);

impl Idx for TreeNodeId {
    fn from_usize(idx: usize) -> Self {
        TreeNodeId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Node<T> {
    data: T,
    parent: Option<TreeNodeId>,
    children: Queue<TreeNodeId>,
}

/// An arena of parent-linked nodes, each carrying a `T` payload and an
/// ordered queue of children.
pub struct Tree<T> {
    nodes: IndexVec<TreeNodeId, Node<T>>,
    root: Option<TreeNodeId>,
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self { nodes: IndexVec::new(), root: None }
    }

    /// Insert the tree's root node. Panics if a root already exists.
    pub fn insert_root(&mut self, data: T) -> TreeNodeId {
        assert!(self.root.is_none(), "Tree already has a root");
        let id = self.nodes.push(Node { data, parent: None, children: Queue::new() });
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> Option<TreeNodeId> {
        self.root
    }

    /// Insert `data` as the last child of `parent`.
    pub fn insert_child(&mut self, parent: TreeNodeId, data: T) -> TreeNodeId {
        let id = self.nodes.push(Node { data, parent: Some(parent), children: Queue::new() });
        self.nodes[parent].children.push_back(id);
        id
    }

    pub fn parent(&self, id: TreeNodeId) -> Option<TreeNodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: TreeNodeId) -> impl Iterator<Item = TreeNodeId> + '_ {
        self.nodes[id].children.iter().copied()
    }

    pub fn child_count(&self, id: TreeNodeId) -> usize {
        self.nodes[id].children.len()
    }

    pub fn get(&self, id: TreeNodeId) -> &T {
        &self.nodes[id].data
    }

    pub fn get_mut(&mut self, id: TreeNodeId) -> &mut T {
        &mut self.nodes[id].data
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from `id` up to (and including) the tree's root.
    pub fn ancestors(&self, id: TreeNodeId) -> impl Iterator<Item = TreeNodeId> + '_ {
        std::iter::successors(Some(id), move |&cur| self.nodes[cur].parent)
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_children() {
        let mut t: Tree<&str> = Tree::new();
        let root = t.insert_root("root");
        let a = t.insert_child(root, "a");
        let b = t.insert_child(root, "b");
        let c = t.insert_child(a, "c");

        assert_eq!(t.parent(a), Some(root));
        assert_eq!(t.parent(root), None);
        assert_eq!(t.children(root).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(t.children(a).collect::<Vec<_>>(), vec![c]);
        assert_eq!(*t.get(c), "c");
    }

    #[test]
    fn ancestors_walk_to_root() {
        let mut t: Tree<i32> = Tree::new();
        let root = t.insert_root(0);
        let a = t.insert_child(root, 1);
        let b = t.insert_child(a, 2);

        let chain: Vec<_> = t.ancestors(b).collect();
        assert_eq!(chain, vec![b, a, root]);
    }

    #[test]
    #[should_panic(expected = "already has a root")]
    fn double_root_panics() {
        let mut t: Tree<i32> = Tree::new();
        t.insert_root(1);
        t.insert_root(2);
    }
}
