//! Arena view over a tree-sitter tree.

use std::collections::HashMap;

use tree_sitter::{Node, Tree};

/// Index of a node in pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Named nodes of one file in pre-order, with a parent index.
///
/// Because the arena is in pre-order, the subtree of a node is the
/// contiguous id range `[id, subtree_end[id])`.
pub struct SyntaxTree<'t> {
    nodes: Vec<Node<'t>>,
    parents: Vec<Option<NodeId>>,
    subtree_end: Vec<usize>,
    by_ts_id: HashMap<usize, NodeId>,
    source: &'t str,
}

impl<'t> SyntaxTree<'t> {
    /// Single top-down pass: children in source order, parent recorded
    /// before the child is ever visited.
    pub fn build(tree: &'t Tree, source: &'t str) -> Self {
        let mut nodes = Vec::new();
        let mut parents = Vec::new();
        let mut by_ts_id = HashMap::new();

        let mut pending: Vec<(Node<'t>, Option<NodeId>)> = vec![(tree.root_node(), None)];
        while let Some((node, parent)) = pending.pop() {
            let id = NodeId(nodes.len());
            nodes.push(node);
            parents.push(parent);
            by_ts_id.insert(node.id(), id);

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            pending.extend(children.into_iter().rev().map(|c| (c, Some(id))));
        }

        let mut subtree_end: Vec<usize> = (1..=nodes.len()).collect();
        for idx in (0..nodes.len()).rev() {
            if let Some(parent) = parents[idx] {
                subtree_end[parent.0] = subtree_end[parent.0].max(subtree_end[idx]);
            }
        }

        Self {
            nodes,
            parents,
            subtree_end,
            by_ts_id,
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Every node in walk order.
    pub fn walk(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| NodeRef {
            tree: self,
            id: NodeId(i),
        })
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.0]
    }

    fn lookup(&self, node: Node<'_>) -> Option<NodeId> {
        self.by_ts_id.get(&node.id()).copied()
    }
}

/// A borrowed handle on one arena node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SyntaxTree<'a>,
    id: NodeId,
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.kind(), self.line())
    }
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Underlying tree-sitter node, for anonymous tokens (operators,
    /// modifier keywords) that the arena does not index.
    pub fn raw(&self) -> Node<'a> {
        self.tree.nodes[self.id.0]
    }

    pub fn kind(&self) -> &'static str {
        self.raw().kind()
    }

    /// Start line, 1-based.
    pub fn line(&self) -> usize {
        self.raw().start_position().row + 1
    }

    /// End line, 1-based.
    pub fn end_line(&self) -> usize {
        self.raw().end_position().row + 1
    }

    pub fn text(&self) -> &'a str {
        let node = self.raw();
        self.tree
            .source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.parents[self.id.0].map(|id| self.at(id))
    }

    /// Parents from nearest to root.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Pre-order sub-walk of this node's subtree, including the node itself.
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        (self.id.0..tree.subtree_end[self.id.0]).map(move |i| NodeRef {
            tree,
            id: NodeId(i),
        })
    }

    pub fn named_children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        let node = self.raw();
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        children.into_iter().filter_map(move |c| {
            tree.lookup(c).map(|id| NodeRef { tree, id })
        })
    }

    /// Named children of the given kind.
    pub fn children_of_kind(&self, kind: &'static str) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.named_children().filter(move |c| c.kind() == kind)
    }

    /// First named child bound to a grammar field.
    pub fn field(&self, name: &str) -> Option<NodeRef<'a>> {
        self.raw()
            .child_by_field_name(name)
            .and_then(|n| self.tree.lookup(n))
            .map(|id| self.at(id))
    }

    /// All named children bound to a grammar field (e.g. `declarator`).
    pub fn fields(&self, name: &str) -> Vec<NodeRef<'a>> {
        let node = self.raw();
        let mut cursor = node.walk();
        let children: Vec<_> = node.children_by_field_name(name, &mut cursor).collect();
        children
            .into_iter()
            .filter_map(|n| self.tree.lookup(n))
            .map(|id| self.at(id))
            .collect()
    }

    /// Text of a field, including anonymous ones such as `operator`.
    pub fn field_text(&self, name: &str) -> Option<&'a str> {
        let child = self.raw().child_by_field_name(name)?;
        self.tree.source.get(child.start_byte()..child.end_byte())
    }

    /// Whether this node is the child bound to `field` on its parent.
    pub fn is_field_of_parent(&self, field: &str) -> bool {
        self.parent()
            .and_then(|p| p.raw().child_by_field_name(field))
            .map(|n| n.id() == self.raw().id())
            .unwrap_or(false)
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            id,
        }
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'a> {
    next: Option<NodeRef<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
