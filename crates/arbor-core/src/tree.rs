//! Arena-backed expression trees.
//!
//! Nodes live in a flat arena and reference each other by [`NodeId`], so
//! parent and child links are plain indices instead of owning pointers.
//! Exactly one node is the root (it has no parent); every other reachable
//! node appears exactly once in its parent's child list.
//!
//! Structural edits go through [`ExprTree::connect`],
//! [`ExprTree::detach_children`] and [`ExprTree::attach_children`], which
//! reject edits that would attach a node twice or close a cycle.
//! [`ExprTree::validate`] re-checks the full invariant set for trees that
//! have been restructured after construction.

use std::fmt;

use thiserror::Error;

/// Index of a node within its [`ExprTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Returns the operator's source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }

    /// Returns true for operators whose chains may be merged into one
    /// n-ary node without changing the expression's value.
    pub fn is_associative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The payload of a tree node.
///
/// The `Display` implementation is the node's drawing label.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A numeric literal leaf.
    Number(f64),
    /// A named operand leaf.
    Variable(String),
    /// A binary (or, after distribution, n-ary) operator.
    Operator(BinaryOp),
    /// Unary minus with a single child.
    Negate,
    /// A function call; children are the arguments in order.
    Call(String),
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Number(value) => write!(f, "{value}"),
            NodeKind::Variable(name) => write!(f, "{name}"),
            NodeKind::Operator(op) => write!(f, "{op}"),
            NodeKind::Negate => write!(f, "-"),
            NodeKind::Call(name) => write!(f, "{name}"),
        }
    }
}

/// Violation of the tree's structural invariants.
///
/// These are internal contract errors, never user-input errors: a
/// collaborator handed over (or produced) a malformed tree.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("tree has no root node")]
    MissingRoot,

    #[error("the root was already set to {0}")]
    RootAlreadySet(NodeId),

    #[error("node {0} is already attached to a parent")]
    AlreadyAttached(NodeId),

    #[error("attaching {child} under {parent} would close a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("node {0} was reached twice during traversal")]
    VisitedTwice(NodeId),

    #[error("parent link of node {0} does not match the node that lists it")]
    BrokenParentLink(NodeId),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An n-ary expression tree stored in an index arena.
#[derive(Debug, Clone, Default)]
pub struct ExprTree {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl ExprTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node to the arena and returns its id.
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Marks a detached node as the tree's root.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), TreeError> {
        if let Some(root) = self.root {
            return Err(TreeError::RootAlreadySet(root));
        }
        if self.nodes[id.index()].parent.is_some() {
            return Err(TreeError::AlreadyAttached(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// The child must be detached, must not be the root, and must not be an
    /// ancestor of `parent`.
    pub fn connect(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.nodes[child.index()].parent.is_some() || self.root == Some(child) {
            return Err(TreeError::AlreadyAttached(child));
        }

        // Walk up from the parent; finding the child there means the child
        // currently heads a subtree containing the parent.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(TreeError::Cycle { parent, child });
            }
            cursor = self.nodes[node.index()].parent;
        }

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Detaches and returns all children of `parent`, in order.
    ///
    /// The returned nodes (and their subtrees) stay in the arena but are no
    /// longer reachable from the root until re-attached.
    pub fn detach_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[parent.index()].children);
        for &child in &children {
            self.nodes[child.index()].parent = None;
        }
        children
    }

    /// Attaches each node in `children`, in order, under `parent`.
    pub fn attach_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), TreeError> {
        for &child in children {
            self.connect(parent, child)?;
        }
        Ok(())
    }

    /// Returns the root id, if one has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the payload of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Returns the node's drawing label.
    pub fn label(&self, id: NodeId) -> String {
        self.nodes[id.index()].kind.to_string()
    }

    /// Returns the children of a node, in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Returns the parent of a node, or `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Returns true if the node has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.index()].children.is_empty()
    }

    /// Returns the number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over reachable nodes in depth-first preorder.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Checks the full invariant set: a parentless root exists, every
    /// reachable child's parent link points back at the node listing it,
    /// and no node is reached twice (which also rules out cycles).
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.root.ok_or(TreeError::MissingRoot)?;
        if self.nodes[root.index()].parent.is_some() {
            return Err(TreeError::BrokenParentLink(root));
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if visited[node.index()] {
                return Err(TreeError::VisitedTwice(node));
            }
            visited[node.index()] = true;

            for &child in &self.nodes[node.index()].children {
                if self.nodes[child.index()].parent != Some(node) {
                    return Err(TreeError::BrokenParentLink(child));
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}

/// Depth-first preorder traversal over the reachable nodes of a tree.
pub struct Preorder<'a> {
    tree: &'a ExprTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the first child is visited first.
        for &child in self.tree.nodes[node.index()].children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the tree for `a+b`: an Add root with two variable leaves.
    fn simple_sum() -> (ExprTree, NodeId, NodeId, NodeId) {
        let mut tree = ExprTree::new();
        let root = tree.push(NodeKind::Operator(BinaryOp::Add));
        let a = tree.push(NodeKind::Variable("a".to_string()));
        let b = tree.push(NodeKind::Variable("b".to_string()));
        tree.connect(root, a).unwrap();
        tree.connect(root, b).unwrap();
        tree.set_root(root).unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn test_build_and_query() {
        let (tree, root, a, b) = simple_sum();

        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert!(tree.is_leaf(a));
        assert!(!tree.is_leaf(root));
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.label(root), "+");
        assert_eq!(tree.label(a), "a");
    }

    #[test]
    fn test_preorder_visits_parent_before_children() {
        let (tree, root, a, b) = simple_sum();
        let order: Vec<NodeId> = tree.iter().collect();
        assert_eq!(order, vec![root, a, b]);
    }

    #[test]
    fn test_number_label_drops_trailing_zero() {
        let mut tree = ExprTree::new();
        let n = tree.push(NodeKind::Number(2.0));
        let frac = tree.push(NodeKind::Number(4.76));
        assert_eq!(tree.label(n), "2");
        assert_eq!(tree.label(frac), "4.76");
    }

    #[test]
    fn test_connect_rejects_second_parent() {
        let (mut tree, _root, a, _b) = simple_sum();
        let other = tree.push(NodeKind::Negate);
        assert_eq!(tree.connect(other, a), Err(TreeError::AlreadyAttached(a)));
    }

    #[test]
    fn test_connect_rejects_cycle() {
        let mut tree = ExprTree::new();
        let outer = tree.push(NodeKind::Negate);
        let inner = tree.push(NodeKind::Negate);
        tree.connect(outer, inner).unwrap();

        // `outer` heads the subtree containing `inner`; attaching it under
        // `inner` would close a loop.
        assert_eq!(
            tree.connect(inner, outer),
            Err(TreeError::Cycle {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn test_set_root_twice_fails() {
        let (mut tree, root, _a, _b) = simple_sum();
        let stray = tree.push(NodeKind::Number(1.0));
        assert_eq!(tree.set_root(stray), Err(TreeError::RootAlreadySet(root)));
    }

    #[test]
    fn test_validate_ok() {
        let (tree, _, _, _) = simple_sum();
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_validate_missing_root() {
        let mut tree = ExprTree::new();
        tree.push(NodeKind::Number(1.0));
        assert_eq!(tree.validate(), Err(TreeError::MissingRoot));
    }

    #[test]
    fn test_detach_then_attach_preserves_invariants() {
        let (mut tree, root, a, b) = simple_sum();

        let detached = tree.detach_children(root);
        assert_eq!(detached, vec![a, b]);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.node_count(), 1);

        tree.attach_children(root, &[b, a]).unwrap();
        assert_eq!(tree.children(root), &[b, a]);
        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_orphans_do_not_count() {
        let (mut tree, root, a, b) = simple_sum();

        // Replace both children with a single fresh leaf; a and b stay in
        // the arena but become unreachable.
        tree.detach_children(root);
        let c = tree.push(NodeKind::Variable("c".to_string()));
        tree.attach_children(root, &[c]).unwrap();

        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.parent(b), None);
    }
}
