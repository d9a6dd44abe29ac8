//! Recursive proportional layout for expression trees.
//!
//! The engine assigns every node a 2D coordinate by subdividing horizontal
//! intervals: a node's interval is cut into one equal slice per child, each
//! child is placed at its slice's midpoint one `down_step` below the
//! parent, and the slice becomes that child's interval in turn. Sibling
//! slices share at most a boundary point, so sibling subtrees can never
//! overlap horizontally.
//!
//! Layout is a pure function of the tree, the interval and the origin:
//! identical input always yields identical coordinates, and every request
//! computes a fresh [`Layout`] from scratch.

use indexmap::IndexMap;
use log::trace;
use thiserror::Error;

use arbor_core::{
    geometry::{HSpan, Point},
    tree::{ExprTree, NodeId, TreeError},
};

use crate::config::LayoutConfig;

/// Rejected layout preconditions.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The tree violates its structural invariants (no root, cycle,
    /// inconsistent parent links).
    #[error("invalid tree: {0}")]
    InvalidTree(#[from] TreeError),
}

/// Computed coordinates and edges for one tree.
///
/// Ephemeral: recomputed wholesale on every layout request and replaced,
/// never patched.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    positions: IndexMap<NodeId, Point>,
    edges: Vec<(Point, Point)>,
}

impl Layout {
    /// Returns the coordinate assigned to a node.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Iterates over `(node, coordinate)` pairs in placement order
    /// (the tree's preorder).
    pub fn positions(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.positions.iter().map(|(id, point)| (*id, *point))
    }

    /// Returns the number of placed nodes.
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the recorded parent-to-child edges.
    pub fn edges(&self) -> &[(Point, Point)] {
        &self.edges
    }
}

/// The recursive proportional layout engine.
#[derive(Debug, Clone)]
pub struct Engine {
    down_step: f32,
}

impl Engine {
    /// Creates an engine with an explicit vertical step.
    pub fn new(down_step: f32) -> Self {
        Self { down_step }
    }

    /// Creates an engine from the layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.down_step())
    }

    /// Computes coordinates for every node of `tree`.
    ///
    /// The root is placed at `origin` and owns the horizontal interval
    /// `span`; descendants subdivide it recursively.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidTree`] when the tree fails its
    /// invariant check. Nothing is computed in that case.
    pub fn calculate(
        &self,
        tree: &ExprTree,
        span: HSpan,
        origin: Point,
    ) -> Result<Layout, LayoutError> {
        tree.validate()?;
        let root = tree
            .root()
            .expect("validate guarantees the tree has a root");

        let mut layout = Layout::default();
        layout.positions.insert(root, origin);
        self.subdivide(tree, root, span, origin, &mut layout);

        trace!(
            nodes = layout.node_count(),
            edges = layout.edges.len();
            "Layout computed",
        );
        Ok(layout)
    }

    /// Places the children of `node` within `span` and recurses into the
    /// ones that have children of their own.
    fn subdivide(&self, tree: &ExprTree, node: NodeId, span: HSpan, at: Point, out: &mut Layout) {
        let children = tree.children(node);
        let count = children.len();
        if count == 0 {
            return;
        }

        for (i, &child) in children.iter().enumerate() {
            let slice = span.split(i, count);
            let position = Point::new(slice.midpoint(), at.y() + self.down_step);

            out.positions.insert(child, position);
            out.edges.push((at, position));

            if !tree.is_leaf(child) {
                self.subdivide(tree, child, slice, position, out);
            }
        }
    }
}
