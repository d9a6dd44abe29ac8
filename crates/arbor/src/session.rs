//! Rebuildable drawing state for a positioned expression tree.
//!
//! A [`DrawingSession`] owns whatever is currently "on screen": one label
//! per node, the circle coordinates and the connection edges. Each
//! [`DrawingSession::rebuild`] computes the complete replacement scene
//! first and then swaps it in as a single assignment, so the previous
//! visuals are torn down exactly once per rebuild and a failure leaves
//! them untouched — there is no observable state with old elements cleared
//! but new ones not yet placed. Taking `&mut self` additionally rules out
//! a second rebuild (or any read) overlapping a rebuild in progress.

use log::debug;

use arbor_core::{
    geometry::{HSpan, Point},
    tree::ExprTree,
};

use crate::{
    config::LayoutConfig,
    error::ArborError,
    layout::Engine,
};

/// A node label placed at its computed coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    position: Point,
}

impl Label {
    /// Returns the label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the label position.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// The materialized visuals of one successful rebuild.
#[derive(Debug, Clone, Default)]
struct Scene {
    labels: Vec<Label>,
    circles: Vec<Point>,
    edges: Vec<(Point, Point)>,
}

/// Owner of the currently materialized visual state.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    engine: Engine,
    half_span: f32,
    scene: Option<Scene>,
}

impl DrawingSession {
    /// Creates an empty session using the given layout constants.
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            engine: Engine::from_config(config),
            half_span: config.half_span(),
            scene: None,
        }
    }

    /// Replaces the current visuals with a fresh rendering of `tree`.
    ///
    /// The root is placed at `origin`; the tree's horizontal interval is
    /// the configured span centered on it.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ArborError::Layout`] when the tree violates its
    /// structural invariants. The previously displayed scene (if any) is
    /// left untouched in that case.
    pub fn rebuild(&mut self, tree: &ExprTree, origin: Point) -> Result<(), ArborError> {
        let span = HSpan::centered(origin.x(), self.half_span);
        let layout = self.engine.calculate(tree, span, origin)?;

        let mut scene = Scene::default();
        for (id, position) in layout.positions() {
            scene.labels.push(Label {
                text: tree.label(id),
                position,
            });
            scene.circles.push(position);
        }
        scene.edges = layout.edges().to_vec();

        debug!(
            labels = scene.labels.len(),
            edges = scene.edges.len();
            "Scene rebuilt",
        );

        // The swap is the teardown: the old scene drops here, after the
        // new one is fully materialized.
        self.scene = Some(scene);
        Ok(())
    }

    /// Discards the current visuals without drawing anything new.
    pub fn clear(&mut self) {
        self.scene = None;
    }

    /// Returns true if a scene is currently materialized.
    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    /// Returns the current labels, one per drawn node.
    pub fn labels(&self) -> &[Label] {
        self.scene.as_ref().map_or(&[], |s| s.labels.as_slice())
    }

    /// Returns the current circle coordinates.
    pub fn circles(&self) -> &[Point] {
        self.scene.as_ref().map_or(&[], |s| s.circles.as_slice())
    }

    /// Returns the current connection edges.
    pub fn edges(&self) -> &[(Point, Point)] {
        self.scene.as_ref().map_or(&[], |s| s.edges.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::tree::NodeKind;
    use arbor_parser::{ValidationMode, parse};

    use super::*;

    fn session() -> DrawingSession {
        DrawingSession::new(&LayoutConfig::default())
    }

    fn tree_of(source: &str) -> ExprTree {
        parse(source, ValidationMode::ContinueOnError).expect("valid input")
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = session();
        assert!(!session.has_scene());
        assert!(session.labels().is_empty());
        assert!(session.circles().is_empty());
        assert!(session.edges().is_empty());
    }

    #[test]
    fn test_rebuild_materializes_one_label_per_node() {
        let mut session = session();
        let tree = tree_of("a+b*c");

        session.rebuild(&tree, Point::default()).unwrap();

        assert!(session.has_scene());
        assert_eq!(session.labels().len(), tree.node_count());
        assert_eq!(session.circles().len(), tree.node_count());
        assert_eq!(session.edges().len(), tree.node_count() - 1);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut session = session();
        let tree = tree_of("a+b");
        let origin = Point::new(4.0, 2.0);

        session.rebuild(&tree, origin).unwrap();
        let first_labels = session.labels().to_vec();

        session.rebuild(&tree, origin).unwrap();

        // Same coordinates, and no accumulation of stale elements
        assert_eq!(session.labels(), first_labels.as_slice());
        assert_eq!(session.labels().len(), tree.node_count());
    }

    #[test]
    fn test_failed_rebuild_preserves_previous_scene() {
        let mut session = session();
        let tree = tree_of("a+b");
        session.rebuild(&tree, Point::default()).unwrap();
        let labels_before = session.labels().to_vec();

        // A rootless tree violates the layout precondition
        let mut broken = ExprTree::new();
        broken.push(NodeKind::Variable("x".to_string()));

        let result = session.rebuild(&broken, Point::default());
        assert!(matches!(result, Err(ArborError::Layout(_))));
        assert_eq!(session.labels(), labels_before.as_slice());
    }

    #[test]
    fn test_labels_carry_node_text() {
        let mut session = session();
        let tree = tree_of("a+b");
        session.rebuild(&tree, Point::default()).unwrap();

        let texts: Vec<&str> = session.labels().iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["+", "a", "b"]);
    }

    #[test]
    fn test_clear_discards_scene() {
        let mut session = session();
        let tree = tree_of("a");
        session.rebuild(&tree, Point::default()).unwrap();

        session.clear();
        assert!(!session.has_scene());
        assert!(session.labels().is_empty());
    }
}
