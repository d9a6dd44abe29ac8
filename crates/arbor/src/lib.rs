//! Arbor - drawing arithmetic expressions as positioned trees.
//!
//! Expression text is scanned, validated, parsed into an arena tree,
//! restructured for display, laid out with recursive proportional
//! subdivision, and rendered to SVG.

pub mod config;
pub mod distribute;
pub mod export;
pub mod layout;
pub mod session;

mod error;

pub use arbor_core::{geometry, tree};

pub use error::ArborError;
pub use session::{DrawingSession, Label};

use log::{debug, info, trace};

use arbor_core::geometry::Point;
use arbor_core::tree::ExprTree;

use crate::config::AppConfig;

/// Builder for parsing and drawing Arbor expressions.
///
/// This is the composition root wiring raw text through scanning,
/// validation, tree building, distribution, layout and drawing.
///
/// # Examples
///
/// ```rust,no_run
/// use arbor::{SceneBuilder, config::AppConfig, geometry::Point};
///
/// let builder = SceneBuilder::new(AppConfig::default());
/// let mut session = builder.session();
///
/// // One draw request: populates the session or reports every problem
/// builder.draw(&mut session, "a+(b+c)*d", Point::default())
///     .expect("failed to draw");
///
/// let svg = builder.render_svg(&session)
///     .expect("failed to render");
/// println!("{svg}");
/// ```
#[derive(Default)]
pub struct SceneBuilder {
    config: AppConfig,
}

impl SceneBuilder {
    /// Create a new scene builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Create an empty drawing session configured like this builder.
    pub fn session(&self) -> DrawingSession {
        DrawingSession::new(self.config.layout())
    }

    /// Parse source text into a display-ready expression tree.
    ///
    /// Runs scanning, validation and tree building, then merges
    /// associative operator chains so repeated operations draw as one
    /// n-ary node.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Parse`] carrying every scanner and validation
    /// diagnostic when the expression is malformed; no tree is built in
    /// that case.
    pub fn parse(&self, source: &str) -> Result<ExprTree, ArborError> {
        info!("Parsing expression");

        let mut tree = arbor_parser::parse(source, self.config.validation().mode())
            .map_err(|err| ArborError::new_parse_error(err, source))?;
        debug!(nodes = tree.node_count(); "Expression parsed successfully");

        distribute::distribute(&mut tree)?;
        debug!(nodes = tree.node_count(); "Operator chains merged");
        trace!(tree:? = tree; "Display tree");

        Ok(tree)
    }

    /// Process one draw request: parse `source` and rebuild `session`
    /// with the tree rooted at `origin`.
    ///
    /// # Errors
    ///
    /// On any failure the session keeps its previous visual state; a
    /// malformed expression reports all of its problems at once via
    /// [`ArborError::Parse`].
    pub fn draw(
        &self,
        session: &mut DrawingSession,
        source: &str,
        origin: Point,
    ) -> Result<(), ArborError> {
        let tree = self.parse(source)?;

        info!("Rebuilding drawing session");
        session.rebuild(&tree, origin)?;
        debug!(labels = session.labels().len(); "Session populated");

        Ok(())
    }

    /// Render the session's current scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Export`] when the session has no scene.
    pub fn render_svg(&self, session: &DrawingSession) -> Result<String, ArborError> {
        let document = export::svg::render_document(session, self.config.style())?;
        Ok(document.to_string())
    }
}
