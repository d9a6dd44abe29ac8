//! SVG rendering of a drawing session.
//!
//! Edges are drawn first, then node circles, then labels, so text always
//! sits on top of the geometry.

use std::{fs::File, io::Write};

use log::{error, info};
use svg::Document;
use svg::node::element as svg_element;

use arbor_core::geometry::Point;

use crate::{
    config::StyleConfig,
    export::{Error, Exporter},
    session::DrawingSession,
};

/// Whitespace kept around the drawn tree.
const MARGIN: f32 = 50.0;

/// Builds an SVG document from the session's current scene.
///
/// # Errors
///
/// Returns a render error when the session has no materialized scene.
pub fn render_document(session: &DrawingSession, style: &StyleConfig) -> Result<Document, Error> {
    if !session.has_scene() {
        return Err(Error::Render("no scene has been drawn".to_string()));
    }

    let (min, max) = scene_bounds(session.circles(), style.node_radius());
    let width = max.x() - min.x() + 2.0 * MARGIN;
    let height = max.y() - min.y() + 2.0 * MARGIN;

    let mut document = Document::new().set(
        "viewBox",
        format!(
            "{} {} {} {}",
            min.x() - MARGIN,
            min.y() - MARGIN,
            width,
            height
        ),
    );

    if let Some(background) = style.background_color() {
        document = document.add(
            svg_element::Rectangle::new()
                .set("x", min.x() - MARGIN)
                .set("y", min.y() - MARGIN)
                .set("width", width)
                .set("height", height)
                .set("fill", background.to_string()),
        );
    }

    for (from, to) in session.edges() {
        document = document.add(
            svg_element::Line::new()
                .set("x1", from.x())
                .set("y1", from.y())
                .set("x2", to.x())
                .set("y2", to.y())
                .set("stroke", style.edge_color().to_string()),
        );
    }

    for &center in session.circles() {
        document = document.add(
            svg_element::Circle::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("r", style.node_radius())
                .set("fill", style.node_fill().to_string())
                .set("stroke", style.edge_color().to_string()),
        );
    }

    for label in session.labels() {
        let at = label.position();
        document = document.add(
            svg_element::Text::new(label.text())
                .set("x", at.x() + style.node_radius() + 2.0)
                .set("y", at.y() + 4.0),
        );
    }

    Ok(document)
}

/// Bounding box of the circle centers, padded by the node radius.
fn scene_bounds(circles: &[Point], radius: f32) -> (Point, Point) {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    for point in circles {
        min_x = min_x.min(point.x() - radius);
        min_y = min_y.min(point.y() - radius);
        max_x = max_x.max(point.x() + radius);
        max_y = max_y.max(point.y() + radius);
    }

    (Point::new(min_x, min_y), Point::new(max_x, max_y))
}

/// Exporter that writes the rendered document to a file.
pub struct SvgExporter {
    file_name: String,
    style: StyleConfig,
}

impl SvgExporter {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            style: StyleConfig::default(),
        }
    }

    /// Sets the style used for rendering (builder style).
    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Writes an SVG document to the configured file
    fn write_document(&self, document: Document) -> Result<(), Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let file = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(Error::Io(err));
            }
        };

        if let Err(err) = write!(&file, "{document}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(Error::Io(err));
        }

        Ok(())
    }
}

impl Exporter for SvgExporter {
    fn export_session(&self, session: &DrawingSession) -> Result<(), Error> {
        let document = render_document(session, &self.style)?;
        self.write_document(document)
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::geometry::Point;
    use arbor_parser::{ValidationMode, parse};

    use crate::config::LayoutConfig;

    use super::*;

    fn drawn_session(source: &str) -> DrawingSession {
        let tree = parse(source, ValidationMode::ContinueOnError).expect("valid input");
        let mut session = DrawingSession::new(&LayoutConfig::default());
        session.rebuild(&tree, Point::default()).unwrap();
        session
    }

    #[test]
    fn test_render_contains_all_elements() {
        let session = drawn_session("a+b");
        let rendered = render_document(&session, &StyleConfig::default())
            .unwrap()
            .to_string();

        assert_eq!(rendered.matches("<circle").count(), 3);
        assert_eq!(rendered.matches("<line").count(), 2);
        assert_eq!(rendered.matches("<text").count(), 3);
        assert!(rendered.contains("fill=\"yellow\""));
        assert!(rendered.contains("stroke=\"black\""));
    }

    #[test]
    fn test_render_empty_session_fails() {
        let session = DrawingSession::new(&LayoutConfig::default());
        assert!(render_document(&session, &StyleConfig::default()).is_err());
    }

    #[test]
    fn test_background_rectangle_is_optional() {
        let session = drawn_session("x");
        let rendered = render_document(&session, &StyleConfig::default())
            .unwrap()
            .to_string();
        assert!(!rendered.contains("<rect"));
    }
}
