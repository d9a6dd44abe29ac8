//! Configuration types for Arbor tree rendering.
//!
//! This module provides configuration structures that control how trees
//! are validated, laid out and styled. All types implement
//! [`serde::Deserialize`] so they can be loaded from external sources
//! (the CLI reads them from TOML).
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Geometric constants for the layout engine.
//! - [`StyleConfig`] - Visual styling for the rendered tree.
//! - [`ValidationConfig`] - Error-handling behavior of the validation
//!   pipeline.

use serde::Deserialize;

use arbor_parser::ValidationMode;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Validation configuration section.
    #[serde(default)]
    validation: ValidationConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig, validation: ValidationConfig) -> Self {
        Self {
            layout,
            style,
            validation,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }
}

fn default_down_step() -> f32 {
    50.0
}

fn default_half_span() -> f32 {
    380.0
}

/// Geometric constants for the layout engine.
///
/// `down_step` is the vertical distance between a parent and its children;
/// `half_span` is half the horizontal interval handed to the root, centered
/// on the draw origin.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_down_step")]
    down_step: f32,

    #[serde(default = "default_half_span")]
    half_span: f32,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`] from explicit constants.
    pub fn new(down_step: f32, half_span: f32) -> Self {
        Self {
            down_step,
            half_span,
        }
    }

    /// Returns the vertical step between tree levels.
    pub fn down_step(&self) -> f32 {
        self.down_step
    }

    /// Returns half the root's horizontal interval width.
    pub fn half_span(&self) -> f32 {
        self.half_span
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            down_step: default_down_step(),
            half_span: default_half_span(),
        }
    }
}

fn default_node_radius() -> f32 {
    7.0
}

fn default_node_fill() -> String {
    "yellow".to_string()
}

fn default_edge_color() -> String {
    "black".to_string()
}

/// Visual styling for rendered trees.
///
/// Colors are passed through to SVG attributes as written.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_node_radius")]
    node_radius: f32,

    #[serde(default = "default_node_fill")]
    node_fill: String,

    #[serde(default = "default_edge_color")]
    edge_color: String,

    /// Optional background color; `None` leaves the canvas transparent.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Returns the node circle radius.
    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    /// Returns the node circle fill color.
    pub fn node_fill(&self) -> &str {
        &self.node_fill
    }

    /// Returns the edge stroke color.
    pub fn edge_color(&self) -> &str {
        &self.edge_color
    }

    /// Returns the background color, if one is configured.
    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            node_radius: default_node_radius(),
            node_fill: default_node_fill(),
            edge_color: default_edge_color(),
            background_color: None,
        }
    }
}

/// Error-handling behavior of the validation pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// Stop after the first failing stage instead of reporting everything.
    #[serde(default)]
    stop_on_first_error: bool,
}

impl ValidationConfig {
    /// Returns the [`ValidationMode`] this configuration selects.
    pub fn mode(&self) -> ValidationMode {
        if self.stop_on_first_error {
            ValidationMode::StopOnFirstError
        } else {
            ValidationMode::ContinueOnError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_drawing_constants() {
        let config = AppConfig::default();

        assert_eq!(config.layout().down_step(), 50.0);
        assert_eq!(config.layout().half_span(), 380.0);
        assert_eq!(config.style().node_radius(), 7.0);
        assert_eq!(config.style().node_fill(), "yellow");
        assert_eq!(config.style().edge_color(), "black");
        assert!(config.style().background_color().is_none());
        assert_eq!(config.validation().mode(), ValidationMode::ContinueOnError);
    }

    #[test]
    fn test_validation_mode_selection() {
        let config = ValidationConfig {
            stop_on_first_error: true,
        };
        assert_eq!(config.mode(), ValidationMode::StopOnFirstError);
    }
}
