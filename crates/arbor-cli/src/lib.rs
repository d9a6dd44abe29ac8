//! CLI logic for the Arbor expression drawing tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use arbor::{
    ArborError, SceneBuilder,
    export::{Exporter, svg::SvgExporter},
    geometry::Point,
};

/// Run the Arbor CLI application
///
/// Reads the expression file, processes it through the drawing pipeline
/// and writes the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ArborError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scanning and validation errors (the full diagnostic batch)
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), ArborError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing expression"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let style = app_config.style().clone();

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process the expression using the SceneBuilder API
    let builder = SceneBuilder::new(app_config);
    let mut session = builder.session();
    builder.draw(
        &mut session,
        &source,
        Point::new(args.origin_x, args.origin_y),
    )?;

    // Write output file
    let exporter = SvgExporter::new(&args.output).with_style(&style);
    exporter.export_session(&session)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
