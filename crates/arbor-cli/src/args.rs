//! Command-line argument definitions for the Arbor CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration
//! file selection, the draw origin, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Arbor expression drawing tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input expression file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// X coordinate the tree root is drawn at
    #[arg(long, default_value_t = 0.0)]
    pub origin_x: f32,

    /// Y coordinate the tree root is drawn at
    #[arg(long, default_value_t = 0.0)]
    pub origin_y: f32,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
