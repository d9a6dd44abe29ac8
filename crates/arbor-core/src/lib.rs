//! Arbor Core Types and Definitions
//!
//! This crate provides the foundational types for the Arbor expression
//! visualizer. It includes:
//!
//! - **Geometry**: basic geometric types ([`geometry`] module)
//! - **Tree**: the arena-backed expression tree ([`tree`] module)

pub mod geometry;
pub mod tree;
