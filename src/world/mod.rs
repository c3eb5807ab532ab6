//! World module - meshes fed to the pipeline
//!
//! Indexed triangle geometry plus RON loading and saving.

mod geometry;

pub use geometry::*;
