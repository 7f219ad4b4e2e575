//! Involute View - Base cone & spherical involute helicoid viewer
//!
//! Reads precomputed gear-tooth surface points from CSV, recovers the grid of the
//! base cone and renders the cone as a translucent mesh together with the helicoid
//! point cloud.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::VisualizerConfig;
pub use error::VisualizerError;
pub use pipeline::Visualizer;
