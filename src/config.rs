//! Viewer configuration.
//!
//! Every field defaults to the values the viewer has always used, so an empty JSON
//! object (or no config file at all) reproduces the default figure. A partial file
//! only overrides the fields it names:
//!
//! ```json
//! { "cone_path": "data/cone.csv", "z_range": [-30.0, 0.0], "open_viewer": false }
//! ```

use crate::charts::SceneSettings;
use crate::data::GridShape;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub cone_path: PathBuf,
    pub helicoid_path: PathBuf,
    /// `.png` or `.svg`
    pub output: PathBuf,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub z_range: [f64; 2],
    pub width: u32,
    pub height: u32,
    pub pitch: f64,
    pub yaw: f64,
    pub scale: f64,
    /// Explicit (generatrix, theta) shape of the cone; inferred from z when absent.
    pub cone_shape: Option<GridShape>,
    pub cone_label: String,
    pub helicoid_label: String,
    pub open_viewer: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            cone_path: PathBuf::from("./base_cone_surface.csv"),
            helicoid_path: PathBuf::from("./tooth_surface.csv"),
            output: PathBuf::from("./involute_view.png"),
            title: "Spherical involute helicoid".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            z_label: "z".to_string(),
            x_range: [-20.0, 20.0],
            y_range: [-20.0, 20.0],
            z_range: [-20.0, 0.0],
            width: 800,
            height: 800,
            pitch: 0.3,
            yaw: 0.7,
            scale: 0.8,
            cone_shape: None,
            cone_label: "Base cone".to_string(),
            helicoid_label: "Spherical involute helicoid".to_string(),
            open_viewer: true,
        }
    }
}

impl VisualizerConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, [lo, hi]) in [
            ("x_range", self.x_range),
            ("y_range", self.y_range),
            ("z_range", self.z_range),
        ] {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite with min < max, got [{}, {}]",
                    axis, lo, hi
                )));
            }
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(shape) = self.cone_shape {
            if shape.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "cone_shape must be non-zero, got {}x{}",
                    shape.rows, shape.cols
                )));
            }
            if shape.cell_count().is_none() {
                return Err(ConfigError::Invalid(format!(
                    "cone_shape {}x{} overflows the cell count",
                    shape.rows, shape.cols
                )));
            }
        }
        Ok(())
    }

    pub fn scene_settings(&self) -> SceneSettings {
        SceneSettings {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            z_label: self.z_label.clone(),
            x_range: self.x_range[0]..self.x_range[1],
            y_range: self.y_range[0]..self.y_range[1],
            z_range: self.z_range[0]..self.z_range[1],
            width: self.width,
            height: self.height,
            pitch: self.pitch,
            yaw: self.yaw,
            scale: self.scale,
            legend: true,
        }
    }
}
