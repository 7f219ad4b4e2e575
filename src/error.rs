//! Top-level error for a viewer run.

use crate::charts::RenderError;
use crate::config::ConfigError;
use crate::data::{GridError, LoaderError};
use std::path::PathBuf;
use thiserror::Error;

/// Which input a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Cone,
    Helicoid,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Cone => write!(f, "base cone"),
            Dataset::Helicoid => write!(f, "helicoid"),
        }
    }
}

#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Loading {dataset} data from {path} failed")]
    Load {
        dataset: Dataset,
        path: PathBuf,
        #[source]
        source: LoaderError,
    },
    #[error("Cannot build the cone grid from {path}")]
    Grid {
        path: PathBuf,
        #[source]
        source: GridError,
    },
    #[error("Rendering {path} failed")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
}
