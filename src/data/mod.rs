//! Data module - CSV loading and cone grid reshaping

mod grid;
mod loader;
mod points;

pub use grid::{infer_theta_split, Grid, GridError, GridShape, GridWarning, SurfaceGrid};
pub use loader::{ColumnTable, DataLoader, LoaderError};
pub use points::{Bounds, SurfacePoints};
