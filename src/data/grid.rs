//! Grid Inference Module
//! Recovers the (generatrix × theta) grid of the base cone from flat CSV rows.
//!
//! The cone rows are written generatrix-outer, theta-inner. The theta count is
//! found by counting how many leading rows share the first row's z value; the
//! heuristic can be bypassed with an explicit [`GridShape`].

use super::points::SurfacePoints;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("No rows to build a grid from")]
    Empty,
    #[error("{len} rows is not a multiple of the inferred theta split {theta_split}")]
    ShapeMismatch { len: usize, theta_split: usize },
    #[error("Grid shape {rows}x{cols} does not match {len} rows")]
    OverrideMismatch { rows: usize, cols: usize, len: usize },
    #[error("Grid shape {rows}x{cols} has a zero dimension")]
    ZeroDimension { rows: usize, cols: usize },
}

/// Something suspicious about an inferred grid that does not stop rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridWarning {
    /// Every row has the same z, so the whole set became a single generatrix row.
    Degenerate { len: usize },
}

impl std::fmt::Display for GridWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridWarning::Degenerate { len } => write!(
                f,
                "all {} rows share the same z value; treating them as a 1x{} grid",
                len, len
            ),
        }
    }
}

/// `rows` = generatrix split, `cols` = theta split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// `rows * cols`, or `None` when the product overflows.
    pub fn cell_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Infer the shape from the z column.
    pub fn infer(z: &[f64]) -> Result<(Self, Option<GridWarning>), GridError> {
        let theta_split = infer_theta_split(z)?;
        let len = z.len();

        if len % theta_split != 0 {
            return Err(GridError::ShapeMismatch { len, theta_split });
        }

        let shape = Self::new(len / theta_split, theta_split);
        let warning = (theta_split == len).then_some(GridWarning::Degenerate { len });
        Ok((shape, warning))
    }

    fn check(&self, len: usize) -> Result<(), GridError> {
        if self.is_empty() {
            return Err(GridError::ZeroDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        match self.cell_count() {
            Some(cells) if cells == len => Ok(()),
            _ => Err(GridError::OverrideMismatch {
                rows: self.rows,
                cols: self.cols,
                len,
            }),
        }
    }
}

/// Number of leading rows whose z equals the first row's z (exact comparison).
pub fn infer_theta_split(z: &[f64]) -> Result<usize, GridError> {
    let (&first_z, rest) = z.split_first().ok_or(GridError::Empty)?;
    Ok(1 + rest.iter().take_while(|&&v| v == first_z).count())
}

/// Row-major 2D array.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: GridShape,
    data: Vec<f64>,
}

impl Grid {
    /// Reshape without copying; `values.len()` must equal the shape's cell count.
    pub fn from_flat(values: Vec<f64>, shape: GridShape) -> Result<Self, GridError> {
        shape.check(values.len())?;
        Ok(Self {
            shape,
            data: values,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.shape.rows && col < self.shape.cols {
            self.data.get(row * self.shape.cols + col).copied()
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.shape.rows {
            return None;
        }
        let start = row * self.shape.cols;
        Some(&self.data[start..start + self.shape.cols])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.shape.cols)
    }

    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }
}

/// x/y/z grids of the same shape, ready for mesh rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    pub x: Grid,
    pub y: Grid,
    pub z: Grid,
    pub warning: Option<GridWarning>,
}

impl SurfaceGrid {
    /// Reshape the points using `shape`, or infer it from z when `None`.
    pub fn from_points(points: SurfacePoints, shape: Option<GridShape>) -> Result<Self, GridError> {
        let (shape, warning) = match shape {
            Some(shape) => {
                shape.check(points.len())?;
                (shape, None)
            }
            None => GridShape::infer(points.zs())?,
        };

        if let Some(warning) = &warning {
            log::warn!("Degenerate cone grid: {}", warning);
        }
        log::debug!(
            "Cone grid: generatrix_split={}, theta_split={}",
            shape.rows,
            shape.cols
        );

        let (x, y, z) = points.into_parts();
        Ok(Self {
            x: Grid::from_flat(x, shape)?,
            y: Grid::from_flat(y, shape)?,
            z: Grid::from_flat(z, shape)?,
            warning,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.z.shape()
    }

    pub fn point(&self, row: usize, col: usize) -> Option<(f64, f64, f64)> {
        Some((
            self.x.get(row, col)?,
            self.y.get(row, col)?,
            self.z.get(row, col)?,
        ))
    }

    /// One polyline per generatrix row.
    pub fn row_lines(&self) -> Vec<Vec<(f64, f64, f64)>> {
        let shape = self.shape();
        (0..shape.rows)
            .map(|r| (0..shape.cols).filter_map(|c| self.point(r, c)).collect())
            .collect()
    }

    /// Cell faces `[(r,c), (r,c+1), (r+1,c+1), (r+1,c)]`; empty for a single row or column.
    pub fn quads(&self) -> Vec<[(f64, f64, f64); 4]> {
        let shape = self.shape();
        let mut quads = Vec::new();
        for r in 0..shape.rows.saturating_sub(1) {
            for c in 0..shape.cols.saturating_sub(1) {
                if let (Some(a), Some(b), Some(d), Some(e)) = (
                    self.point(r, c),
                    self.point(r, c + 1),
                    self.point(r + 1, c + 1),
                    self.point(r + 1, c),
                ) {
                    quads.push([a, b, d, e]);
                }
            }
        }
        quads
    }
}
