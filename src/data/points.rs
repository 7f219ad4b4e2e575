//! Surface point sets taken from the `x`, `y`, `z` columns of a table.

use super::loader::{ColumnTable, LoaderError};

/// Per-axis `(min, max)` of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

/// Index-aligned x/y/z coordinates, one point per CSV row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfacePoints {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl SurfacePoints {
    /// Build from index-aligned coordinate vectors of equal length.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self, LoaderError> {
        for (column, values) in [("y", &y), ("z", &z)] {
            if values.len() != x.len() {
                return Err(LoaderError::LengthMismatch {
                    column: column.to_string(),
                    expected: x.len(),
                    found: values.len(),
                });
            }
        }
        Ok(Self { x, y, z })
    }

    pub fn from_table(table: &ColumnTable) -> Result<Self, LoaderError> {
        Ok(Self {
            x: table.require("x")?.to_vec(),
            y: table.require("y")?.to_vec(),
            z: table.require("z")?.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.x
    }

    pub fn ys(&self) -> &[f64] {
        &self.y
    }

    pub fn zs(&self) -> &[f64] {
        &self.z
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| (x, y, z))
    }

    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.x, self.y, self.z)
    }

    /// Axis extents, `None` for an empty set.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.is_empty() {
            return None;
        }
        Some(Bounds {
            x: min_max(&self.x),
            y: min_max(&self.y),
            z: min_max(&self.z),
        })
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
