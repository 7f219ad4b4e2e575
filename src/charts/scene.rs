//! Scene Module
//! The 3D scene handed from the driver to the renderer: presentation settings plus
//! an ordered list of series. Nothing here touches a drawing backend.

use crate::data::{SurfaceGrid, SurfacePoints};
use plotters::style::RGBColor;
use std::ops::Range;

/// Base cone fill (cyan)
pub const CONE_FILL: RGBColor = RGBColor(0, 191, 191);
/// Base cone mesh edges
pub const CONE_EDGE: RGBColor = RGBColor(0, 0, 0);
/// Helicoid points (green)
pub const HELICOID_COLOR: RGBColor = RGBColor(0, 128, 0);

/// Title, labels, bounds and camera of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub z_range: Range<f64>,
    pub width: u32,
    pub height: u32,
    pub pitch: f64,
    pub yaw: f64,
    pub scale: f64,
    pub legend: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            title: "Spherical involute helicoid".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            z_label: "z".to_string(),
            x_range: -20.0..20.0,
            y_range: -20.0..20.0,
            z_range: -20.0..0.0,
            width: 800,
            height: 800,
            pitch: 0.3,
            yaw: 0.7,
            scale: 0.8,
            legend: true,
        }
    }
}

impl SceneSettings {
    /// True when the point lies inside all three axis ranges (inclusive).
    pub fn contains(&self, (x, y, z): (f64, f64, f64)) -> bool {
        let inside = |r: &Range<f64>, v: f64| v >= r.start && v <= r.end;
        inside(&self.x_range, x) && inside(&self.y_range, y) && inside(&self.z_range, z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub fill: RGBColor,
    pub alpha: f64,
    pub edge: RGBColor,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            fill: CONE_FILL,
            alpha: 0.3,
            edge: CONE_EDGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub color: RGBColor,
    pub size: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: HELICOID_COLOR,
            size: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Series {
    /// Translucent mesh through a grid of points.
    Surface {
        label: String,
        grid: SurfaceGrid,
        style: SurfaceStyle,
    },
    /// Unstructured point cloud.
    Scatter {
        label: String,
        points: SurfacePoints,
        style: MarkerStyle,
    },
}

impl Series {
    pub fn label(&self) -> &str {
        match self {
            Series::Surface { label, .. } | Series::Scatter { label, .. } => label,
        }
    }

    /// Every vertex of the series, in data coordinates.
    pub fn points(&self) -> Box<dyn Iterator<Item = (f64, f64, f64)> + '_> {
        match self {
            Series::Surface { grid, .. } => Box::new(grid.row_lines().into_iter().flatten()),
            Series::Scatter { points, .. } => Box::new(points.iter()),
        }
    }
}

/// A scene owned by the caller and passed explicitly to the renderer.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    settings: SceneSettings,
    series: Vec<Series>,
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            series: Vec::new(),
        }
    }

    pub fn add_surface(&mut self, label: impl Into<String>, grid: SurfaceGrid, style: SurfaceStyle) {
        self.series.push(Series::Surface {
            label: label.into(),
            grid,
            style,
        });
    }

    pub fn add_scatter(
        &mut self,
        label: impl Into<String>,
        points: SurfacePoints,
        style: MarkerStyle,
    ) {
        self.series.push(Series::Scatter {
            label: label.into(),
            points,
            style,
        });
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Number of vertices of `series` that fall outside the axis bounds.
    pub fn clipped_points(&self, series: &Series) -> usize {
        series
            .points()
            .filter(|&p| !self.settings.contains(p))
            .count()
    }
}
