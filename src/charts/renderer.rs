//! Static Scene Renderer
//! Draws a [`Scene`] with plotters into a PNG or SVG file.
//!
//! Layout:
//! 1. Title centered on top
//! 2. 3D cartesian axes with fixed bounds; the data z axis is the vertical axis
//! 3. Surface series as translucent quads painted back to front, with mesh edges
//! 4. Scatter series as small filled circles
//! 5. Legend in the upper left corner

use super::scene::{MarkerStyle, Scene, SceneSettings, Series, SurfaceStyle};
use crate::data::SurfaceGrid;
use plotters::coord::cartesian::Cartesian3d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unsupported output format '{0}' (expected .png or .svg)")]
    UnsupportedFormat(String),
    #[error("Invalid {axis} axis bounds {start}..{end}")]
    InvalidBounds {
        axis: &'static str,
        start: f64,
        end: f64,
    },
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

/// Output artifact kind, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            _ => Err(RenderError::UnsupportedFormat(ext)),
        }
    }
}

type Coord3d = Cartesian3d<RangedCoordf64, RangedCoordf64, RangedCoordf64>;

const TITLE_FONT_SIZE: f64 = 20.0;
const AXIS_LABEL_FONT_SIZE: f64 = 14.0;

/// Swap data (x, y, z) into chart (x, vertical, depth).
fn to_chart((x, y, z): (f64, f64, f64)) -> (f64, f64, f64) {
    (x, z, y)
}

/// Quads in chart coordinates, farthest from the camera first.
///
/// plotters has no depth buffer, so translucent faces must be painted in this
/// order for nearer faces to cover farther ones.
fn back_to_front(coord: &Coord3d, quads: Vec<[(f64, f64, f64); 4]>) -> Vec<[(f64, f64, f64); 4]> {
    let mut faces: Vec<(i32, [(f64, f64, f64); 4])> = quads
        .into_iter()
        .map(|quad| {
            let quad = quad.map(to_chart);
            let depth = quad
                .iter()
                .map(|(x, y, z)| coord.projected_depth(x, y, z))
                .sum::<i32>();
            (depth, quad)
        })
        .collect();
    faces.sort_by_key(|&(depth, _)| std::cmp::Reverse(depth));
    faces.into_iter().map(|(_, quad)| quad).collect()
}

/// Whether plotters can lay out text with the system sans-serif font.
#[cfg(test)]
pub(crate) fn system_font_available() -> bool {
    FontDesc::new(FontFamily::SansSerif, AXIS_LABEL_FONT_SIZE, FontStyle::Normal)
        .box_size("x")
        .is_ok()
}

pub struct SceneRenderer;

impl SceneRenderer {
    /// Render `scene` to `path`; the backend is chosen by the extension.
    pub fn render(scene: &Scene, path: &Path) -> Result<(), RenderError> {
        let settings = scene.settings();
        Self::check_bounds(settings)?;
        let size = (settings.width, settings.height);

        let result = match OutputFormat::from_path(path)? {
            OutputFormat::Png => Self::draw(BitMapBackend::new(path, size).into_drawing_area(), scene),
            OutputFormat::Svg => Self::draw(SVGBackend::new(path, size).into_drawing_area(), scene),
        };
        result.map_err(|e| RenderError::Drawing(e.to_string()))?;

        log::info!("Rendered {} series to {}", scene.series().len(), path.display());
        Ok(())
    }

    fn check_bounds(settings: &SceneSettings) -> Result<(), RenderError> {
        let axes: [(&'static str, &Range<f64>); 3] = [
            ("x", &settings.x_range),
            ("y", &settings.y_range),
            ("z", &settings.z_range),
        ];
        for (axis, range) in axes {
            if !range.start.is_finite() || !range.end.is_finite() || range.start >= range.end {
                return Err(RenderError::InvalidBounds {
                    axis,
                    start: range.start,
                    end: range.end,
                });
            }
        }
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: DrawingArea<DB, Shift>,
        scene: &Scene,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB::ErrorType: 'static,
    {
        let settings = scene.settings();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                &settings.title,
                FontDesc::new(FontFamily::SansSerif, TITLE_FONT_SIZE, FontStyle::Normal),
            )
            .margin(20)
            .build_cartesian_3d(
                settings.x_range.clone(),
                settings.z_range.clone(),
                settings.y_range.clone(),
            )?;

        let (pitch, yaw, scale) = (settings.pitch, settings.yaw, settings.scale);
        chart.with_projection(|mut pb| {
            pb.pitch = pitch;
            pb.yaw = yaw;
            pb.scale = scale;
            pb.into_matrix()
        });

        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .draw()?;

        Self::draw_axis_labels(&mut chart, settings)?;

        for series in scene.series() {
            match series {
                Series::Surface { label, grid, style } => {
                    Self::draw_surface(&mut chart, label, grid, style)?
                }
                Series::Scatter {
                    label,
                    points,
                    style,
                } => Self::draw_scatter(&mut chart, label, points.iter(), style)?,
            }
        }

        if settings.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }

    /// Axis names next to the middle of each axis.
    fn draw_axis_labels<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Coord3d>,
        settings: &SceneSettings,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB::ErrorType: 'static,
    {
        let (x, y, z) = (&settings.x_range, &settings.y_range, &settings.z_range);
        let mid = |r: &Range<f64>| (r.start + r.end) / 2.0;
        let style = FontDesc::new(FontFamily::SansSerif, AXIS_LABEL_FONT_SIZE, FontStyle::Normal)
            .color(&BLACK);

        let labels = [
            (&settings.x_label, (mid(x), y.start, z.start)),
            (&settings.y_label, (x.end, mid(y), z.start)),
            (&settings.z_label, (x.start, y.start, mid(z))),
        ];
        chart.draw_series(
            labels
                .into_iter()
                .map(|(text, at)| Text::new(text.clone(), to_chart(at), style.clone())),
        )?;
        Ok(())
    }

    fn draw_surface<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Coord3d>,
        label: &str,
        grid: &SurfaceGrid,
        style: &SurfaceStyle,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB::ErrorType: 'static,
    {
        let fill = style.fill.mix(style.alpha).filled();
        let edge = ShapeStyle::from(&style.edge).stroke_width(1);

        let faces = back_to_front(chart.as_coord_spec(), grid.quads());
        chart
            .draw_series(
                faces
                    .into_iter()
                    .map(|quad| Polygon::new(quad.to_vec(), fill)),
            )?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill));

        // Mesh edges: generatrix rows, then theta columns.
        let shape = grid.shape();
        let rows = grid.row_lines();
        let cols: Vec<Vec<(f64, f64, f64)>> = (0..shape.cols)
            .map(|c| (0..shape.rows).filter_map(|r| grid.point(r, c)).collect())
            .collect();
        chart.draw_series(
            rows.into_iter()
                .chain(cols)
                .filter(|line| line.len() > 1)
                .map(|line| PathElement::new(line.into_iter().map(to_chart).collect::<Vec<_>>(), edge)),
        )?;

        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Coord3d>,
        label: &str,
        points: impl Iterator<Item = (f64, f64, f64)>,
        style: &MarkerStyle,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB::ErrorType: 'static,
    {
        let marker = style.color.filled();
        let size = style.size;

        chart
            .draw_series(points.map(|p| Circle::new(to_chart(p), size, marker)))?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 5, y), 3, marker));

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::data::SurfacePoints;
    use tempfile::tempdir;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new(SceneSettings::default());
        let cone = SurfacePoints::new(
            vec![0.0, 5.0, 0.0, 10.0],
            vec![5.0, 0.0, 10.0, 0.0],
            vec![-5.0, -5.0, -10.0, -10.0],
        )
        .unwrap();
        scene.add_surface(
            "Base cone",
            SurfaceGrid::from_points(cone, None).unwrap(),
            SurfaceStyle::default(),
        );
        scene.add_scatter(
            "Spherical involute helicoid",
            SurfacePoints::new(vec![1.0, 2.0], vec![1.0, 2.0], vec![-1.0, -2.0]).unwrap(),
            MarkerStyle::default(),
        );
        scene
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out.png")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("dir/out.SVG")).unwrap(),
            OutputFormat::Svg
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("out.jpg")),
            Err(RenderError::UnsupportedFormat(ref e)) if e == "jpg"
        ));
        assert!(OutputFormat::from_path(Path::new("noextension")).is_err());
    }

    #[test]
    fn test_inverted_bounds_are_rejected_before_drawing() {
        let dir = tempdir().unwrap();
        let settings = SceneSettings {
            z_range: 0.0..-20.0,
            ..SceneSettings::default()
        };
        let path = dir.path().join("out.svg");

        let err = SceneRenderer::render(&Scene::new(settings), &path).unwrap_err();

        assert!(matches!(err, RenderError::InvalidBounds { axis: "z", .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bmp");

        let err = SceneRenderer::render(&sample_scene(), &path).unwrap_err();

        assert!(matches!(err, RenderError::UnsupportedFormat(_)));
    }

    fn default_coord() -> Coord3d {
        let settings = SceneSettings::default();
        Coord3d::with_projection(
            settings.x_range,
            settings.z_range,
            settings.y_range,
            (0..800, 0..800),
            |mut pb| {
                pb.pitch = settings.pitch;
                pb.yaw = settings.yaw;
                pb.scale = settings.scale;
                pb.into_matrix()
            },
        )
    }

    fn square_at(y: f64) -> [(f64, f64, f64); 4] {
        [
            (-5.0, y, -5.0),
            (5.0, y, -5.0),
            (5.0, y, -15.0),
            (-5.0, y, -15.0),
        ]
    }

    #[test]
    fn test_quads_are_painted_back_to_front() {
        let coord = default_coord();
        let depth_of = |quad: &[(f64, f64, f64); 4]| -> i32 {
            quad.iter()
                .map(|(x, y, z)| coord.projected_depth(x, y, z))
                .sum()
        };
        let quads: Vec<_> = [-15.0, 15.0, 0.0, -5.0, 10.0]
            .into_iter()
            .map(square_at)
            .collect();

        let sorted = back_to_front(&coord, quads.clone());

        assert_eq!(sorted.len(), quads.len());
        let depths: Vec<i32> = sorted.iter().map(depth_of).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]), "{depths:?}");
        // The two outermost slabs along y must end up first and last.
        let ends = [sorted[0], sorted[sorted.len() - 1]];
        for y in [-15.0, 15.0] {
            let expected = square_at(y).map(to_chart);
            assert!(ends.contains(&expected), "slab at y={y} not at an end");
        }
    }

    #[test]
    fn test_render_svg_contains_legend_labels() {
        if !system_font_available() {
            return;
        }
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.svg");

        SceneRenderer::render(&sample_scene(), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Base cone"));
        assert!(svg.contains("Spherical involute helicoid"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_render_png_writes_file() {
        if !system_font_available() {
            return;
        }
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.png");

        SceneRenderer::render(&sample_scene(), &path).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
