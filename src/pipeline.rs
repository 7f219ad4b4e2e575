//! Render driver: loads both datasets, builds the scene and renders it.

use crate::charts::{MarkerStyle, Scene, SceneRenderer, Series, SurfaceStyle};
use crate::config::VisualizerConfig;
use crate::data::{DataLoader, SurfaceGrid, SurfacePoints};
use crate::error::{Dataset, VisualizerError};
use std::path::{Path, PathBuf};

pub struct Visualizer {
    config: VisualizerConfig,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Load, render, and optionally open the image. Returns the image path.
    pub fn run(&self) -> Result<PathBuf, VisualizerError> {
        self.config.validate()?;

        let scene = self.build_scene()?;
        let output = self.config.output.clone();
        SceneRenderer::render(&scene, &output).map_err(|source| VisualizerError::Render {
            path: output.clone(),
            source,
        })?;

        if self.config.open_viewer {
            if let Err(e) = open::that(&output) {
                log::warn!("Could not open {} in a viewer: {}", output.display(), e);
            }
        }

        Ok(output)
    }

    /// Base cone as a translucent mesh, then the helicoid as a point cloud.
    pub fn build_scene(&self) -> Result<Scene, VisualizerError> {
        let mut scene = Scene::new(self.config.scene_settings());

        let cone_path = &self.config.cone_path;
        let cone = Self::load_points(Dataset::Cone, cone_path)?;
        let grid = SurfaceGrid::from_points(cone, self.config.cone_shape).map_err(|source| {
            VisualizerError::Grid {
                path: cone_path.clone(),
                source,
            }
        })?;
        let shape = grid.shape();
        log::info!(
            "{}: {} generatrix x {} theta",
            cone_path.display(),
            shape.rows,
            shape.cols
        );
        scene.add_surface(&self.config.cone_label, grid, SurfaceStyle::default());

        let helicoid_path = &self.config.helicoid_path;
        let helicoid = Self::load_points(Dataset::Helicoid, helicoid_path)?;
        log::info!("{}: {} points", helicoid_path.display(), helicoid.len());
        if let Some(b) = helicoid.bounds() {
            log::debug!(
                "Helicoid extents: x {:?}, y {:?}, z {:?}",
                b.x,
                b.y,
                b.z
            );
        }
        scene.add_scatter(&self.config.helicoid_label, helicoid, MarkerStyle::default());

        Self::warn_clipped(&scene);
        Ok(scene)
    }

    fn load_points(dataset: Dataset, path: &Path) -> Result<SurfacePoints, VisualizerError> {
        DataLoader::load_csv(path)
            .and_then(|table| SurfacePoints::from_table(&table))
            .map_err(|source| VisualizerError::Load {
                dataset,
                path: path.to_path_buf(),
                source,
            })
    }

    fn warn_clipped(scene: &Scene) {
        for series in scene.series() {
            let clipped = scene.clipped_points(series);
            if clipped > 0 {
                let total = match series {
                    Series::Surface { grid, .. } => grid.z.as_flat().len(),
                    Series::Scatter { points, .. } => points.len(),
                };
                log::warn!(
                    "{}: {} of {} points lie outside the axis bounds",
                    series.label(),
                    clipped,
                    total
                );
            }
        }
    }
}
