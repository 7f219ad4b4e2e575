//! Charts module - 3D scene and rendering

mod renderer;
mod scene;

pub use renderer::{OutputFormat, RenderError, SceneRenderer};
#[cfg(test)]
pub(crate) use renderer::system_font_available;
pub use scene::{MarkerStyle, Scene, SceneSettings, Series, SurfaceStyle};
