//! Involute View - Base cone & spherical involute helicoid viewer
//!
//! Usage: `involute_view [CONFIG.json]`

use anyhow::{bail, Context};
use involute_view::{logging, Visualizer, VisualizerConfig};

fn main() -> anyhow::Result<()> {
    logging::init(&["involute_view"]);

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => VisualizerConfig::load(&path)?,
        None => VisualizerConfig::default(),
    };
    if let Some(extra) = args.next() {
        bail!("Unexpected argument '{}'. Usage: involute_view [CONFIG.json]", extra);
    }

    let output = Visualizer::new(config)
        .run()
        .context("Visualization aborted")?;
    log::info!("Done: {}", output.display());

    Ok(())
}
