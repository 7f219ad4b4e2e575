//! Logging setup.
//!
//! Logs go through the [`log`] facade and are printed by [`env_logger`]. The default
//! level is `info` for debug builds and `warn` for release builds, restricted to the
//! given crates. Setting `RUST_LOG` overrides it:
//!
//! ```sh
//! $> RUST_LOG=involute_view=debug involute_view
//! ```

use log::LevelFilter;

/// Install the global logger. Later calls are ignored.
pub fn init(crates: &[&str]) {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let filter = default_filter(crates, level);

    // Env::default() reads RUST_LOG and only falls back to our filter when unset.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .try_init();
}

/// `crate=level` directives joined with commas, the same syntax as `RUST_LOG`.
fn default_filter(crates: &[&str], level: LevelFilter) -> String {
    let level = level.as_str().to_ascii_lowercase();
    crates
        .iter()
        .map(|name| format!("{}={}", name, level))
        .collect::<Vec<_>>()
        .join(",")
}
