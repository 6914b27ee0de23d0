//! Output side of the pipeline: bar charts, text dumps, optional viewer.

pub mod chart;
pub mod dump;

pub use chart::{BarSeries, render_grouped_bars};
pub use dump::dump_tables;

use std::path::Path;
use std::process::Command;

#[cfg(target_os = "macos")]
const VIEWER: &str = "open";
#[cfg(target_os = "windows")]
const VIEWER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const VIEWER: &str = "xdg-open";

/// Best-effort display of a rendered chart in the platform image viewer.
/// Failure to launch is reported, never fatal.
pub fn show_image(path: &Path) {
    match Command::new(VIEWER).arg(path).spawn() {
        Ok(_) => tracing::debug!("opened {} with {VIEWER}", path.display()),
        Err(err) => tracing::warn!("cannot open {} with {VIEWER}: {err}", path.display()),
    }
}
