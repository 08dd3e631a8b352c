//! SVG figures for data overlays, posterior corner plots and sensitivity heatmaps.
#![deny(missing_docs)]

/// Posterior corner plots.
pub mod corner;
pub mod figures;
/// Sensitivity heatmaps.
pub mod heatmap;
/// Data and simulation overlays.
pub mod overlay;

use std::fs;
use std::path::Path;

use pure_core::errors::PureError;

pub use corner::render_corner_svg;
pub use figures::{render_histogram_svg, Curve, FigureConfig};
pub use heatmap::render_heatmap_svg;
pub use overlay::render_overlay_svg;

/// Writes a rendered figure, creating parent directories as needed.
pub fn write_svg(path: &Path, svg: &str) -> Result<(), PureError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| PureError::io("svg-mkdir", parent, err))?;
        }
    }
    fs::write(path, svg).map_err(|err| PureError::io("svg-write", path, err))
}
