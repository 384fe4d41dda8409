//! Chart rendering on top of the trajectory core: static PNG charts, PNG
//! frame sequences and animated GIFs, all drawn with plotters.

pub mod animate;
pub mod config;
pub mod render;
pub mod spectrum;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

pub use config::ChartConfig;
pub use render::{MAX_SERIES, Markers, PlottedSeries, TrajectorySeries};

/// `dir/stem-YYYYmmdd-HHMMSS.ext`
pub fn timestamped_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("{stem}-{stamp}.{extension}"))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamped_path_keeps_stem_and_extension() {
        let path = timestamped_path(Path::new("output"), "spectrum", "gif");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(path.starts_with("output"));
        assert!(name.starts_with("spectrum-"));
        assert!(name.ends_with(".gif"));
        // spectrum- + 15 stamp chars + .gif
        assert_eq!(name.len(), "spectrum-".len() + 15 + ".gif".len());
    }
}
