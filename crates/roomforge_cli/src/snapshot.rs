//! Per-step PNG snapshots of a generation run.

use std::path::{Path, PathBuf};

use roomforge_core::Grid;
use roomforge_gen::{GenerationObserver, Stage};
use tracing::{debug, warn};

use crate::error::ExportError;
use crate::export::save_png;

/// Writes `map0000.png`, `map0001.png`, ... into a directory, one per step.
pub struct SnapshotWriter {
    dir: PathBuf,
    cell_size: u32,
    written: usize,
    failed: usize,
}

impl SnapshotWriter {
    pub fn create(dir: impl Into<PathBuf>, cell_size: u32) -> Result<Self, ExportError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            cell_size,
            written: 0,
            failed: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of snapshots written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn next_path(&self) -> PathBuf {
        self.dir.join(format!("map{:04}.png", self.written + self.failed))
    }
}

impl GenerationObserver for SnapshotWriter {
    fn on_step(&mut self, stage: Stage, grid: &Grid) {
        let path = self.next_path();
        match save_png(grid, self.cell_size, &path) {
            Ok(()) => {
                debug!("{:?} snapshot {}", stage, path.display());
                self.written += 1;
            }
            Err(e) => {
                // a lost snapshot never aborts the run
                warn!("could not write snapshot {}: {}", path.display(), e);
                self.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::create(tmp.path().join("snaps"), 2).unwrap();
        let grid = Grid::from_rows(&["#=#"]).unwrap();

        writer.on_step(Stage::Entry, &grid);
        writer.on_step(Stage::Placement, &grid);

        assert_eq!(writer.written(), 2);
        assert!(writer.dir().join("map0000.png").exists());
        assert!(writer.dir().join("map0001.png").exists());
        assert!(!writer.dir().join("map0002.png").exists());
    }
}
