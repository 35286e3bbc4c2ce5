//! Read-only hook into a generation run

use roomforge_core::Grid;

/// The step of a generation run that just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The entry door was stamped onto the map.
    Entry,
    /// One frontier socket was processed (a room was placed or the socket rejected).
    Placement,
    /// Unresolved cells were turned into walls.
    WallFill,
    /// Entrance and exit markers were stamped.
    Markers,
    /// One full cleanup pass finished.
    Cleanup,
    /// One decoration rule finished.
    Decoration,
}

/// Receives a snapshot of the map after every step.
///
/// Observers only ever get a shared reference; nothing they do can change
/// what the generator places.
pub trait GenerationObserver {
    fn on_step(&mut self, stage: Stage, grid: &Grid);
}

/// Observer that ignores every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {
    fn on_step(&mut self, _stage: Stage, _grid: &Grid) {}
}
