//! Row-major symbol grid shared by templates and maps

use serde::{Deserialize, Serialize};
use std::fmt;

/// The wildcard symbol: "unconstrained" in a pattern, "unresolved" on a map.
pub const WILDCARD: char = '?';

/// Integer grid coordinate. Offsets may be negative while a placement is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate this position by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A fixed-size rectangle of symbols.
///
/// Cells are stored in a flat buffer, row by row: the cell at `(x, y)` lives at
/// index `y * width + x`. The size never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<char>,
}

impl Grid {
    /// Create a grid filled with [`WILDCARD`].
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, WILDCARD)
    }

    /// Create a grid with every cell set to `symbol`.
    pub fn filled(width: u32, height: u32, symbol: char) -> Self {
        Self {
            width,
            height,
            cells: vec![symbol; (width * height) as usize],
        }
    }

    /// Build a grid from text rows. All rows must have the same number of symbols.
    ///
    /// Returns `None` for ragged input.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let width = rows
            .first()
            .map(|r| r.as_ref().chars().count())
            .unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            let before = cells.len();
            cells.extend(row.as_ref().chars());
            if cells.len() - before != width {
                return None;
            }
        }
        Some(Self {
            width: width as u32,
            height: rows.len() as u32,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells (`width * height`).
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Raw row-major cell buffer.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Check that a position is inside the grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Get the symbol at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        if self.contains(x, y) {
            Some(self.cells[self.index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Set the symbol at `(x, y)`. Returns `false` (and does nothing) when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, symbol: char) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        self.cells[idx] = symbol;
        true
    }

    /// Symbol at an in-bounds cell. Panics when out of bounds.
    pub fn at(&self, x: u32, y: u32) -> char {
        self.cells[self.index(x, y)]
    }

    pub(crate) fn at_mut(&mut self, x: u32, y: u32) -> &mut char {
        let idx = self.index(x, y);
        &mut self.cells[idx]
    }

    /// Overwrite every cell with `symbol`.
    pub fn fill(&mut self, symbol: char) {
        self.cells.fill(symbol);
    }

    /// Count the cells equal to `symbol`.
    pub fn count(&self, symbol: char) -> usize {
        self.cells.iter().filter(|&&c| c == symbol).count()
    }

    /// Iterate over the rows as strings, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1) as usize)
            .take(self.height as usize)
            .map(|row| row.iter().collect())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}
