//! Writing finished maps: PNG bitmap, JSON document and plain text.

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use roomforge_core::{Grid, Map, Position};
use serde::Serialize;
use tracing::info;

use crate::error::ExportError;

// ─── Palette ──────────────────────────────────────────────────────────────────

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);
const DARK_ORANGE: Rgba<u8> = Rgba([255, 140, 0, 255]);
const SADDLE_BROWN: Rgba<u8> = Rgba([139, 69, 19, 255]);
const SKY_BLUE: Rgba<u8> = Rgba([135, 206, 235, 255]);
const SLATE_BLUE: Rgba<u8> = Rgba([106, 90, 205, 255]);
const GREEN: Rgba<u8> = Rgba([0, 128, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// The two checkerboard colours of a symbol.
fn palette(symbol: char) -> (Rgba<u8>, Rgba<u8>) {
    match symbol {
        ' ' => (BLACK, BLACK),
        '#' => (DARK_ORANGE, DARK_ORANGE),
        '=' => (SADDLE_BROWN, SADDLE_BROWN),
        'X' => (SKY_BLUE, SKY_BLUE),
        'x' => (SLATE_BLUE, SLATE_BLUE),
        '-' => (BLACK, GRAY),
        '~' => (DARK_ORANGE, SADDLE_BROWN),
        'U' => (GREEN, GREEN),
        'D' => (BLUE, BLUE),
        _ => (RED, RED),
    }
}

// ─── Image ────────────────────────────────────────────────────────────────────

/// Draw `grid` with `cell_size`×`cell_size` pixels per cell.
pub fn render(grid: &Grid, cell_size: u32) -> RgbaImage {
    let cell_size = cell_size.max(1);
    let mut canvas = RgbaImage::new(grid.width() * cell_size, grid.height() * cell_size);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let (even, odd) = palette(grid.at(x, y));
            for dy in 0..cell_size {
                for dx in 0..cell_size {
                    let color = if (dx + dy) % 2 == 0 { even } else { odd };
                    canvas.put_pixel(x * cell_size + dx, y * cell_size + dy, color);
                }
            }
        }
    }
    canvas
}

pub fn save_png(grid: &Grid, cell_size: u32, path: &Path) -> Result<(), ExportError> {
    create_parent(path)?;
    render(grid, cell_size).save(path)?;
    Ok(())
}

// ─── JSON / text ──────────────────────────────────────────────────────────────

/// Serialized form of a finished map.
#[derive(Debug, Serialize)]
pub struct MapDocument {
    pub width: u32,
    pub height: u32,
    pub rows: Vec<String>,
    pub entrance: Option<Position>,
    pub exit: Option<Position>,
}

impl From<&Map> for MapDocument {
    fn from(map: &Map) -> Self {
        Self {
            width: map.width(),
            height: map.height(),
            rows: map.grid().rows().collect(),
            entrance: map.entrance(),
            exit: map.exit(),
        }
    }
}

pub fn save_json(map: &Map, path: &Path) -> Result<(), ExportError> {
    create_parent(path)?;
    let json = serde_json::to_string_pretty(&MapDocument::from(map))?;
    fs::write(path, json)?;
    Ok(())
}

pub fn save_text(grid: &Grid, path: &Path) -> Result<(), ExportError> {
    create_parent(path)?;
    fs::write(path, format!("{grid}\n"))?;
    Ok(())
}

/// Write every configured output of a finished map.
pub fn export_map(
    map: &Map,
    image: Option<&Path>,
    json: Option<&Path>,
    text: Option<&Path>,
    cell_size: u32,
) -> Result<(), ExportError> {
    if let Some(path) = image {
        save_png(map.grid(), cell_size, path)?;
        info!("wrote image {}", path.display());
    }
    if let Some(path) = json {
        save_json(map, path)?;
        info!("wrote json {}", path.display());
    }
    if let Some(path) = text {
        save_text(map.grid(), path)?;
        info!("wrote text {}", path.display());
    }
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
