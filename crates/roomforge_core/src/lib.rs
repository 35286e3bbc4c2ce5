//! Core data structures for roomforge
//!
//! This crate provides the fundamental types for template-driven level generation:
//! - `Grid` - A row-major rectangle of symbols
//! - `Template` - A room or door pattern with identity and usage bookkeeping
//! - `TemplateCatalog` - Ordered template storage with id lookup
//! - `Map` - The level being generated
//! - `pattern` - Matching, mirroring, placement and rewriting of grids
//!
//! This crate has no engine dependency. The placement algorithm lives in
//! `roomforge_gen`, rule application in `roomforge_rules`.

mod catalog;
mod grid;
mod map;
pub mod pattern;
mod template;

pub use catalog::TemplateCatalog;
pub use grid::{Grid, Position, WILDCARD};
pub use map::Map;
pub use pattern::MirrorOps;
pub use template::{IdAllocator, Template, TemplateId};
