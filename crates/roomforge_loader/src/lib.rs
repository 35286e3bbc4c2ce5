//! File loading for roomforge.
//!
//! Reads room and door templates (`.rm1`), replacement rules (`.rm2`) and the
//! `roomforge.toml` generator configuration.

mod config;
mod error;
mod reader;
mod rule_file;
mod template_file;

use std::path::{Path, PathBuf};

use roomforge_core::{IdAllocator, TemplateCatalog};
use roomforge_rules::RuleSet;

pub use config::{AssetConfig, EntryConfig, GeneratorConfig, MapConfig, OutputConfig, SymbolConfig};
pub use error::{LoadError, ParseError};
pub use rule_file::{load_rule_dir, load_rule_file, RuleSource, RULE_EXTENSION};
pub use template_file::{load_template_dir, load_template_file, TemplateSource, TEMPLATE_EXTENSION};

/// Everything a generator needs, loaded with one shared id allocator.
#[derive(Debug, Clone)]
pub struct Assets {
    pub rooms: TemplateCatalog,
    pub doors: TemplateCatalog,
    pub rules: RuleSet,
}

impl Assets {
    pub fn load(config: &AssetConfig) -> Result<Self, LoadError> {
        let mut ids = IdAllocator::new();
        let rooms = load_template_dir(&config.rooms, "rooms", &mut ids)?;
        let doors = load_template_dir(&config.doors, "doors", &mut ids)?;
        let rules = load_rule_dir(&config.rules, "modifications", &mut ids)?;
        Ok(Self { rooms, doors, rules })
    }
}

/// Files in `dir` with the given extension, sorted by file name.
fn read_dir_sorted(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
