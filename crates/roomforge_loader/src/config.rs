//! `roomforge.toml` generator configuration.

use std::path::{Path, PathBuf};

use roomforge_gen::{FrontierPolicy, GenerationSettings};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::LoadError;

/// Top-level generator configuration, deserialized from a TOML file.
///
/// Every table and key is optional; missing values take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the generator's random source.
    pub seed: u64,
    pub policy: FrontierPolicy,
    pub map: MapConfig,
    pub symbols: SymbolConfig,
    pub assets: AssetConfig,
    pub output: OutputConfig,
    /// Fixed entry socket. A random one is chosen when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 666,
            policy: FrontierPolicy::default(),
            map: MapConfig::default(),
            symbols: SymbolConfig::default(),
            assets: AssetConfig::default(),
            output: OutputConfig::default(),
            entry: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        info!("reading config {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Engine settings for this configuration.
    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings {
            wall: self.symbols.wall,
            connector: self.symbols.connector,
            up: self.symbols.up,
            down: self.symbols.down,
            policy: self.policy,
        }
    }
}

/// Size of the generated map in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    pub wall: char,
    pub connector: char,
    pub up: char,
    pub down: char,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        let settings = GenerationSettings::default();
        Self {
            wall: settings.wall,
            connector: settings.connector,
            up: settings.up,
            down: settings.down,
        }
    }
}

/// Directories holding the template and rule files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub rooms: PathBuf,
    pub doors: PathBuf,
    pub rules: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            rooms: PathBuf::from("assets/rooms"),
            doors: PathBuf::from("assets/doors"),
            rules: PathBuf::from("assets/modifications"),
        }
    }
}

/// Where the finished map goes. Unset outputs are not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub image: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub text: Option<PathBuf>,
    /// Directory for per-step PNG snapshots.
    pub snapshots: Option<PathBuf>,
    /// Edge length of one map cell in image pixels.
    pub cell_size: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image: Some(PathBuf::from("map.png")),
            json: None,
            text: None,
            snapshots: None,
            cell_size: 5,
        }
    }
}

/// A fixed entry socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Index into the door catalog, after loading.
    pub door: usize,
    pub x: i32,
    pub y: i32,
}
