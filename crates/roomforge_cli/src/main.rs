//! roomforge command-line generator
//!
//! Loads templates and rules, grows a map and writes it out.

mod error;
mod export;
mod snapshot;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roomforge_core::{Map, TemplateCatalog};
use roomforge_gen::{FrontierPolicy, GenerationReport, PlacementEngine, Socket};
use roomforge_loader::{Assets, GeneratorConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::export::export_map;
use crate::snapshot::SnapshotWriter;

const DEFAULT_CONFIG: &str = "roomforge.toml";

/// Template-based level generator
#[derive(Parser, Debug)]
#[command(name = "roomforge")]
#[command(version, about = "Grow a level out of room templates", long_about = None)]
struct Args {
    /// Configuration file (default: ./roomforge.toml when present)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Map width in cells
    #[arg(long = "width")]
    width: Option<u32>,

    /// Map height in cells
    #[arg(long = "height")]
    height: Option<u32>,

    /// Which open door to extend next
    #[arg(short = 'p', long = "policy")]
    policy: Option<PolicyArg>,

    /// Directory of room templates (.rm1)
    #[arg(long = "rooms")]
    rooms: Option<PathBuf>,

    /// Directory of door templates (.rm1)
    #[arg(long = "doors")]
    doors: Option<PathBuf>,

    /// Directory of replacement rules (.rm2)
    #[arg(long = "rules")]
    rules: Option<PathBuf>,

    /// PNG output
    #[arg(short = 'o', long = "image")]
    image: Option<PathBuf>,

    /// JSON output
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Plain-text output
    #[arg(long = "text")]
    text: Option<PathBuf>,

    /// Write a PNG after every generation step into this directory
    #[arg(long = "snapshots")]
    snapshots: Option<PathBuf>,

    /// Pixels per map cell in images
    #[arg(long = "cell-size")]
    cell_size: Option<u32>,

    /// Print the finished map to stdout
    #[arg(long = "print")]
    print: bool,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    BreadthFirst,
    DepthFirst,
    Random,
}

impl From<PolicyArg> for FrontierPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::BreadthFirst => FrontierPolicy::BreadthFirst,
            PolicyArg::DepthFirst => FrontierPolicy::DepthFirst,
            PolicyArg::Random => FrontierPolicy::Random,
        }
    }
}

impl Args {
    /// Overwrite config values with every flag given on the command line.
    fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.map.width = width;
        }
        if let Some(height) = self.height {
            config.map.height = height;
        }
        if let Some(policy) = self.policy {
            config.policy = policy.into();
        }
        if let Some(ref rooms) = self.rooms {
            config.assets.rooms = rooms.clone();
        }
        if let Some(ref doors) = self.doors {
            config.assets.doors = doors.clone();
        }
        if let Some(ref rules) = self.rules {
            config.assets.rules = rules.clone();
        }
        if let Some(ref image) = self.image {
            config.output.image = Some(image.clone());
        }
        if let Some(ref json) = self.json {
            config.output.json = Some(json.clone());
        }
        if let Some(ref text) = self.text {
            config.output.text = Some(text.clone());
        }
        if let Some(ref snapshots) = self.snapshots {
            config.output.snapshots = Some(snapshots.clone());
        }
        if let Some(cell_size) = self.cell_size {
            config.output.cell_size = cell_size;
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), AppError> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);

    let assets = Assets::load(&config.assets)?;
    let entry = resolve_entry(&config, &assets.doors)?;

    let rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut engine = PlacementEngine::new(assets.rooms, assets.doors, assets.rules, rng)
        .with_settings(config.settings());
    let mut map = Map::new(config.map.width, config.map.height);

    let report = match config.output.snapshots {
        Some(ref dir) => {
            let mut writer = SnapshotWriter::create(dir, config.output.cell_size)?;
            let report = engine.generate_observed(&mut map, entry, &mut writer)?;
            info!(
                "wrote {} snapshots to {}",
                writer.written(),
                writer.dir().display()
            );
            report
        }
        None => engine.generate(&mut map, entry)?,
    };
    log_report(&report);

    export_map(
        &map,
        config.output.image.as_deref(),
        config.output.json.as_deref(),
        config.output.text.as_deref(),
        config.output.cell_size,
    )?;
    if args.print {
        println!("{}", map.grid());
    }
    Ok(())
}

/// An explicit config file must load; the default one is optional.
fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, AppError> {
    match path {
        Some(path) => Ok(GeneratorConfig::load(path)?),
        None if Path::new(DEFAULT_CONFIG).is_file() => Ok(GeneratorConfig::load(DEFAULT_CONFIG)?),
        None => {
            info!("no {} found, using defaults", DEFAULT_CONFIG);
            Ok(GeneratorConfig::default())
        }
    }
}

fn resolve_entry(
    config: &GeneratorConfig,
    doors: &TemplateCatalog,
) -> Result<Option<Socket>, AppError> {
    let Some(entry) = config.entry else {
        return Ok(None);
    };
    let door = doors.get(entry.door).ok_or(AppError::EntryDoor {
        index: entry.door,
        count: doors.len(),
    })?;
    Ok(Some(Socket::new(entry.x, entry.y, door.id())))
}

fn log_report(report: &GenerationReport) {
    info!(
        "placed {} rooms in {} steps, {} dead ends",
        report.placements.len(),
        report.iterations,
        report.rejected.len()
    );
    info!(
        "entrance {}, exit {}, {} cleanup passes, {} decoration rules fired",
        report.entrance, report.exit, report.cleanup_passes, report.decorations
    );
}
