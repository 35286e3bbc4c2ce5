//! Room and door template files (`.rm1`).
//!
//! ```text
//! 0          format number
//! 5          width
//! 3          height
//! XR         mirror flags, any of X Y R (may be empty)
//! ##=##      `height` rows of at least `width` symbols
//! #   #
//! #####
//! ```

use std::path::Path;

use roomforge_core::{pattern, Grid, IdAllocator, MirrorOps, Template, TemplateCatalog};
use tracing::{debug, info, warn};

use crate::reader::LineReader;
use crate::{read_dir_sorted, LoadError, ParseError};

/// File extension of template files.
pub const TEMPLATE_EXTENSION: &str = "rm1";

const TEMPLATE_FORMAT: i64 = 0;

/// The contents of one template file, before variants are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub ops: MirrorOps,
    pub content: Grid,
}

impl TemplateSource {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut reader = LineReader::new(text);
        reader.expect_format(TEMPLATE_FORMAT)?;
        let width = reader.next_size("width")?;
        let height = reader.next_size("height")?;
        let ops = reader.next_flags()?;
        let content = reader.next_grid(width, height)?;
        Ok(Self { ops, content })
    }

    /// Every requested variant as its own template.
    ///
    /// The first variant is the unmodified content and is the source of the others.
    pub fn expand(&self, ids: &mut IdAllocator) -> Vec<Template> {
        let mut variants = pattern::create_mirrors(&self.content, self.ops).into_iter();
        let Some(first) = variants.next() else {
            return Vec::new();
        };
        let first = Template::new(first, ids);
        let source = first.id();
        let mut templates = vec![first];
        templates.extend(variants.map(|grid| Template::with_source(grid, source, ids)));
        templates
    }
}

/// Load one template file into `catalog`. Returns the number of variants added.
pub fn load_template_file(
    path: impl AsRef<Path>,
    catalog: &mut TemplateCatalog,
    ids: &mut IdAllocator,
) -> Result<usize, LoadError> {
    let path = path.as_ref();
    debug!("reading template file {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let source = TemplateSource::parse(&text).map_err(|e| LoadError::parse(path, e))?;
    let templates = source.expand(ids);
    let count = templates.len();
    catalog.extend(templates);
    Ok(count)
}

/// Load every `.rm1` file in `dir`, in file-name order, into a new catalog.
///
/// Files that fail to load are logged and skipped. The finished catalog is
/// sorted by ascending area.
pub fn load_template_dir(
    dir: impl AsRef<Path>,
    name: &str,
    ids: &mut IdAllocator,
) -> Result<TemplateCatalog, LoadError> {
    let dir = dir.as_ref();
    info!("reading templates in {} into '{}'", dir.display(), name);
    let mut catalog = TemplateCatalog::new(name);
    for path in read_dir_sorted(dir, TEMPLATE_EXTENSION)? {
        if let Err(e) = load_template_file(&path, &mut catalog, ids) {
            warn!("skipping template file {}: {}", path.display(), e);
        }
    }
    catalog.sort_by_area();
    info!("'{}' holds {} templates", name, catalog.len());
    Ok(catalog)
}
