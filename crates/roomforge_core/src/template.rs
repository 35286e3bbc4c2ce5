//! Room and door templates

use crate::pattern;
use crate::{Grid, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a template, unique within one [`IdAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out monotonically increasing template ids.
///
/// One allocator is shared by everything that builds the catalogs of a single
/// generation setup, so ids never collide between rooms, doors and rules.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> TemplateId {
        let id = TemplateId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// A room or door pattern.
///
/// The size is fixed at construction. Only the content and the usage counter
/// can change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    id: TemplateId,
    /// Shared by all mirrored/rotated variants of one logical template
    source_id: TemplateId,
    content: Grid,
    #[serde(default)]
    usage: u32,
}

impl Template {
    /// Create a template that is its own source.
    pub fn new(content: Grid, ids: &mut IdAllocator) -> Self {
        let id = ids.allocate();
        Self {
            id,
            source_id: id,
            content,
            usage: 0,
        }
    }

    /// Create a variant of an existing logical template.
    pub fn with_source(content: Grid, source_id: TemplateId, ids: &mut IdAllocator) -> Self {
        Self {
            id: ids.allocate(),
            source_id,
            content,
            usage: 0,
        }
    }

    /// Copy this template under a fresh id. The copy keeps the source id and starts unused.
    pub fn duplicate(&self, ids: &mut IdAllocator) -> Self {
        Self::with_source(self.content.clone(), self.source_id, ids)
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn source_id(&self) -> TemplateId {
        self.source_id
    }

    pub fn x_size(&self) -> u32 {
        self.content.width()
    }

    pub fn y_size(&self) -> u32 {
        self.content.height()
    }

    pub fn area(&self) -> u32 {
        self.content.area()
    }

    /// Placement preference weight: bigger templates are tried first.
    pub fn sort_value(&self) -> i64 {
        (self.x_size() as i64 + self.y_size() as i64) / 10
    }

    /// Number of times any variant sharing this template's source was placed.
    pub fn usage(&self) -> u32 {
        self.usage
    }

    /// Increment the usage counter.
    pub fn record_usage(&mut self) {
        self.usage += 1;
    }

    pub fn content(&self) -> &Grid {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Grid {
        &mut self.content
    }

    /// Every position at which this template exact-matches inside `other`.
    pub fn occurrences_in(&self, other: &Grid) -> Vec<Position> {
        pattern::find_matches(other, &self.content, pattern::MirrorOps::NONE)
    }
}
