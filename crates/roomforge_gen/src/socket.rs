//! Sockets and the frontier selection policy

use roomforge_core::{Position, TemplateId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A door of a given type at a given map position.
///
/// Open sockets wait on the frontier for a room to be attached; sockets that
/// could not be connected end up in the rejected list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Socket {
    pub position: Position,
    /// Id of the door template in the door catalog
    pub door: TemplateId,
}

impl Socket {
    pub const fn new(x: i32, y: i32, door: TemplateId) -> Self {
        Self {
            position: Position::new(x, y),
            door,
        }
    }
}

impl fmt::Display for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "door {} at {}", self.door, self.position)
    }
}

/// A committed room: where it went and which logical template it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    pub room: TemplateId,
    pub source: TemplateId,
}

/// Which open socket the generator works on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierPolicy {
    /// Oldest socket first. Grows the map in rings around the entry.
    #[default]
    BreadthFirst,
    /// Newest socket first. Produces long winding branches.
    DepthFirst,
    /// Any socket, drawn from the generator's random source.
    Random,
}
