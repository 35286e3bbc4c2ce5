//! Room placement for roomforge.
//!
//! [`PlacementEngine`] grows a map outward from an entry door: every open
//! door on the frontier is offered the rooms that contain the same door, and
//! the first one that fits without contradicting the map is stamped down.
//! Once nothing is left to connect, the leftovers are walled in, the
//! entrance and exit are marked and the rule set cleans up the result.

mod door_index;
mod engine;
mod error;
mod observer;
mod socket;

pub use door_index::{DoorIndex, RoomSockets};
pub use engine::{shuffle_and_rank, GenerationReport, GenerationSettings, PlacementEngine};
pub use error::GenerateError;
pub use observer::{GenerationObserver, NoopObserver, Stage};
pub use socket::{FrontierPolicy, Placement, Socket};
