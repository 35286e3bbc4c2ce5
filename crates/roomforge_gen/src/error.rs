use roomforge_core::TemplateId;
use thiserror::Error;

use crate::Socket;

/// Conditions that stop a generation run.
///
/// A socket that cannot be connected is not an error: it simply becomes a
/// dead end, entrance or exit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("door catalog is empty")]
    NoDoors,
    #[error("door type {0} is not in the door catalog")]
    UnknownDoor(TemplateId),
    #[error("map {width}x{height} is too small for any room")]
    MapTooSmall { width: u32, height: u32 },
    #[error("no room could be attached to the entry ({0})")]
    NothingPlaced(Socket),
}
