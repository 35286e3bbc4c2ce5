use roomforge_gen::GenerateError;
use roomforge_loader::LoadError;
use thiserror::Error;

/// Failures while writing a finished map or a snapshot.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything that can stop the `roomforge` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("entry door {index} is out of range ({count} door templates loaded)")]
    EntryDoor { index: usize, count: usize },
}
