use std::path::PathBuf;

use thiserror::Error;

/// A problem inside the text of a template or rule file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found end of file")]
    UnexpectedEof { line: usize, expected: &'static str },
    #[error("line {line}: invalid {what} {found:?}")]
    InvalidNumber {
        line: usize,
        what: &'static str,
        found: String,
    },
    #[error("line {line}: row has {found} symbols, expected at least {expected}")]
    ShortRow {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("unsupported format {found}, expected {expected}")]
    UnsupportedFormat { found: i64, expected: i64 },
}

/// Error type for asset and configuration loading failures
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("Failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}

impl LoadError {
    pub(crate) fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
