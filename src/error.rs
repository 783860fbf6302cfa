use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to produce a dataset from the source file. Always fatal for the
/// load: no partially parsed dataset is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV missing '{column}' column")]
    MissingColumn { column: &'static str },

    #[error("line {line}: cannot parse timestamp '{value}'")]
    Timestamp { line: u64, value: String },

    #[error("line {line}: '{value}' is not a number")]
    Price { line: u64, value: String },
}

impl LoadError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
