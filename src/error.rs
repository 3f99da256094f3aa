//! Error types for hist2d

use std::path::PathBuf;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// hist2d error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input file could not be opened
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error while reading rows
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row does not have exactly three fields
    #[error("Line {line}: expected 3 fields (x,y,z), found {found}")]
    FieldCount { line: usize, found: usize },

    /// Field is not a number
    #[error("Line {line}: column {column}: invalid number {value:?}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    /// ZIP archive has no entries
    #[error("ZIP archive is empty")]
    EmptyArchive,

    /// ZIP archive could not be read
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Grid dimension is zero or its cell count overflows
    #[error("Invalid grid size {0}: must be at least 1 and fit {0}x{0} cells in memory")]
    InvalidBox(usize),

    /// Grid cells could not be allocated
    #[error("Grid of {0}x{0} cells is too large to allocate")]
    GridTooLarge(usize),
}
