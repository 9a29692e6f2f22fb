use std::io;
use std::path::PathBuf;

/// Errors produced by workbook operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    /// I/O error while reading or writing a sheet file.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The CSV layer rejected a sheet.
    #[error("csv error in {path}: {detail}")]
    Csv { path: PathBuf, detail: String },

    /// The requested sheet does not exist in the workbook.
    #[error("sheet not found: {name} (looked in {root})")]
    SheetNotFound { name: String, root: PathBuf },

    /// Sheet names must be non-empty and free of path separators.
    #[error("invalid sheet name: {0:?}")]
    InvalidSheetName(String),

    /// A row does not have one cell per header.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Convenience alias for workbook results.
pub type WorkbookResult<T> = Result<T, WorkbookError>;
