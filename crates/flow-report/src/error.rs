//! Error types for the path formatter.

use flow_paths::{PathError, PathId};
use flow_workbook::WorkbookError;

/// Errors that can occur while formatting a path store.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A segment holds more slots than there are stages.
    #[error("segment {position} of path {path} is {depth} slots deep, at most {max} allowed")]
    SegmentTooDeep {
        path: PathId,
        position: usize,
        depth: usize,
        max: usize,
    },

    /// The store handed out an inconsistent path.
    #[error("path store error: {0}")]
    Path(#[from] PathError),

    /// Building the output sheet failed.
    #[error("sheet error: {0}")]
    Workbook(#[from] WorkbookError),

    /// JSON rendering failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for formatter results.
pub type ReportResult<T> = Result<T, ReportError>;
