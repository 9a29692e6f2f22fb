//! Error types for the path store.
//!
//! Every variant is an internal invariant violation: candidates handed to
//! the store come from its own eligibility scan, so a mismatch means the
//! caller holds stale or malformed handles.

use crate::store::{PathId, SegmentId};

/// Errors that can occur during path store mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A path id does not name an existing path.
    #[error("unknown path {0}")]
    UnknownPath(PathId),

    /// A candidate position lies outside its path's segment list.
    #[error("position {position} out of range for path {path}")]
    PositionOutOfRange { path: PathId, position: usize },

    /// A candidate's handle no longer sits at the recorded position.
    #[error("stale candidate: path {path} position {position} does not hold segment {segment}")]
    StaleCandidate {
        path: PathId,
        position: usize,
        segment: SegmentId,
    },

    /// The same segment was named twice in one commit.
    #[error("segment {0} named twice in one commit")]
    DuplicateCandidate(SegmentId),

    /// The segment has no open end left to mutate.
    #[error("segment {0} is retired")]
    RetiredSegment(SegmentId),

    /// A commit was requested with no candidates.
    #[error("commit has no candidates")]
    EmptyCommit,
}

/// Convenience alias for path store results.
pub type PathResult<T> = Result<T, PathError>;
