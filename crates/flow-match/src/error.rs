use flow_paths::PathError;
use flow_types::TransactionId;

/// Errors produced by the matching engine.
///
/// Unattributable transactions are not errors; they are reported as
/// [`crate::Resolution::Dropped`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The path store rejected a mutation built from its own scan.
    #[error("invariant violated while matching {tx}: {source}")]
    Invariant { tx: TransactionId, source: PathError },
}

/// Convenience alias for matching results.
pub type MatchResult<T> = Result<T, MatchError>;
