use flow_types::TypeError;
use flow_workbook::WorkbookError;

/// Errors produced while normalizing a ledger. All of them abort the run.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("row {row}: invalid stage label {label:?}")]
    InvalidStage { row: usize, label: String },

    #[error("ledger sheet has no {0:?} column")]
    MissingColumn(String),

    #[error("row {row}: column {column:?} is empty")]
    MissingField { row: usize, column: String },

    #[error("row {row}: column {column:?} has invalid value {value:?}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: {source}")]
    Type { row: usize, source: TypeError },

    #[error("workbook error: {0}")]
    Workbook(#[from] WorkbookError),
}

/// Convenience alias for ledger results.
pub type LedgerResult<T> = Result<T, LedgerError>;
