use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("dataset numbers start at 1, got {0}")]
    InvalidDataset(u32),

    #[error("workbook error: {0}")]
    Workbook(#[from] flow_workbook::WorkbookError),

    #[error("ledger error: {0}")]
    Ledger(#[from] flow_ledger::LedgerError),

    #[error("traceback error: {0}")]
    Match(#[from] flow_match::MatchError),

    #[error("report error: {0}")]
    Report(#[from] flow_report::ReportError),
}

pub type SdkResult<T> = Result<T, SdkError>;
