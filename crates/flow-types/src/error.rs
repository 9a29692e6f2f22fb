use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid stage label: {0:?}")]
    InvalidStage(String),

    #[error("invalid stage ordinal: {0}")]
    InvalidStageOrdinal(u8),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("quantity out of range: {0}")]
    QuantityOutOfRange(String),

    #[error("empty country code")]
    EmptyCountry,
}
