//! Ledger normalization for flowtrace.
//!
//! Turns a raw ledger sheet into the ordered [`Ledger`] the matching engine
//! walks: stage labels become ordinals, quantities are rounded to two
//! places, and rows are stably sorted by `(period, stage)`.

pub mod columns;
pub mod error;
pub mod normalizer;

pub use columns::LedgerColumns;
pub use error::{LedgerError, LedgerResult};
pub use normalizer::{Ledger, LedgerNormalizer, RawEntry};
