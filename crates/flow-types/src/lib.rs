//! Foundation types for flow traceback.
//!
//! Every other flowtrace crate depends on `flow-types`. The types here are
//! plain values: they carry no path or matching state.
//!
//! # Key Types
//!
//! - [`Stage`] -- The five ordered processing stages a flow traverses
//! - [`Quantity`] -- Fixed-point decimal with two places, exact arithmetic
//! - [`Period`] -- Ordinal time bucket (week) of a transaction
//! - [`CountryCode`] -- Boundary country of a stage hop
//! - [`Transaction`] -- One normalized ledger row

pub mod error;
pub mod quantity;
pub mod stage;
pub mod transaction;

pub use error::TypeError;
pub use quantity::{Quantity, MAX_HUNDREDTHS};
pub use stage::{Stage, STAGE_COUNT};
pub use transaction::{CountryCode, Period, Transaction, TransactionId};
