//! High-level SDK for flowtrace.
//!
//! Wires the workbook boundary, the ledger normalizer, the matching engine,
//! and the path formatter into one batch run per dataset. This is the main
//! entry point for applications embedding the traceback.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::TraceConfig;
pub use error::{SdkError, SdkResult};
pub use pipeline::{Flowtrace, TraceRun};

// Re-export key types
pub use flow_ledger::LedgerColumns;
pub use flow_match::{EngineConfig, TraceStats};
pub use flow_paths::PathStore;
pub use flow_report::{FlowRecord, FlowReport};
pub use flow_types::{Quantity, Stage};
