//! Path formatter for flowtrace.
//!
//! Projects a completed [`flow_paths::PathStore`] onto flat records, one per
//! segment, with the stage history left-padded to the fixed stage count.
//!
//! # Key Types
//!
//! - [`PathFormatter`] -- walks paths newest first and numbers them
//! - [`FlowRecord`] / [`StageSlot`] -- one segment as a fixed-width row
//! - [`FlowReport`] -- the record list, its sheet layout, and its digest

pub mod error;
pub mod formatter;
pub mod record;
pub mod report;

pub use error::{ReportError, ReportResult};
pub use formatter::PathFormatter;
pub use record::{DemandLabel, FlowRecord, StageSlot};
pub use report::{report_header, FlowReport};
