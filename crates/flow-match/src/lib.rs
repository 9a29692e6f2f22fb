//! Backward flow matching for flowtrace.
//!
//! The [`MatchingEngine`] walks a normalized ledger newest transaction first.
//! Delivery transactions open demand paths; every other transaction is
//! matched against the open segments it can feed:
//!
//! - an exact match against all eligible segments commits to all of them,
//! - a smaller quantity that is an exact sum of some eligible segments
//!   (found by the [`separator`]) commits to that subset,
//! - a smaller, non-separable quantity splits the largest eligible segment,
//! - anything else is dropped as unattributable.

pub mod config;
pub mod engine;
pub mod error;
pub mod separator;

pub use config::EngineConfig;
pub use engine::{DropReason, MatchingEngine, Resolution, TraceStats};
pub use error::{MatchError, MatchResult};
pub use separator::find_subset;
