//! Path store for flowtrace.
//!
//! Demand paths are reconstructed from their delivery end backward. Each
//! path is an ordered list of [`SegmentId`] handles into a segment arena;
//! a segment records the hops resolved so far, newest-resolved first.
//!
//! The store supports the three mutations the traceback needs:
//!
//! - **grow** a segment by a new upstream hop (a commit),
//! - **split** a segment into two siblings when only part of its open
//!   quantity is explained,
//! - **retire** sibling segments absorbed by a commit, keeping their history
//!   and moving them next to the segment that absorbed them.

pub mod error;
pub mod segment;
pub mod store;

pub use error::{PathError, PathResult};
pub use segment::{Hop, OpenHop, OpenQuantity, Segment};
pub use store::{Candidate, Merge, Path, PathId, PathStore, SegmentId};
