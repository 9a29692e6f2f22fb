//! Projection of a completed path store onto flat records.
//!
//! Paths are numbered newest first: the traceback discovers deliveries
//! latest-first, so reversing creation order numbers demand paths in forward
//! chronological order. Within a path, segments keep their store order.

use tracing::debug;

use flow_paths::{PathStore, Segment};
use flow_types::STAGE_COUNT;

use crate::error::{ReportError, ReportResult};
use crate::record::{DemandLabel, FlowRecord, StageSlot};
use crate::report::FlowReport;

/// Formats a [`PathStore`] into a [`FlowReport`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PathFormatter;

impl PathFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Emit one record per segment, paths in reverse creation order.
    pub fn format(&self, store: &PathStore) -> ReportResult<FlowReport> {
        let mut records = Vec::with_capacity(store.segment_count());
        let paths: Vec<_> = store.paths().collect();

        for (number, (id, _)) in paths.into_iter().rev().enumerate() {
            let segments = store.segments_of(id)?;
            let branched = segments.len() > 1;
            for (position, segment) in segments.into_iter().enumerate() {
                let demand = DemandLabel {
                    path: number + 1,
                    segment: branched.then_some(position + 1),
                };
                let slots = pad(segment).ok_or_else(|| ReportError::SegmentTooDeep {
                    path: id,
                    position,
                    depth: segment.depth(),
                    max: STAGE_COUNT,
                })?;
                debug!(path = %id, %demand, "formatted segment");
                records.push(FlowRecord { demand, slots });
            }
        }

        Ok(FlowReport::new(records))
    }
}

/// Segment slots, open end first, left-padded with unknowns to the stage
/// count so the delivery end lands in the last slot. `None` if the segment
/// does not fit.
fn pad(segment: &Segment) -> Option<[Option<StageSlot>; STAGE_COUNT]> {
    let slots = segment.slots();
    let offset = STAGE_COUNT.checked_sub(slots.len())?;
    let mut padded: [Option<StageSlot>; STAGE_COUNT] = Default::default();
    for (i, slot) in slots.into_iter().enumerate() {
        padded[offset + i] = slot.map(StageSlot::from);
    }
    Some(padded)
}
