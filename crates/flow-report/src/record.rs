use std::fmt;

use serde::{Deserialize, Serialize};

use flow_paths::Hop;
use flow_types::{CountryCode, Period, Quantity, Stage, TransactionId, STAGE_COUNT};

/// One resolved stage of a segment as it appears in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSlot {
    pub stage: Stage,
    /// Country on the downstream side of the stage.
    pub country: CountryCode,
    pub period: Period,
    pub quantity: Quantity,
    /// Ledger row the stage was resolved from.
    pub provenance: TransactionId,
}

impl From<Hop> for StageSlot {
    fn from(hop: Hop) -> Self {
        Self {
            stage: hop.stage,
            country: hop.destination,
            period: hop.period,
            quantity: hop.quantity,
            provenance: hop.provenance,
        }
    }
}

/// Demand label of a segment: `"3"` for a single-segment path, `"3--2"` for
/// the second segment of a branched one. Both numbers are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DemandLabel {
    pub path: usize,
    pub segment: Option<usize>,
}

impl fmt::Display for DemandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment {
            Some(segment) => write!(f, "{}--{}", self.path, segment),
            None => write!(f, "{}", self.path),
        }
    }
}

/// One segment as a fixed-width record, slots in forward stage order with
/// the delivery end last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub demand: DemandLabel,
    pub slots: [Option<StageSlot>; STAGE_COUNT],
}

impl FlowRecord {
    /// The record's cells in sheet column order; empty strings stand for
    /// unknown slots.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(STAGE_COUNT * 4 + 1);
        for slot in &self.slots {
            match slot {
                Some(s) => cells.extend([
                    s.stage.to_string(),
                    s.country.to_string(),
                    s.period.to_string(),
                    s.quantity.to_string(),
                ]),
                None => cells.extend(std::iter::repeat(String::new()).take(4)),
            }
        }
        cells.push(self.demand.to_string());
        cells
    }

    /// Number of known slots.
    pub fn resolved(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demand_labels() {
        assert_eq!(DemandLabel { path: 3, segment: None }.to_string(), "3");
        assert_eq!(
            DemandLabel {
                path: 3,
                segment: Some(2)
            }
            .to_string(),
            "3--2"
        );
    }

    #[test]
    fn cells_leave_unknown_slots_empty() {
        let slot = StageSlot {
            stage: Stage::Delivery,
            country: CountryCode::new("FR").unwrap(),
            period: Period(9),
            quantity: Quantity::from_hundredths(1050),
            provenance: TransactionId(4),
        };
        let record = FlowRecord {
            demand: DemandLabel { path: 1, segment: None },
            slots: [None, None, None, None, Some(slot)],
        };
        let cells = record.cells();
        assert_eq!(cells.len(), 21);
        assert!(cells[..16].iter().all(String::is_empty));
        assert_eq!(&cells[16..], ["Delivery", "FR", "9", "10.50", "1"]);
        assert_eq!(record.resolved(), 1);
    }
}
