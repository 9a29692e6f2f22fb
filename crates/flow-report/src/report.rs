use serde::{Deserialize, Serialize};

use flow_types::STAGE_COUNT;
use flow_workbook::Sheet;

use crate::error::ReportResult;
use crate::record::FlowRecord;

/// Column names of the report sheet: `Process<i>, Cnt<i>, Week<i>,
/// Amount<i>` for each stage slot, then `Demand`.
pub fn report_header() -> Vec<String> {
    (1..=STAGE_COUNT)
        .flat_map(|i| {
            [
                format!("Process{i}"),
                format!("Cnt{i}"),
                format!("Week{i}"),
                format!("Amount{i}"),
            ]
        })
        .chain(std::iter::once("Demand".to_string()))
        .collect()
}

/// The formatted traceback: one record per segment, in output order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReport {
    records: Vec<FlowRecord>,
}

impl FlowReport {
    pub fn new(records: Vec<FlowRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct demand paths.
    pub fn path_count(&self) -> usize {
        self.records
            .last()
            .map(|r| r.demand.path)
            .unwrap_or_default()
    }

    /// Project the records onto the tabular layout.
    pub fn to_sheet(&self) -> ReportResult<Sheet> {
        let mut sheet = Sheet::new(report_header());
        for record in &self.records {
            sheet.push_row(record.cells())?;
        }
        Ok(sheet)
    }

    /// BLAKE3 hex digest of the rendered sheet. Identical traceback runs
    /// produce identical digests.
    pub fn digest(&self) -> ReportResult<String> {
        let bytes = self.to_sheet()?.to_csv_bytes()?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    /// Pretty JSON including per-slot provenance.
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
