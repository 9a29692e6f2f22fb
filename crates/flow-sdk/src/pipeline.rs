use std::path::PathBuf;

use tracing::info;

use flow_ledger::{Ledger, LedgerNormalizer};
use flow_match::{MatchingEngine, TraceStats};
use flow_paths::PathStore;
use flow_report::{FlowReport, PathFormatter};
use flow_workbook::Workbook;

use crate::config::TraceConfig;
use crate::error::SdkResult;

/// Result of one traceback run.
#[derive(Clone, Debug)]
pub struct TraceRun {
    pub dataset: u32,
    /// Transactions in the normalized ledger.
    pub transactions: usize,
    pub stats: TraceStats,
    pub store: PathStore,
    pub report: FlowReport,
    /// BLAKE3 hex digest of the report sheet.
    pub digest: String,
    /// Sheet file written, if the run wrote one.
    pub written: Option<PathBuf>,
}

/// High-level traceback API.
pub struct Flowtrace {
    config: TraceConfig,
}

impl Flowtrace {
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Load the configured dataset's ledger sheet and normalize it.
    pub fn load_ledger(&self) -> SdkResult<Ledger> {
        self.config.validate()?;
        let workbook = Workbook::open(&self.config.input);
        let sheet = workbook.read_sheet(&self.config.input_sheet())?;
        let ledger = LedgerNormalizer::new(self.config.columns.clone()).normalize_sheet(&sheet)?;
        Ok(ledger)
    }

    /// Trace a ledger and format the result without touching any workbook.
    pub fn trace_ledger(&self, ledger: &Ledger) -> SdkResult<TraceRun> {
        let engine = MatchingEngine::trace(ledger, self.config.engine.clone())?;
        let stats = engine.stats().clone();
        let store = engine.into_store();
        let report = PathFormatter::new().format(&store)?;
        let digest = report.digest()?;
        Ok(TraceRun {
            dataset: self.config.dataset,
            transactions: ledger.len(),
            stats,
            store,
            report,
            digest,
            written: None,
        })
    }

    /// Run the configured dataset without writing the report.
    pub fn preview(&self) -> SdkResult<TraceRun> {
        let ledger = self.load_ledger()?;
        self.trace_ledger(&ledger)
    }

    /// Run the configured dataset and replace its output sheet.
    pub fn run(&self) -> SdkResult<TraceRun> {
        let mut run = self.preview()?;
        let sheet = run.report.to_sheet()?;
        let workbook = Workbook::open(&self.config.output);
        let path = workbook.write_sheet(&self.config.output_sheet(), &sheet)?;
        info!(
            dataset = run.dataset,
            records = run.report.len(),
            digest = %run.digest,
            path = %path.display(),
            "report written"
        );
        run.written = Some(path);
        Ok(run)
    }
}
