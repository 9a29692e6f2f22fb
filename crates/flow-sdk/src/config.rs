use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use flow_ledger::LedgerColumns;
use flow_match::EngineConfig;

use crate::error::{SdkError, SdkResult};

/// Everything a traceback run needs.
///
/// Every field has a default, so a TOML file only names what it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Workbook directory holding the ledger sheets.
    pub input: PathBuf,
    /// Workbook directory the report sheets are written to.
    pub output: PathBuf,
    /// Dataset selector, 1-based.
    pub dataset: u32,
    pub input_prefix: String,
    pub output_prefix: String,
    pub columns: LedgerColumns,
    pub engine: EngineConfig,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input"),
            output: PathBuf::from("output"),
            dataset: 1,
            input_prefix: "Input".into(),
            output_prefix: "Output".into(),
            columns: LedgerColumns::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl TraceConfig {
    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SdkError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SdkError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Sheet the ledger is read from, e.g. `Input3`.
    pub fn input_sheet(&self) -> String {
        format!("{}{}", self.input_prefix, self.dataset)
    }

    /// Sheet the report is written to, e.g. `Output3`.
    pub fn output_sheet(&self) -> String {
        format!("{}{}", self.output_prefix, self.dataset)
    }

    pub(crate) fn validate(&self) -> SdkResult<()> {
        if self.dataset == 0 {
            return Err(SdkError::InvalidDataset(self.dataset));
        }
        Ok(())
    }
}
