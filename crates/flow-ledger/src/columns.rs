use serde::{Deserialize, Serialize};

/// Header names of the ledger columns the normalizer reads.
///
/// Any other column in the sheet is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerColumns {
    pub stage: String,
    pub period: String,
    pub quantity: String,
    pub origin: String,
    pub destination: String,
}

impl Default for LedgerColumns {
    fn default() -> Self {
        Self {
            stage: "for_process".into(),
            period: "Week".into(),
            quantity: "Amount".into(),
            origin: "send_from_cnt".into(),
            destination: "to_processing_cnt".into(),
        }
    }
}
