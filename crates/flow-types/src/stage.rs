use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of stages in the fixed vocabulary.
pub const STAGE_COUNT: usize = 5;

/// A processing stage of the supply chain.
///
/// Stages form a strict forward order: a flow is sourced, conditioned,
/// treated, forwarded, and finally delivered. The derived ordering follows
/// the ordinal, so `Stage::Sourcing < Stage::Delivery`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Sourcing,
    Conditioning,
    Treatment,
    Forwarding,
    Delivery,
}

impl Stage {
    /// All stages in forward order.
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::Sourcing,
        Stage::Conditioning,
        Stage::Treatment,
        Stage::Forwarding,
        Stage::Delivery,
    ];

    /// Ordinal index, `0` for sourcing through `4` for delivery.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Sourcing => 0,
            Self::Conditioning => 1,
            Self::Treatment => 2,
            Self::Forwarding => 3,
            Self::Delivery => 4,
        }
    }

    /// Look a stage up by ordinal.
    pub fn from_ordinal(ordinal: u8) -> Result<Self, TypeError> {
        Self::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or(TypeError::InvalidStageOrdinal(ordinal))
    }

    /// Ledger label of the stage.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sourcing => "Sourcing",
            Self::Conditioning => "Conditioning",
            Self::Treatment => "Treatment",
            Self::Forwarding => "Forwarding",
            Self::Delivery => "Delivery",
        }
    }

    /// Returns `true` for the terminal delivery stage.
    pub fn is_delivery(self) -> bool {
        matches!(self, Self::Delivery)
    }
}

impl FromStr for Stage {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.name() == label)
            .ok_or_else(|| TypeError::InvalidStage(s.to_string()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
