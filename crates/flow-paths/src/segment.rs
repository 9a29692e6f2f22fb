//! Segments: one branch of a demand path under reconstruction.
//!
//! A segment is read newest-resolved first. Slot 0 is the *open end*, the
//! only hop the traceback may still change; every later slot is frozen
//! history. A slot is `None` where nothing is known: the placeholder in
//! front of a retired segment, or the unknown history of a split sibling.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use flow_types::{CountryCode, Period, Quantity, Stage, Transaction, TransactionId};

/// Quantity at a segment's open end.
///
/// A split reduces the open quantity but remembers the pre-split value so
/// that a later commit covering the whole segment restores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenQuantity {
    /// Never split since the hop was resolved.
    Open(Quantity),
    /// Reduced by one or more splits; `original` is the value before the first.
    Split { current: Quantity, original: Quantity },
}

impl OpenQuantity {
    /// The quantity still waiting to be explained.
    pub fn current(self) -> Quantity {
        match self {
            Self::Open(q) => q,
            Self::Split { current, .. } => current,
        }
    }

    /// The cached pre-split quantity, if the hop was split.
    pub fn pending(self) -> Option<Quantity> {
        match self {
            Self::Open(_) => None,
            Self::Split { original, .. } => Some(original),
        }
    }

    /// The quantity recorded in history once the hop is frozen.
    pub fn settle(self) -> Quantity {
        match self {
            Self::Open(q) => q,
            Self::Split { original, .. } => original,
        }
    }

    /// Carve `by` out of the open quantity, keeping the first cached original.
    pub fn reduce(self, by: Quantity) -> Self {
        match self {
            Self::Open(q) => Self::Split {
                current: q - by,
                original: q,
            },
            Self::Split { current, original } => Self::Split {
                current: current - by,
                original,
            },
        }
    }
}

/// A frozen, fully resolved hop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub stage: Stage,
    pub period: Period,
    pub quantity: Quantity,
    /// Country on the downstream side of the hop.
    pub destination: CountryCode,
    pub provenance: TransactionId,
}

/// The open end of a segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHop {
    pub stage: Stage,
    pub period: Period,
    pub quantity: OpenQuantity,
    /// Country on the upstream side; the next matching transaction must
    /// arrive here.
    pub origin: CountryCode,
    pub destination: CountryCode,
    pub provenance: TransactionId,
}

impl OpenHop {
    fn resolve(tx: &Transaction, destination: CountryCode, quantity: Quantity) -> Self {
        Self {
            stage: tx.stage,
            period: tx.period,
            quantity: OpenQuantity::Open(quantity),
            origin: tx.origin.clone(),
            destination,
            provenance: tx.id,
        }
    }

    /// The hop as it reads today, with the current open quantity.
    pub fn snapshot(&self) -> Hop {
        Hop {
            stage: self.stage,
            period: self.period,
            quantity: self.quantity.current(),
            destination: self.destination.clone(),
            provenance: self.provenance,
        }
    }

    fn freeze(self) -> Hop {
        Hop {
            stage: self.stage,
            period: self.period,
            quantity: self.quantity.settle(),
            destination: self.destination,
            provenance: self.provenance,
        }
    }
}

/// One branch of a demand path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    open: Option<OpenHop>,
    history: VecDeque<Option<Hop>>,
}

impl Segment {
    /// Start a segment from a delivery transaction.
    pub fn delivery(tx: &Transaction) -> Self {
        Self {
            open: Some(OpenHop::resolve(tx, tx.destination.clone(), tx.quantity)),
            history: VecDeque::new(),
        }
    }

    /// The open end, `None` once the segment is retired.
    pub fn open(&self) -> Option<&OpenHop> {
        self.open.as_ref()
    }

    pub fn is_retired(&self) -> bool {
        self.open.is_none()
    }

    /// Current open quantity.
    pub fn open_quantity(&self) -> Option<Quantity> {
        self.open.as_ref().map(|h| h.quantity.current())
    }

    /// Cached pre-split quantity of the open end.
    pub fn pending_quantity(&self) -> Option<Quantity> {
        self.open.as_ref().and_then(|h| h.quantity.pending())
    }

    /// Number of slots, open end included.
    pub fn depth(&self) -> usize {
        1 + self.history.len()
    }

    /// Returns `true` if `tx` can feed this segment's open end: it must
    /// arrive in the open end's origin country from a strictly earlier stage.
    pub fn accepts(&self, tx: &Transaction) -> bool {
        self.open
            .as_ref()
            .is_some_and(|h| h.origin == tx.destination && tx.stage < h.stage)
    }

    /// Freeze the open end and resolve `tx` as the new open end carrying
    /// `quantity`. Returns `None` if the segment is retired.
    pub(crate) fn grow(&mut self, tx: &Transaction, quantity: Quantity) -> Option<()> {
        let open = self.open.take()?;
        let destination = open.origin.clone();
        self.history.push_front(Some(open.freeze()));
        self.open = Some(OpenHop::resolve(tx, destination, quantity));
        Some(())
    }

    /// Freeze the open end and stop the segment growing. The frozen hop
    /// keeps its settled quantity; a placeholder slot takes the open end.
    /// Returns the open quantity absorbed, or `None` if already retired.
    pub(crate) fn retire(&mut self) -> Option<Quantity> {
        let open = self.open.take()?;
        let absorbed = open.quantity.current();
        self.history.push_front(Some(open.freeze()));
        Some(absorbed)
    }

    /// Carve `tx.quantity` out of the open end and return the sibling that
    /// now carries it. Returns `None` if the segment is retired.
    pub(crate) fn split(&mut self, tx: &Transaction) -> Option<Segment> {
        let open = self.open.as_mut()?;
        open.quantity = open.quantity.reduce(tx.quantity);
        Some(Segment {
            open: Some(OpenHop::resolve(tx, tx.destination.clone(), tx.quantity)),
            history: std::iter::repeat(None).take(self.depth()).collect(),
        })
    }

    /// All slots, open end first.
    pub fn slots(&self) -> Vec<Option<Hop>> {
        std::iter::once(self.open.as_ref().map(OpenHop::snapshot))
            .chain(self.history.iter().cloned())
            .collect()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = self
            .open
            .as_ref()
            .map(|h| h.origin.to_string())
            .unwrap_or_else(|| "-".into());
        write!(f, "from {origin}:")?;
        for slot in self.slots() {
            match slot {
                Some(hop) => write!(
                    f,
                    " [{} {} -> {} @{} ({})]",
                    hop.stage, hop.quantity, hop.destination, hop.period, hop.provenance
                )?,
                None => write!(f, " [-]")?,
            }
        }
        if let Some(pending) = self.pending_quantity() {
            write!(f, " pending {pending}")?;
        }
        Ok(())
    }
}
