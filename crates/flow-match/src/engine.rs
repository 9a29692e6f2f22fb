use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use flow_ledger::Ledger;
use flow_paths::{Candidate, Merge, PathId, PathStore, SegmentId};
use flow_types::{Quantity, Transaction};

use crate::config::EngineConfig;
use crate::error::{MatchError, MatchResult};
use crate::separator::find_subset;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Why a transaction was left unattributed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    /// No open segment arrives in the transaction's destination from a
    /// later stage.
    NoCandidate,
    /// The transaction carries more than all eligible segments together.
    OverDemand { eligible: Quantity },
}

/// What the engine did with one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A delivery opened a new path.
    Opened(PathId),
    /// The quantity equalled the total over all eligible segments.
    Exact(Vec<Merge>),
    /// The quantity equalled the sum of a subset of eligible segments.
    Separable(Vec<Merge>),
    /// The quantity was carved out of the largest eligible segment.
    Split {
        path: PathId,
        segment: SegmentId,
        sibling: SegmentId,
    },
    /// The transaction was dropped; the store is unchanged.
    Dropped(DropReason),
}

/// Counters for one traceback run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStats {
    pub transactions: u64,
    pub paths_opened: u64,
    pub exact_matches: u64,
    pub separable_matches: u64,
    pub splits: u64,
    pub dropped_no_candidate: u64,
    pub dropped_over_demand: u64,
}

impl TraceStats {
    /// Transactions left unattributed for any reason.
    pub fn dropped(&self) -> u64 {
        self.dropped_no_candidate + self.dropped_over_demand
    }

    fn record(&mut self, resolution: &Resolution) {
        self.transactions += 1;
        match resolution {
            Resolution::Opened(_) => self.paths_opened += 1,
            Resolution::Exact(_) => self.exact_matches += 1,
            Resolution::Separable(_) => self.separable_matches += 1,
            Resolution::Split { .. } => self.splits += 1,
            Resolution::Dropped(DropReason::NoCandidate) => self.dropped_no_candidate += 1,
            Resolution::Dropped(DropReason::OverDemand { .. }) => self.dropped_over_demand += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// MatchingEngine
// ---------------------------------------------------------------------------

/// The backward traceback over a path store.
///
/// Transactions must be fed newest first: each one sees the store as left by
/// every transaction processed before it.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    config: EngineConfig,
    store: PathStore,
    stats: TraceStats,
}

impl MatchingEngine {
    /// Create an engine with an empty path store.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            store: PathStore::new(),
            stats: TraceStats::default(),
        }
    }

    /// Trace a whole normalized ledger, newest transaction first.
    pub fn trace(ledger: &Ledger, config: EngineConfig) -> MatchResult<Self> {
        let mut engine = Self::new(config);
        for tx in ledger.newest_first() {
            engine.process(tx)?;
        }
        info!(
            transactions = engine.stats.transactions,
            paths = engine.store.path_count(),
            segments = engine.store.segment_count(),
            splits = engine.stats.splits,
            dropped = engine.stats.dropped(),
            "traceback complete"
        );
        Ok(engine)
    }

    pub fn store(&self) -> &PathStore {
        &self.store
    }

    pub fn into_store(self) -> PathStore {
        self.store
    }

    pub fn stats(&self) -> &TraceStats {
        &self.stats
    }

    /// Resolve one transaction against the store.
    pub fn process(&mut self, tx: &Transaction) -> MatchResult<Resolution> {
        debug!(%tx, "processing transaction");
        let resolution = if tx.is_delivery() {
            Resolution::Opened(self.store.open_path(tx))
        } else {
            self.traceback(tx)?
        };

        match &resolution {
            Resolution::Dropped(reason) => debug!(tx = %tx.id, ?reason, "transaction dropped"),
            other => debug!(tx = %tx.id, resolution = ?other, "transaction resolved"),
        }
        if self.config.trace_paths {
            debug!(tx = %tx.id, "path store:\n{}", self.store);
        }

        self.stats.record(&resolution);
        Ok(resolution)
    }

    fn traceback(&mut self, tx: &Transaction) -> MatchResult<Resolution> {
        let candidates = self.store.eligible(tx);
        if candidates.is_empty() {
            return Ok(Resolution::Dropped(DropReason::NoCandidate));
        }

        let eligible: Quantity = candidates.iter().map(|c| c.quantity).sum();
        debug!(
            tx = %tx.id,
            candidates = candidates.len(),
            eligible = %eligible,
            "eligible segments"
        );

        if tx.quantity == eligible {
            let merges = self.commit(tx, &candidates)?;
            return Ok(Resolution::Exact(merges));
        }
        if tx.quantity > eligible {
            return Ok(Resolution::Dropped(DropReason::OverDemand { eligible }));
        }

        let quantities: Vec<Quantity> = candidates.iter().map(|c| c.quantity).collect();
        if let Some(picks) = find_subset(&quantities, tx.quantity) {
            let subset: Vec<Candidate> = picks.into_iter().map(|i| candidates[i]).collect();
            let merges = self.commit(tx, &subset)?;
            return Ok(Resolution::Separable(merges));
        }

        let target = largest(&candidates);
        if target.quantity < tx.quantity {
            warn!(
                tx = %tx.id,
                segment = %target.segment,
                open = %target.quantity,
                quantity = %tx.quantity,
                "split overdraws segment"
            );
        }
        let sibling = self
            .store
            .split(&target, tx)
            .map_err(|source| MatchError::Invariant { tx: tx.id, source })?;
        Ok(Resolution::Split {
            path: target.path,
            segment: target.segment,
            sibling,
        })
    }

    fn commit(&mut self, tx: &Transaction, candidates: &[Candidate]) -> MatchResult<Vec<Merge>> {
        self.store
            .commit(tx, candidates)
            .map_err(|source| MatchError::Invariant { tx: tx.id, source })
    }
}

/// The candidate with the strictly largest open quantity; the first one wins
/// ties, and the first candidate is chosen when none is positive.
fn largest(candidates: &[Candidate]) -> Candidate {
    let mut best = candidates[0];
    let mut best_quantity = Quantity::ZERO;
    for candidate in candidates {
        if candidate.quantity > best_quantity {
            best = *candidate;
            best_quantity = candidate.quantity;
        }
    }
    best
}
