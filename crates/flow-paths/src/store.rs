//! The path store: an arena of segments addressed by stable handles.
//!
//! # Invariants
//!
//! - Segments are never removed from the arena; a [`SegmentId`] stays valid
//!   for the life of the store.
//! - Every segment handle appears in exactly one path's segment list.
//! - After a commit, the segments it retired sit directly after the segment
//!   that absorbed them, in their previous relative order.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use flow_types::{Quantity, Transaction};

use crate::error::{PathError, PathResult};
use crate::segment::Segment;

/// Stable handle of a segment in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(usize);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Index of a path in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(usize);

impl PathId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A demand path: ordered segment handles, delivery-first branches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<SegmentId>,
}

impl Path {
    pub fn segment_ids(&self) -> &[SegmentId] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// An open segment eligible for a transaction, as found by
/// [`PathStore::eligible`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathId,
    /// Position of the segment within its path.
    pub position: usize,
    pub segment: SegmentId,
    /// Current open quantity.
    pub quantity: Quantity,
}

/// Outcome of committing a transaction against one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Merge {
    pub path: PathId,
    /// The segment that grew by the new hop.
    pub grown: SegmentId,
    /// Sibling segments retired into `grown`, in path order.
    pub retired: Vec<SegmentId>,
    /// Open quantity of the new hop: the sum of all members' open quantities.
    pub quantity: Quantity,
}

/// Arena of segments plus the ordered paths that reference them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PathStore {
    segments: Vec<Segment>,
    paths: Vec<Path>,
}

impl PathStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths, in creation order.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of segments across all paths.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path(&self, id: PathId) -> PathResult<&Path> {
        self.paths.get(id.0).ok_or(PathError::UnknownPath(id))
    }

    /// Paths in creation order.
    pub fn paths(&self) -> impl Iterator<Item = (PathId, &Path)> {
        self.paths.iter().enumerate().map(|(i, p)| (PathId(i), p))
    }

    /// Resolve a handle. Handles are only minted by this store, so a
    /// handle from the same store always resolves.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Segments of a path in path order.
    pub fn segments_of(&self, id: PathId) -> PathResult<Vec<&Segment>> {
        Ok(self
            .path(id)?
            .segments
            .iter()
            .filter_map(|s| self.segments.get(s.0))
            .collect())
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Open a new single-segment path from a delivery transaction.
    pub fn open_path(&mut self, tx: &Transaction) -> PathId {
        let segment = self.alloc(Segment::delivery(tx));
        let id = PathId(self.paths.len());
        self.paths.push(Path {
            segments: vec![segment],
        });
        debug!(path = %id, segment = %segment, quantity = %tx.quantity, "opened path");
        id
    }

    /// Every open segment `tx` can feed, in path order then position order.
    pub fn eligible(&self, tx: &Transaction) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for (path_id, path) in self.paths() {
            for (position, &segment) in path.segments.iter().enumerate() {
                let Some(seg) = self.segments.get(segment.0) else {
                    continue;
                };
                if !seg.accepts(tx) {
                    continue;
                }
                if let Some(quantity) = seg.open_quantity() {
                    candidates.push(Candidate {
                        path: path_id,
                        position,
                        segment,
                        quantity,
                    });
                }
            }
        }
        candidates
    }

    /// Split `tx.quantity` off the candidate's segment into a new sibling
    /// inserted directly after it. Returns the sibling's handle.
    pub fn split(&mut self, candidate: &Candidate, tx: &Transaction) -> PathResult<SegmentId> {
        self.check(candidate)?;
        let sibling = self.segments[candidate.segment.0]
            .split(tx)
            .ok_or(PathError::RetiredSegment(candidate.segment))?;
        let sibling_id = self.alloc(sibling);
        self.paths[candidate.path.0]
            .segments
            .insert(candidate.position + 1, sibling_id);

        debug!(
            path = %candidate.path,
            segment = %candidate.segment,
            sibling = %sibling_id,
            quantity = %tx.quantity,
            "split segment"
        );
        Ok(sibling_id)
    }

    /// Commit `tx` against a set of candidates.
    ///
    /// Candidates are grouped by path. Within a path, the first candidate in
    /// path order grows by a hop for `tx` whose quantity is the sum of every
    /// member's open quantity; the other members are retired and moved to
    /// sit directly after it. Any pending split quantity on a member is
    /// restored into its frozen history.
    ///
    /// All candidates are validated before anything is mutated.
    pub fn commit(&mut self, tx: &Transaction, candidates: &[Candidate]) -> PathResult<Vec<Merge>> {
        if candidates.is_empty() {
            return Err(PathError::EmptyCommit);
        }

        let mut seen = HashSet::new();
        let mut groups: BTreeMap<PathId, Vec<Candidate>> = BTreeMap::new();
        for candidate in candidates {
            self.check(candidate)?;
            if self.segments[candidate.segment.0].is_retired() {
                return Err(PathError::RetiredSegment(candidate.segment));
            }
            if !seen.insert(candidate.segment) {
                return Err(PathError::DuplicateCandidate(candidate.segment));
            }
            groups.entry(candidate.path).or_default().push(*candidate);
        }

        let mut merges = Vec::with_capacity(groups.len());
        for (path, mut members) in groups {
            members.sort_by_key(|c| c.position);
            merges.push(self.merge_group(tx, path, &members)?);
        }
        Ok(merges)
    }

    fn merge_group(
        &mut self,
        tx: &Transaction,
        path: PathId,
        members: &[Candidate],
    ) -> PathResult<Merge> {
        let (first, rest) = members.split_first().ok_or(PathError::EmptyCommit)?;

        let mut quantity = self.segments[first.segment.0]
            .open_quantity()
            .ok_or(PathError::RetiredSegment(first.segment))?;
        for member in rest {
            quantity += self.segments[member.segment.0]
                .retire()
                .ok_or(PathError::RetiredSegment(member.segment))?;
        }
        self.segments[first.segment.0]
            .grow(tx, quantity)
            .ok_or(PathError::RetiredSegment(first.segment))?;

        let retired: Vec<SegmentId> = rest.iter().map(|c| c.segment).collect();
        self.regroup(path, first.segment, &retired);

        debug!(
            path = %path,
            grown = %first.segment,
            retired = retired.len(),
            quantity = %quantity,
            "committed transaction"
        );
        Ok(Merge {
            path,
            grown: first.segment,
            retired,
            quantity,
        })
    }

    /// Move `retired` to sit directly after `anchor`, keeping their order.
    fn regroup(&mut self, path: PathId, anchor: SegmentId, retired: &[SegmentId]) {
        if retired.is_empty() {
            return;
        }
        let segments = &mut self.paths[path.0].segments;
        segments.retain(|s| !retired.contains(s));
        let at = segments
            .iter()
            .position(|s| *s == anchor)
            .map_or(segments.len(), |i| i + 1);
        for (offset, id) in retired.iter().enumerate() {
            segments.insert(at + offset, *id);
        }
    }

    fn alloc(&mut self, segment: Segment) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments.push(segment);
        id
    }

    fn check(&self, candidate: &Candidate) -> PathResult<()> {
        let path = self.path(candidate.path)?;
        let held = path
            .segments
            .get(candidate.position)
            .ok_or(PathError::PositionOutOfRange {
                path: candidate.path,
                position: candidate.position,
            })?;
        if *held != candidate.segment {
            return Err(PathError::StaleCandidate {
                path: candidate.path,
                position: candidate.position,
                segment: candidate.segment,
            });
        }
        Ok(())
    }
}

impl fmt::Display for PathStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path_id, path) in self.paths() {
            for (position, id) in path.segments.iter().enumerate() {
                if let Some(segment) = self.segments.get(id.0) {
                    writeln!(f, "path ({}, {position}) {id}: {segment}", path_id.0)?;
                }
            }
        }
        Ok(())
    }
}
