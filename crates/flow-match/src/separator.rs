//! Subset-sum separation.
//!
//! Decides whether a transaction quantity is an exact sum of some eligible
//! segments' open quantities. The search is exhaustive: subsets are tried by
//! increasing size, and within a size in lexicographic order of candidate
//! position, so the answer is the fewest-segment explanation and, among
//! those, the earliest discovered one.
//!
//! Quantities larger than the target are excluded up front since a segment's
//! open quantity is never consumed partially by a commit.

use flow_types::Quantity;

/// Find the first subset of `quantities` summing exactly to `target`.
///
/// Returns the indices of the chosen quantities in ascending order, or
/// `None` if no subset matches. Runs in time exponential in the number of
/// quantities not exceeding `target`.
pub fn find_subset(quantities: &[Quantity], target: Quantity) -> Option<Vec<usize>> {
    let pool: Vec<(usize, Quantity)> = quantities
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, q)| *q <= target)
        .collect();

    for size in 1..=pool.len() {
        let mut combo = Combinations::new(pool.len(), size);
        while let Some(picks) = combo.next_indices() {
            let sum: Quantity = picks.iter().map(|&i| pool[i].1).sum();
            if sum == target {
                return Some(picks.iter().map(|&i| pool[i].0).collect());
            }
        }
    }
    None
}

/// Lexicographic `k`-combinations of `0..n`.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
        }
    }

    fn next_indices(&mut self) -> Option<&[usize]> {
        let k = self.indices.len();
        if k > self.n {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.indices);
        }
        // Rightmost index that can still move right.
        let pivot = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i)?;
        self.indices[pivot] += 1;
        for i in pivot + 1..k {
            self.indices[i] = self.indices[i - 1] + 1;
        }
        Some(&self.indices)
    }
}
