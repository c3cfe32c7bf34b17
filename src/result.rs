//! Diff result type and post-processing transforms.
//!
//! [`DiffResult`] is the engine's output and the crate's full observable
//! surface: index sets for inserts/deletes/updates, an ordered move list,
//! and identity-to-index lookups for both arrays.
//!
//! Two pure transforms are provided on top:
//!
//! - [`DiffResult::for_batch_apply`]: rewrites the result so it is safe to
//!   apply as a single batch. Hosts that apply structural shifts and
//!   position-preserving updates in one atomic step cannot handle both
//!   touching the same position, so updates are converted to delete+insert.
//! - [`DiffResult::shifted`]: offsets every index by a constant, for
//!   results computed over a window of a larger sequence.
//!
//! Both are idempotent/composable and preserve the relative order of moves.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

// =============================================================================
// Public Types
// =============================================================================

/// A matched item whose resolved position changed between the two arrays.
///
/// `from` is an old-array index, `to` a new-array index. The pair is emitted
/// only when the item does not land where surrounding deletes/inserts alone
/// would have put it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIndex {
    /// Index in the old array.
    pub from: usize,
    /// Index in the new array.
    pub to: usize,
}

impl MoveIndex {
    /// Create a move from an old index to a new index.
    #[inline]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// Result of diffing two identity-keyed sequences.
///
/// Produced by [`diff`](crate::diff) and consumed by incremental list hosts.
/// `inserts` holds new-array positions; `deletes` and `updates` hold
/// old-array positions. `moves` preserves the engine's emission order.
///
/// # Identity lookups
///
/// `old_index_of` / `new_index_of` map identity keys to positions. When a
/// key occurs more than once in an array, the **last** position wins. This
/// mirrors the behavior consumers already depend on; do not rely on these
/// maps for duplicate-heavy data.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct DiffResult<K> {
    /// Positions inserted into the new array.
    pub inserts: FxHashSet<usize>,
    /// Positions deleted from the old array.
    pub deletes: FxHashSet<usize>,
    /// Old-array positions whose matched item has different content.
    pub updates: FxHashSet<usize>,
    /// Matched items whose position shifted; emission order preserved.
    pub moves: Vec<MoveIndex>,
    /// Identity key to old-array index (last occurrence wins).
    pub old_index_of: FxHashMap<K, usize>,
    /// Identity key to new-array index (last occurrence wins).
    pub new_index_of: FxHashMap<K, usize>,
}

impl<K: Eq + Hash> DiffResult<K> {
    /// Create an empty result.
    pub fn new() -> Self {
        Self {
            inserts: FxHashSet::default(),
            deletes: FxHashSet::default(),
            updates: FxHashSet::default(),
            moves: Vec::new(),
            old_index_of: FxHashMap::default(),
            new_index_of: FxHashMap::default(),
        }
    }

    /// Net length change: `inserts.len() - deletes.len()`.
    #[inline]
    pub fn delta(&self) -> isize {
        self.inserts.len() as isize - self.deletes.len() as isize
    }

    /// Total number of recorded operations.
    #[inline]
    pub fn change_count(&self) -> usize {
        self.inserts.len() + self.deletes.len() + self.updates.len() + self.moves.len()
    }

    /// Whether the result records any change at all.
    #[inline]
    pub fn has_changes(&self) -> bool {
        self.change_count() > 0
    }

    /// Whether the result is purely in-place content updates.
    ///
    /// True only when `updates` is non-empty and every structural set
    /// (inserts, deletes, moves) is empty. Such results are safe to apply
    /// without batch conversion.
    #[inline]
    pub fn only_contains_updates(&self) -> bool {
        !self.updates.is_empty()
            && self.inserts.is_empty()
            && self.deletes.is_empty()
            && self.moves.is_empty()
    }

    /// Old-array index of an identity, if it occurred in the old array.
    #[inline]
    pub fn old_index(&self, key: &K) -> Option<usize> {
        self.old_index_of.get(key).copied()
    }

    /// New-array index of an identity, if it occurred in the new array.
    #[inline]
    pub fn new_index(&self, key: &K) -> Option<usize> {
        self.new_index_of.get(key).copied()
    }

    // =========================================================================
    // Post-processing transforms
    // =========================================================================

    /// Rewrite the result so it can be applied in a single atomic batch.
    ///
    /// Many list-rendering hosts cannot apply a position-preserving update
    /// together with a structural shift of the same position in one step.
    /// This transform removes the overlap:
    ///
    /// 1. A move whose `from` index is also updated becomes a delete of
    ///    `from` plus an insert of `to`.
    /// 2. Any remaining updated identity that also exists on the new side
    ///    becomes a delete of its old index plus an insert of its new index.
    ///    This catches items whose absolute index changed through
    ///    surrounding shifts without an explicit move entry.
    /// 3. `updates` is cleared.
    ///
    /// The relative order of surviving moves is preserved. Idempotent:
    /// applying it twice equals applying it once.
    pub fn for_batch_apply(mut self) -> Self {
        let mut moves = Vec::with_capacity(self.moves.len());
        for mv in self.moves.drain(..) {
            if self.updates.remove(&mv.from) {
                self.deletes.insert(mv.from);
                self.inserts.insert(mv.to);
            } else {
                moves.push(mv);
            }
        }
        self.moves = moves;

        for (key, &old_idx) in &self.old_index_of {
            if self.updates.contains(&old_idx)
                && let Some(&new_idx) = self.new_index_of.get(key)
            {
                self.deletes.insert(old_idx);
                self.inserts.insert(new_idx);
            }
        }
        self.updates.clear();
        self
    }

    /// Add `offset` to every index in `inserts`, `deletes`, `updates`, and
    /// to both ends of every move.
    ///
    /// Used to translate a window-local result into absolute positions.
    ///
    /// # Limitation
    ///
    /// `old_index_of` / `new_index_of` are **not** shifted: identity lookup
    /// after shifting returns pre-shift indices. Callers needing post-shift
    /// lookup must not rely on this transform.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.inserts = std::mem::take(&mut self.inserts)
            .into_iter()
            .map(|i| i + offset)
            .collect();
        self.deletes = std::mem::take(&mut self.deletes)
            .into_iter()
            .map(|i| i + offset)
            .collect();
        self.updates = std::mem::take(&mut self.updates)
            .into_iter()
            .map(|i| i + offset)
            .collect();
        for mv in &mut self.moves {
            mv.from += offset;
            mv.to += offset;
        }
        self
    }
}

// Manual impl: the derived bound `K: PartialEq` is too weak for the
// contained hash maps, which compare under `K: Eq + Hash`.
impl<K: Eq + Hash> PartialEq for DiffResult<K> {
    fn eq(&self, other: &Self) -> bool {
        self.inserts == other.inserts
            && self.deletes == other.deletes
            && self.updates == other.updates
            && self.moves == other.moves
            && self.old_index_of == other.old_index_of
            && self.new_index_of == other.new_index_of
    }
}

impl<K: Eq + Hash> Eq for DiffResult<K> {}

// =============================================================================
// Tests
// =============================================================================
