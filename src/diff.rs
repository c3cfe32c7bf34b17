//! Identity-based list diff engine.
//!
//! Computes the minimal set of insert/delete/move/update operations that
//! transforms one identity-keyed sequence into another, so an incremental
//! consumer can apply only the changed positions.
//!
//! # Algorithm
//!
//! An occurrence-counting (symbol table) diff in the Heckel family, three
//! linear passes over identity keys:
//!
//! 1. **New pass**: count occurrences per identity, one record per position.
//! 2. **Old pass**: count occurrences, queue each old position on its
//!    identity's entry in forward order.
//! 3. **Matching pass**: each new occurrence of an identity seen on both
//!    sides consumes the next queued old position, so the k-th occurrence
//!    in the new array matches the k-th occurrence in the old array.
//!    Matched pairs with unequal content flag the entry as updated.
//!
//! Result assembly walks the old records (collecting deletes and a running
//! delete offset) and the new records (collecting inserts, updates, and
//! moves). A matched item is a move when it does not land where the
//! surrounding deletes and inserts alone would have put it.
//!
//! # Why not LCS/Myers?
//!
//! | Algorithm | Time | Duplicates | Moves |
//! |-----------|------|------------|-------|
//! | Myers | O((n+m)*d) | positional | inferred |
//! | **Occurrence counting** | **O(n+m)** | **deterministic** | **exact** |
//!
//! List UIs diff on every data change, including full reorders where the
//! edit distance d approaches n and Myers degrades to quadratic. The
//! symbol-table approach stays linear regardless of how shuffled the input
//! is, and identity keys make move detection exact rather than inferred.
//!
//! # Complexity
//!
//! O(old.len + new.len) time and space. No recursion; per-identity queues
//! are bounded by duplicate counts.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::diffable::Diffable;
use crate::result::{DiffResult, MoveIndex};

// =============================================================================
// Entry arena
// =============================================================================

/// Per-identity bookkeeping, one entry per distinct key observed across both
/// arrays within a single diff call.
///
/// Old positions are queued in forward order and consumed front-to-back by
/// the matching pass; `cursor` is the next unconsumed slot. Duplicate keys
/// beyond the old-side supply simply exhaust the queue and fall through to
/// inserts.
#[derive(Debug, Default)]
struct Entry {
    new_count: usize,
    old_count: usize,
    old_indices: SmallVec<[usize; 2]>,
    cursor: usize,
    updated: bool,
}

impl Entry {
    #[inline]
    fn occurs_on_both_sides(&self) -> bool {
        self.new_count > 0 && self.old_count > 0
    }

    /// Next unconsumed old position for this identity, if any remain.
    #[inline]
    fn take_old_index(&mut self) -> Option<usize> {
        let idx = self.old_indices.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(idx)
    }
}

/// One array position (old or new side) tied to its entry and, once the
/// matching pass resolves it, the index on the opposite side.
#[derive(Debug, Clone, Copy)]
struct Record {
    entry: usize,
    matched: Option<usize>,
}

/// Look up or create the arena entry for `key`.
fn entry_index<K: std::hash::Hash + Eq>(
    table: &mut FxHashMap<K, usize>,
    entries: &mut Vec<Entry>,
    key: K,
) -> usize {
    *table.entry(key).or_insert_with(|| {
        entries.push(Entry::default());
        entries.len() - 1
    })
}

// =============================================================================
// Public API
// =============================================================================

/// Diff two identity-keyed sequences.
///
/// Always returns a result, even an empty one; there are no error
/// conditions. Side-effect free and safe to call from any thread.
///
/// # Example
///
/// ```
/// use listdiff::diff;
///
/// let result = diff(&['a', 'b', 'c', 'd'], &['a', 'c', 'b', 'd']);
/// assert_eq!(result.change_count(), 2); // two moves, nothing else
/// assert!(result.inserts.is_empty());
/// assert!(result.deletes.is_empty());
/// ```
pub fn diff<T: Diffable>(old: &[T], new: &[T]) -> DiffResult<T::Key> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut table: FxHashMap<T::Key, usize> = FxHashMap::default();

    // Pass 1: new array.
    let mut new_records: Vec<Record> = Vec::with_capacity(new.len());
    for item in new {
        let e = entry_index(&mut table, &mut entries, item.diff_key());
        entries[e].new_count += 1;
        new_records.push(Record { entry: e, matched: None });
    }

    // Pass 2: old array, queueing positions in forward order.
    let mut old_records: Vec<Record> = Vec::with_capacity(old.len());
    for (i, item) in old.iter().enumerate() {
        let e = entry_index(&mut table, &mut entries, item.diff_key());
        entries[e].old_count += 1;
        entries[e].old_indices.push(i);
        old_records.push(Record { entry: e, matched: None });
    }

    // Pass 3: match new occurrences against queued old positions.
    for (n, record) in new_records.iter_mut().enumerate() {
        let entry = &mut entries[record.entry];
        if !entry.occurs_on_both_sides() {
            continue;
        }
        if let Some(o) = entry.take_old_index() {
            if !old[o].content_eq(&new[n]) {
                entry.updated = true;
            }
            record.matched = Some(o);
            old_records[o].matched = Some(n);
        }
    }

    let mut result = DiffResult::new();

    // Old side: deletes, delete offsets, old identity map.
    let mut delete_offsets = vec![0usize; old.len()];
    let mut running_deletes = 0usize;
    for (i, record) in old_records.iter().enumerate() {
        delete_offsets[i] = running_deletes;
        if record.matched.is_none() {
            result.deletes.insert(i);
            running_deletes += 1;
        }
        // Last write wins for duplicate identities.
        result.old_index_of.insert(old[i].diff_key(), i);
    }

    // New side: inserts, updates, moves, new identity map.
    let mut insert_offset = 0usize;
    for (n, record) in new_records.iter().enumerate() {
        match record.matched {
            Some(o) => {
                if entries[record.entry].updated {
                    result.updates.insert(o);
                }
                // Where the item would sit if only deletes/inserts happened.
                let predicted = o - delete_offsets[o] + insert_offset;
                if predicted != n {
                    result.moves.push(MoveIndex::new(o, n));
                }
            }
            None => {
                result.inserts.insert(n);
                insert_offset += 1;
            }
        }
        result.new_index_of.insert(new[n].diff_key(), n);
    }

    debug_assert_eq!(
        old.len() as isize + result.delta(),
        new.len() as isize,
        "diff result cannot reconcile array lengths; identity keys are likely non-deterministic",
    );

    result
}

// =============================================================================
// Tests
// =============================================================================
