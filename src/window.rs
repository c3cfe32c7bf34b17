//! Windowed ("lazy") diffing over partially materialized stores.
//!
//! Full diffing needs both arrays in memory. Large lists backed by paging
//! data sources only materialize the slice a consumer can see, so the
//! windowed driver runs the full engine over just the visible range and
//! extrapolates the invisible remainder from total-count deltas alone:
//! exact inside the window, O(window) instead of O(total).
//!
//! # Tail bias
//!
//! All off-window count change is modeled as appends/truncations past the
//! end of the old sequence. The driver does not distinguish change before
//! the window from change after it; an ordered-list consumer scrolled to a
//! window only needs tail-biased correctness, and this asymmetry is part of
//! the contract. Do not "improve" it.
//!
//! # Fallback, not failure
//!
//! Every condition the window cannot represent maps to `None` from
//! [`windowed_diff`] (or a [`WindowError`] from [`try_windowed_diff`]).
//! These are expected, frequent outcomes: the caller falls back to a full
//! replace. Nothing here retries or panics.

use thiserror::Error;
use tracing::debug;

use crate::diff::diff;
use crate::diffable::Diffable;
use crate::range::IndexRange;
use crate::result::DiffResult;

// =============================================================================
// Store contract
// =============================================================================

/// Capability contract for a possibly-partial ordered item store.
///
/// The driver only needs three things: a snapshot token, the total item
/// count, and a best-effort range fetch. `items_in` returns `None` whenever
/// the store cannot currently serve the exact range (not yet materialized,
/// past the end, mid-invalidation); the driver treats that as a fallback
/// signal, never an error.
pub trait ItemStore {
    /// The item type this store yields.
    type Item: Diffable;

    /// Monotonic state identifier, bumped on every mutation.
    ///
    /// The driver does not consume this; it exists for callers enforcing
    /// the compute-then-apply contract. A result computed against one
    /// `state_id` is stale once the id changes and must be discarded, not
    /// applied.
    fn state_id(&self) -> u64;

    /// Total number of items, including unmaterialized ones.
    fn total_count(&self) -> usize;

    /// Items for the closed `range`, or `None` if the store cannot serve
    /// exactly that range right now.
    fn items_in(&self, range: IndexRange) -> Option<Vec<Self::Item>>;
}

// =============================================================================
// Fallback taxonomy
// =============================================================================

/// Why a windowed diff could not produce an applicable result.
///
/// Every variant means "fall back to a full replace". None of these are
/// defects; they are the normal vocabulary of diffing against moving,
/// partially loaded data.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    /// The old store does not back the visible range.
    #[error("old store holds {total} items but the window extends to index {upper}")]
    WindowNotBacked {
        /// Old store's total count.
        total: usize,
        /// Upper bound of the requested window.
        upper: usize,
    },

    /// The old store could not serve the visible range.
    #[error("old store could not serve range {0}")]
    OldRangeUnavailable(IndexRange),

    /// The new store could not serve the visible range.
    #[error("new store could not serve range {0}")]
    NewRangeUnavailable(IndexRange),

    /// A store served the range but returned no items; windowed diffing is
    /// undefined with nothing to compare.
    #[error("fetched window slice is empty")]
    EmptyWindow,

    /// The tail-deletion region implied by the count delta has negative
    /// width or starts before index 0; the caller-supplied counts are
    /// inconsistent with the window.
    #[error("cannot express tail deletion for total delta {total_delta}")]
    InfeasibleTailDeletion {
        /// Count change between the stores.
        total_delta: i64,
    },

    /// After extrapolation the result still cannot reconcile the stores'
    /// counts. Refuse to hand it back: correctness over availability.
    #[error("window delta {window_delta} cannot reconcile total delta {total_delta}")]
    UnreconciledDelta {
        /// Net delta of the assembled result.
        window_delta: i64,
        /// Count change between the stores.
        total_delta: i64,
    },
}

// =============================================================================
// Driver
// =============================================================================

/// Diff the visible window of two stores, extrapolating the rest.
///
/// Returns `None` whenever the window cannot produce an applicable result;
/// the caller should fall back to a full replace. See [`try_windowed_diff`]
/// for the same computation with the fallback reason preserved.
///
/// # Example
///
/// ```
/// use listdiff::{windowed_diff, IndexRange, ItemStore};
///
/// struct Letters(Vec<char>);
///
/// impl ItemStore for Letters {
///     type Item = char;
///     fn state_id(&self) -> u64 { 0 }
///     fn total_count(&self) -> usize { self.0.len() }
///     fn items_in(&self, range: IndexRange) -> Option<Vec<char>> {
///         (range.upper() < self.0.len())
///             .then(|| self.0[range.lower()..=range.upper()].to_vec())
///     }
/// }
///
/// let old = Letters(vec!['b', 'd']);
/// let new = Letters(vec!['a', 'b', 'c', 'd']);
/// let result = windowed_diff(&old, &new, IndexRange::new(0, 1)).unwrap();
/// assert_eq!(result.delta(), 2);
/// ```
pub fn windowed_diff<O, N>(
    old_store: &O,
    new_store: &N,
    visible: IndexRange,
) -> Option<DiffResult<<O::Item as Diffable>::Key>>
where
    O: ItemStore,
    N: ItemStore<Item = O::Item>,
{
    match try_windowed_diff(old_store, new_store, visible) {
        Ok(result) => Some(result),
        Err(reason) => {
            debug!(%visible, %reason, "windowed diff fell back to full replace");
            None
        }
    }
}

/// [`windowed_diff`] with the fallback reason preserved.
///
/// The `Err` arm is an expected outcome, not a defect; it exists so callers
/// and logs can tell the fallback conditions apart.
pub fn try_windowed_diff<O, N>(
    old_store: &O,
    new_store: &N,
    visible: IndexRange,
) -> Result<DiffResult<<O::Item as Diffable>::Key>, WindowError>
where
    O: ItemStore,
    N: ItemStore<Item = O::Item>,
{
    let old_total = old_store.total_count();
    let new_total = new_store.total_count();

    // The visible range must be fully backed by old data.
    if old_total <= visible.upper() {
        return Err(WindowError::WindowNotBacked {
            total: old_total,
            upper: visible.upper(),
        });
    }

    let old_items = old_store
        .items_in(visible)
        .ok_or(WindowError::OldRangeUnavailable(visible))?;
    let new_items = new_store
        .items_in(visible)
        .ok_or(WindowError::NewRangeUnavailable(visible))?;
    if old_items.is_empty() || new_items.is_empty() {
        return Err(WindowError::EmptyWindow);
    }

    // Window-local diff, positions 0-based within the slice.
    let base = diff(&old_items, &new_items);

    // A pure content update with matching totals has no structural change
    // anywhere, inside or outside the window. Hand it back as in-place
    // updates; converting to delete+insert would be worse to animate.
    if base.only_contains_updates() && old_total == new_total {
        return Ok(base.shifted(visible.lower()));
    }

    let mut result = base.for_batch_apply().shifted(visible.lower());

    // Attribute the count change the window did not explain to the tail of
    // the old sequence.
    let total_delta = new_total as i64 - old_total as i64;
    let window_delta = result.delta() as i64;
    let tail_delta = total_delta - window_delta;

    if tail_delta > 0 {
        for index in old_total..old_total + tail_delta as usize {
            result.inserts.insert(index);
        }
    } else if tail_delta < 0 {
        let last_index = old_total as i64 - 1;
        let lower_bound = last_index - (-total_delta - 1);
        if lower_bound > last_index || lower_bound < 0 {
            return Err(WindowError::InfeasibleTailDeletion { total_delta });
        }
        for index in lower_bound as usize..=last_index as usize {
            result.deletes.insert(index);
        }
    }

    if result.delta() as i64 != total_delta {
        return Err(WindowError::UnreconciledDelta {
            window_delta: result.delta() as i64,
            total_delta,
        });
    }

    Ok(result)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::MoveIndex;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rustc_hash::FxHashSet;

    /// Test item: identity is a letter, content a version number.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Item {
        id: char,
        version: u32,
    }

    impl Diffable for Item {
        type Key = char;

        fn diff_key(&self) -> char {
            self.id
        }

        fn content_eq(&self, other: &Self) -> bool {
            self.version == other.version
        }
    }

    /// In-memory store over a fully materialized vector.
    #[derive(Debug)]
    struct VecStore {
        items: Vec<Item>,
        state: u64,
    }

    impl VecStore {
        fn of(ids: &str) -> Self {
            Self {
                items: ids.chars().map(|id| Item { id, version: 1 }).collect(),
                state: 1,
            }
        }

        fn bump(&mut self, id: char) {
            for item in &mut self.items {
                if item.id == id {
                    item.version += 1;
                }
            }
            self.state += 1;
        }
    }

    impl ItemStore for VecStore {
        type Item = Item;

        fn state_id(&self) -> u64 {
            self.state
        }

        fn total_count(&self) -> usize {
            self.items.len()
        }

        fn items_in(&self, range: IndexRange) -> Option<Vec<Item>> {
            (range.upper() < self.items.len())
                .then(|| self.items[range.lower()..=range.upper()].to_vec())
        }
    }

    /// Store that refuses every fetch, regardless of its advertised count.
    struct UnreadyStore {
        total: usize,
    }

    impl ItemStore for UnreadyStore {
        type Item = Item;

        fn state_id(&self) -> u64 {
            0
        }

        fn total_count(&self) -> usize {
            self.total
        }

        fn items_in(&self, _range: IndexRange) -> Option<Vec<Item>> {
            None
        }
    }

    fn set(indices: &[usize]) -> FxHashSet<usize> {
        indices.iter().copied().collect()
    }

    #[test]
    fn test_window_grow_extrapolates_tail_inserts() {
        let old = VecStore::of("bd");
        let new = VecStore::of("abcd");

        let result = windowed_diff(&old, &new, IndexRange::new(0, 1)).unwrap();
        assert_eq!(result.deletes, set(&[1]));
        assert_eq!(result.inserts, set(&[0, 2, 3]));
        assert_eq!(result.change_count(), 4);
        assert_eq!(result.delta(), 2);
    }

    #[test]
    fn test_window_shrink_extrapolates_tail_deletes() {
        let old = VecStore::of("abcdefghij");
        let new = VecStore::of("abcdef");

        // Window content identical; the whole delta lives past the window.
        let result = windowed_diff(&old, &new, IndexRange::new(0, 2)).unwrap();
        assert!(result.inserts.is_empty());
        assert_eq!(result.deletes, set(&[6, 7, 8, 9]));
        assert_eq!(result.delta(), -4);
    }

    #[test]
    fn test_unservable_new_window_falls_back() {
        let old = VecStore::of("abcdefg");
        let new = VecStore::of("fe");
        let visible = IndexRange::new(4, 6);

        assert_eq!(windowed_diff(&old, &new, visible), None);
        assert_eq!(
            try_windowed_diff(&old, &new, visible),
            Err(WindowError::NewRangeUnavailable(visible)),
        );
    }

    #[test]
    fn test_window_not_backed_by_old_store() {
        let old = VecStore::of("abc");
        let new = VecStore::of("abcdef");
        let visible = IndexRange::new(2, 4);

        assert_eq!(
            try_windowed_diff(&old, &new, visible),
            Err(WindowError::WindowNotBacked { total: 3, upper: 4 }),
        );
    }

    #[test]
    fn test_window_exactly_at_old_count_falls_back() {
        // total_count must exceed the upper bound, not merely reach it.
        let old = VecStore::of("abc");
        let new = VecStore::of("abc");

        assert_eq!(windowed_diff(&old, &new, IndexRange::new(0, 2)), None);

        // [0,1] is backed (3 > 1) and identical: empty result, not None.
        let result = try_windowed_diff(&old, &new, IndexRange::new(0, 1)).unwrap();
        assert!(!result.has_changes());
    }

    #[test]
    fn test_unready_old_store_falls_back() {
        let old = UnreadyStore { total: 10 };
        let new = VecStore::of("abcdefghij");
        let visible = IndexRange::new(0, 3);

        assert_eq!(
            try_windowed_diff(&old, &new, visible),
            Err(WindowError::OldRangeUnavailable(visible)),
        );
    }

    #[test]
    fn test_pure_update_passes_through_unconverted() {
        let old = VecStore::of("abcdef");
        let mut new = VecStore::of("abcdef");
        new.bump('c');
        new.bump('d');

        let result = windowed_diff(&old, &new, IndexRange::new(2, 4)).unwrap();
        assert!(result.only_contains_updates());
        // Window-local indices 0 and 1, shifted by the window start.
        assert_eq!(result.updates, set(&[2, 3]));
        assert!(result.inserts.is_empty());
        assert!(result.deletes.is_empty());
    }

    #[test]
    fn test_update_with_count_change_is_batch_converted() {
        // 'c' updated inside the window while the list also grew at the
        // tail: totals differ, so the update must become delete+insert.
        let old = VecStore::of("abcd");
        let mut new = VecStore::of("abcde");
        new.bump('c');

        let result = windowed_diff(&old, &new, IndexRange::new(0, 3)).unwrap();
        assert!(result.updates.is_empty());
        assert!(result.deletes.contains(&2));
        assert!(result.inserts.contains(&2));
        assert!(result.inserts.contains(&4));
        assert_eq!(result.delta(), 1);
    }

    #[test]
    fn test_window_move_shifted_to_absolute_indices() {
        let old = VecStore::of("xxabcd");
        let new = VecStore::of("xxacbd");

        let result = windowed_diff(&old, &new, IndexRange::new(2, 5)).unwrap();
        assert_eq!(
            result.moves,
            vec![MoveIndex::new(4, 3), MoveIndex::new(3, 4)]
        );
        assert_eq!(result.change_count(), 2);
    }

    #[test]
    fn test_state_id_reflects_mutation() {
        let mut store = VecStore::of("abc");
        let before = store.state_id();
        store.bump('a');
        assert!(store.state_id() > before);
    }

    #[test]
    fn test_error_display() {
        let err = WindowError::WindowNotBacked { total: 3, upper: 4 };
        assert_eq!(
            err.to_string(),
            "old store holds 3 items but the window extends to index 4",
        );

        let err = WindowError::OldRangeUnavailable(IndexRange::new(4, 6));
        assert_eq!(err.to_string(), "old store could not serve range [4, 6]");
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn store() -> impl Strategy<Value = VecStore> {
        proptest::collection::vec(
            (proptest::char::range('a', 'f'), 1u32..3).prop_map(|(id, version)| Item { id, version }),
            0..20,
        )
        .prop_map(|items| VecStore { items, state: 1 })
    }

    proptest! {
        /// Whenever the driver returns a result, its delta reconciles the
        /// two stores' total counts exactly.
        #[test]
        fn prop_windowed_delta_reconciles_counts(
            old in store(),
            new in store(),
            lower in 0usize..20,
            width in 0usize..8,
        ) {
            let visible = IndexRange::new(lower, lower + width);
            if let Some(result) = windowed_diff(&old, &new, visible) {
                let total_delta =
                    new.total_count() as i64 - old.total_count() as i64;
                prop_assert_eq!(result.delta() as i64, total_delta);
            }
        }

        /// Identical stores over any backed window yield an empty result.
        #[test]
        fn prop_same_store_windowed_diff_is_empty(
            old in store(),
            lower in 0usize..20,
            width in 0usize..8,
        ) {
            let visible = IndexRange::new(lower, lower + width);
            let new = VecStore { items: old.items.clone(), state: old.state };
            if let Some(result) = windowed_diff(&old, &new, visible) {
                prop_assert!(!result.has_changes());
            }
        }
    }
}
