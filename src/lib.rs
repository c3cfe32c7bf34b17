//! listdiff - Identity-keyed list diffing for incremental UIs
//!
//! Computes the minimal set of insert/delete/move/update operations that
//! transforms one ordered, identity-bearing sequence into another, so a
//! list host can animate only the changed positions instead of replacing
//! the whole sequence.
//!
//! ## Core Concepts
//!
//! **Identity vs. content**: every item exposes a stable identity key (who
//! it is) and a content comparison (what it currently looks like) via the
//! [`Diffable`] trait. Matching runs on identity; content differences on a
//! matched pair become in-place updates.
//!
//! **Two entry points**:
//! - [`diff`] — exact O(n) reconciliation of two full sequences.
//! - [`windowed_diff`] — the same engine over only a visible window of two
//!   much larger, possibly partially materialized stores, extrapolating the
//!   unseen remainder from total-count deltas. Exact inside the window,
//!   O(window) cost, tail-biased outside it.
//!
//! ## Modules
//! - `diffable`: identity & equality contract
//! - `diff`: the occurrence-counting diff engine
//! - `result`: [`DiffResult`] and its post-processing transforms
//! - `window`: [`ItemStore`] contract and the windowed diff driver
//! - `range`: closed index ranges and window padding
//!
//! ## Usage
//!
//! ```
//! use listdiff::diff;
//!
//! let old = vec!["apple", "banana", "cherry"];
//! let new = vec!["banana", "apple", "cherry", "date"];
//!
//! let result = diff(&old, &new);
//! assert_eq!(result.inserts.len(), 1); // "date"
//! assert!(result.deletes.is_empty());
//! assert!(!result.moves.is_empty()); // the swap
//!
//! // Safe to hand to a host that applies everything in one batch:
//! let batch = result.for_batch_apply();
//! assert!(batch.updates.is_empty());
//! ```
//!
//! ## Concurrency
//!
//! Everything here is a pure, synchronous function of its inputs: no shared
//! state, no locking, no retries. Results are independent values; compute
//! on any thread, but apply against the same snapshot you diffed (see
//! [`ItemStore::state_id`]).

// =============================================================================
// Core modules
// =============================================================================

/// Identity & equality contract
pub mod diffable;

/// Occurrence-counting diff engine
pub mod diff;

/// Diff result and post-processing transforms
pub mod result;

/// Closed index ranges and window padding
pub mod range;

/// Item stores and the windowed diff driver
pub mod window;

// =============================================================================
// Re-exports
// =============================================================================

pub use diff::diff;
pub use diffable::Diffable;
pub use range::IndexRange;
pub use result::{DiffResult, MoveIndex};
pub use window::{try_windowed_diff, windowed_diff, ItemStore, WindowError};

// =============================================================================
// Tests
// =============================================================================
