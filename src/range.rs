//! Closed index ranges and the visible-window padding helper.
//!
//! Windowed diffing works over closed integer ranges of item indices. A
//! consumer reports the range it can currently see; [`IndexRange::padded`]
//! symmetrically widens it by one window width as a prefetch safety margin,
//! clamped to the known item count.

use std::fmt;

/// Closed range of item indices, `lower..=upper`.
///
/// Always non-empty: `lower <= upper` is a constructor invariant, so
/// [`len`](IndexRange::len) is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct IndexRange {
    lower: usize,
    upper: usize,
}

impl IndexRange {
    /// Create a closed range `lower..=upper`.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`; a closed index range cannot be empty.
    pub fn new(lower: usize, upper: usize) -> Self {
        assert!(
            lower <= upper,
            "invalid index range: lower {lower} > upper {upper}"
        );
        Self { lower, upper }
    }

    /// First index in the range.
    #[inline]
    pub const fn lower(&self) -> usize {
        self.lower
    }

    /// Last index in the range (inclusive).
    #[inline]
    pub const fn upper(&self) -> usize {
        self.upper
    }

    /// Number of indices covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.upper - self.lower + 1
    }

    /// Whether `index` falls inside the range.
    #[inline]
    pub const fn contains(&self, index: usize) -> bool {
        self.lower <= index && index <= self.upper
    }

    /// Iterate the covered indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + use<> {
        self.lower..=self.upper
    }

    /// Symmetrically widen this range by its own width, clamped to
    /// `max_total_count` items.
    ///
    /// Used to pad a visible range with prefetch margins before fetching
    /// window slices. Total: never fails, degrades to returning `self`
    /// unchanged when the data for this range is not yet available
    /// (`max_total_count` is zero or does not reach `lower`).
    ///
    /// # Example
    ///
    /// ```
    /// use listdiff::IndexRange;
    ///
    /// let visible = IndexRange::new(20, 30);
    /// assert_eq!(visible.padded(50), IndexRange::new(9, 41));
    ///
    /// // Clamped at the last valid index.
    /// let visible = IndexRange::new(35, 45);
    /// assert_eq!(visible.padded(50), IndexRange::new(24, 49));
    /// ```
    pub fn padded(self, max_total_count: usize) -> IndexRange {
        if max_total_count == 0 || max_total_count <= self.lower {
            return self;
        }

        let width = self.len();
        let lower = self.lower.saturating_sub(width);
        let upper = (self.upper + width).min(max_total_count - 1);

        if lower > upper {
            // Unreachable under the guards above; degrade instead of failing.
            tracing::warn!(
                range = %self,
                max_total_count,
                "padded range arithmetic produced an empty range; returning input",
            );
            return self;
        }

        IndexRange { lower, upper }
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

impl From<std::ops::RangeInclusive<usize>> for IndexRange {
    fn from(range: std::ops::RangeInclusive<usize>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

// =============================================================================
// Tests
// =============================================================================
