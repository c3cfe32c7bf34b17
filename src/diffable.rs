//! Identity and equality contract for diffable items.
//!
//! The diff engine never compares items without an identity key. Every item
//! exposes two independent notions of sameness:
//!
//! - **Identity** (`diff_key`): "is this the same logical item?" Stable
//!   across edits, used to match positions between the old and new arrays.
//!   Duplicate keys within one sequence are legal; the engine matches the
//!   k-th occurrence in the new array to the k-th occurrence in the old.
//! - **Content equality** (`content_eq`): "does the matched item look the
//!   same?" Used only to detect in-place updates, never identity.
//!
//! # Why not `PartialEq` alone?
//!
//! A reordered item with edited content must produce a Move + Update, not a
//! Delete + Insert. That requires tracking *which* item moved independently
//! of *what* it currently contains, so the two comparisons must be separate.

use std::hash::Hash;

/// Contract required from items handed to [`diff`](crate::diff).
///
/// # Example
///
/// ```
/// use listdiff::Diffable;
///
/// #[derive(Clone)]
/// struct Row {
///     id: u64,
///     title: String,
/// }
///
/// impl Diffable for Row {
///     type Key = u64;
///
///     fn diff_key(&self) -> u64 {
///         self.id
///     }
///
///     fn content_eq(&self, other: &Self) -> bool {
///         self.title == other.title
///     }
/// }
/// ```
pub trait Diffable {
    /// Stable identity key. Must be deterministic for the lifetime of one
    /// diff invocation; a non-deterministic key breaks the engine's
    /// internal invariants (see crate docs on defect-class failures).
    type Key: Hash + Eq + Clone;

    /// The identity key of this item.
    fn diff_key(&self) -> Self::Key;

    /// Content comparison between two items already matched by identity.
    fn content_eq(&self, other: &Self) -> bool;
}

/// Implement [`Diffable`] for types that are their own identity.
///
/// For these types identity and content coincide, so an edit shows up as a
/// delete+insert rather than an update. Useful for tests and for sequences
/// of plain keys.
macro_rules! impl_self_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Diffable for $ty {
                type Key = $ty;

                #[inline]
                fn diff_key(&self) -> Self::Key {
                    self.clone()
                }

                #[inline]
                fn content_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_self_keyed!(
    char, bool, String, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

impl Diffable for &str {
    type Key = String;

    #[inline]
    fn diff_key(&self) -> String {
        (*self).to_string()
    }

    #[inline]
    fn content_eq(&self, other: &Self) -> bool {
        self == other
    }
}
