//! Two-pointer intersection of sorted neighbor rows.

use core::cmp::Ordering;

use super::Vertex;

/// Returns the number of common elements of two ascending sequences.
///
/// Duplicates are matched pairwise, so the result is the cardinality of the
/// multiset intersection: `[1, 1, 2]` and `[1, 1, 1]` share two elements.
///
/// Runs in \(O(|a| + |b|)\) and never allocates. Both inputs must be sorted
/// ascending; on unsorted input the count is meaningless.
#[inline]
pub fn common_count(a: &[Vertex], b: &[Vertex]) -> u32 {
    debug_assert!(a.windows(2).all(|w| w[0] <= w[1]), "left row not sorted");
    debug_assert!(b.windows(2).all(|w| w[0] <= w[1]), "right row not sorted");

    let (mut i, mut j) = (0usize, 0usize);
    let mut count = 0u32;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}
