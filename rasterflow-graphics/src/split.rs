//! Cooperative work splits.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One caller's share of a frame operation.
///
/// A split owns the tiles whose index is congruent to `index` modulo
/// `count`. N callers invoking the same operation with splits `0..N` cover
/// every tile exactly once, so the operation needs no locking; the result is
/// byte-identical for any `count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Split {
    index: u32,
    count: u32,
}

impl Split {
    /// The whole operation in one call.
    pub const SINGLE: Split = Split { index: 0, count: 1 };

    /// Split `index` out of `count` cooperative calls.
    ///
    /// # Panics
    /// When `count` is zero or `index` is out of range.
    pub fn new(index: u32, count: u32) -> Self {
        assert!(count > 0, "split count must be non-zero");
        assert!(index < count, "split index {index} out of range 0..{count}");
        Self { index, count }
    }

    /// This caller's index.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Total number of cooperative callers.
    #[inline]
    pub fn count(self) -> u32 {
        self.count
    }

    /// Tile indices owned by this split, in increasing order.
    #[inline]
    pub(crate) fn tiles(self, tile_count: u32) -> impl Iterator<Item = u32> {
        (self.index..tile_count).step_by(self.count as usize)
    }
}

impl Default for Split {
    fn default() -> Self {
        Self::SINGLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_partition_tiles() {
        let mut seen = vec![0u32; 11];
        for index in 0..4 {
            for tile in Split::new(index, 4).tiles(11) {
                seen[tile as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn single_split_owns_everything() {
        assert_eq!(Split::SINGLE.tiles(5).collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_panics() {
        Split::new(3, 3);
    }
}
