//! Where blocks land along an assembled axis, plus row-major index helpers.

use std::ops::Range;

/// Split of one assembled axis into the spans contributed by each grid
/// position along it.
///
/// Assembling a grid whose first block row has height 2 and whose second
/// has height 5 gives axis 0 the boundaries `[0, 2, 7]`: rows `0..2` come
/// from the first block row and rows `2..7` from the second.
///
/// ```
/// use block_assembly::BlockPartition;
///
/// let rows = BlockPartition::new(vec![2, 5]);
/// assert_eq!(rows.total_dim(), 7);
/// assert_eq!(rows.block_range(1), Some(2..7));
/// assert_eq!(rows.locate(4), Some((1, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPartition {
    /// Block boundaries along the axis, starting at 0 and ending at the
    /// assembled extent. Always non-decreasing with at least one entry.
    bounds: Vec<usize>,
}

impl BlockPartition {
    /// Partition from the extent each grid position contributes.
    pub fn new(block_sizes: Vec<usize>) -> Self {
        let bounds = std::iter::once(0)
            .chain(block_sizes.iter().scan(0, |end, &size| {
                *end += size;
                Some(*end)
            }))
            .collect();
        Self { bounds }
    }

    /// Number of grid positions along the axis.
    pub fn num_blocks(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Extent of the assembled axis.
    pub fn total_dim(&self) -> usize {
        self.bounds.last().copied().unwrap_or(0)
    }

    /// Extent contributed by each grid position, in order.
    pub fn block_sizes(&self) -> Vec<usize> {
        self.bounds.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Span of the assembled axis covered by grid position `block`.
    pub fn block_range(&self, block: usize) -> Option<Range<usize>> {
        let start = *self.bounds.get(block)?;
        let end = *self.bounds.get(block + 1)?;
        Some(start..end)
    }

    /// Grid position covering `position` on the assembled axis, and the
    /// offset of `position` inside that block.
    ///
    /// Empty blocks never cover anything.
    pub fn locate(&self, position: usize) -> Option<(usize, usize)> {
        if position >= self.total_dim() {
            return None;
        }
        // Last boundary <= position; skips empty blocks sharing that start.
        let block = self.bounds.partition_point(|&b| b <= position) - 1;
        Some((block, position - self.bounds[block]))
    }
}

/// Multi-dimensional index into a grid or array.
pub type MultiIndex = Vec<usize>;

/// Row-major linear position of `index` in a shape `dims`.
pub fn block_linear_index(index: &[usize], dims: &[usize]) -> usize {
    index
        .iter()
        .zip(dims)
        .fold(0, |linear, (&i, &d)| linear * d + i)
}

/// Row-major multi-index of `linear` in a shape `dims`.
///
/// Axes of extent 0 are left at index 0.
pub fn block_multi_index(linear: usize, dims: &[usize]) -> MultiIndex {
    let mut index = vec![0; dims.len()];
    let mut rest = linear;
    for (slot, &d) in index.iter_mut().zip(dims).rev() {
        if d > 0 {
            *slot = rest % d;
            rest /= d;
        }
    }
    index
}

/// Number of elements of a shape, or `None` when the running product of
/// its extents, taken from the first axis, overflows `usize`.
pub(crate) fn shape_len(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |len, &d| len.checked_mul(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_sizes() {
        let p = BlockPartition::new(vec![3, 4, 3]);
        assert_eq!(p.num_blocks(), 3);
        assert_eq!(p.total_dim(), 10);
        assert_eq!(p.block_sizes(), vec![3, 4, 3]);
        assert_eq!(p.block_range(2), Some(7..10));
        assert_eq!(p.block_range(3), None);
    }

    #[test]
    fn test_no_blocks() {
        let p = BlockPartition::new(vec![]);
        assert_eq!(p.num_blocks(), 0);
        assert_eq!(p.total_dim(), 0);
        assert_eq!(p.block_range(0), None);
        assert_eq!(p.locate(0), None);
    }

    #[test]
    fn test_locate_skips_empty_blocks() {
        let p = BlockPartition::new(vec![2, 0, 0, 3]);
        assert_eq!(p.block_range(1), Some(2..2));
        assert_eq!(p.locate(1), Some((0, 1)));
        assert_eq!(p.locate(2), Some((3, 0)));
        assert_eq!(p.locate(4), Some((3, 2)));
        assert_eq!(p.locate(5), None);
    }

    #[test]
    fn test_linear_index() {
        let dims = [2, 3, 4];
        assert_eq!(block_linear_index(&[0, 0, 1], &dims), 1);
        assert_eq!(block_linear_index(&[0, 1, 0], &dims), 4);
        assert_eq!(block_linear_index(&[1, 2, 3], &dims), 23);

        for linear in 0..24 {
            assert_eq!(block_linear_index(&block_multi_index(linear, &dims), &dims), linear);
        }
    }

    #[test]
    fn test_scalar_index() {
        assert_eq!(block_linear_index(&[], &[]), 0);
        assert!(block_multi_index(0, &[]).is_empty());
    }

    #[test]
    fn test_shape_len() {
        assert_eq!(shape_len(&[]), Some(1));
        assert_eq!(shape_len(&[2, 3, 4]), Some(24));
        assert_eq!(shape_len(&[usize::MAX, 2]), None);
        assert_eq!(shape_len(&[0, usize::MAX, 2]), Some(0));
        assert_eq!(shape_len(&[usize::MAX, 2, 0]), None);
    }
}
