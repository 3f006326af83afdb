//! Block concatenation: tile a grid of arrays into one dense array.
//!
//! Grid axis `k` tiles array axis `k`. The grid is folded from its last
//! axis down to its first: for every index along the last grid axis the
//! sub-grid at that index is assembled recursively, and the resulting
//! pieces are concatenated along that axis. At the first axis the pieces
//! are the blocks themselves.
//!
//! Blocks whose rank is below the grid rank behave as if they had trailing
//! axes of extent 1, so a row of column vectors assembles into a matrix.

use crate::dense::DenseArray;
use crate::error::{AssemblyError, Result};
use crate::flatmap::{elementwise_map, Sources};
use crate::grid::BlockGrid;
use crate::partition::{block_linear_index, block_multi_index, BlockPartition};

/// Concatenate a grid of blocks along every grid axis.
///
/// Along each axis the result's extent is the sum of the extents of the
/// blocks varying along that axis. Adjacent blocks that disagree on an
/// axis they share yield [`AssemblyError::DimensionMismatch`]. A grid with
/// an axis of extent 0 assembles into an array whose extents are all 0.
///
/// # Example
/// ```
/// use block_assembly::{assemble_block, BlockGrid, DenseArray};
///
/// let a = DenseArray::from_vec(vec![1, 2, 3]);
/// let b = DenseArray::from_vec(vec![4, 5, 6]);
///
/// // A 1 x 2 grid of column vectors is a 3 x 2 matrix.
/// let grid = BlockGrid::new(vec![1, 2], vec![a, b]).unwrap();
/// let m = assemble_block(&grid).unwrap();
/// assert_eq!(m.dims(), vec![3, 2]);
/// assert_eq!(m.as_slice(), &[1, 4, 2, 5, 3, 6]);
/// ```
pub fn assemble_block<T: Clone>(grid: &BlockGrid<DenseArray<T>>) -> Result<DenseArray<T>> {
    let rank = result_rank(grid);
    tracing::debug!(grid_dims = ?grid.dims(), rank, "assemble_block");

    if grid.is_empty() {
        return DenseArray::from_vec_with_shape(Vec::new(), &vec![0; rank]);
    }
    // Every block must match the extents of its grid row and column.
    block_partitions(grid)?;

    let mut blocks: Vec<DenseArray<T>> =
        grid.iter().map(|b| b.clone().pad_rank(rank)).collect();
    if grid.rank() == 0 {
        return Ok(blocks.swap_remove(0));
    }
    let refs: Vec<&DenseArray<T>> = blocks.iter().collect();
    let out = fold_axes(&refs, grid.dims())?;
    tracing::debug!(dims = ?out.dims(), "assembled block grid");
    Ok(out)
}

/// Map `f` over zipped sources and assemble the results as a rank-1 grid.
///
/// Equivalent to `assemble_block(&BlockGrid::from_vec(map(f, sources)))`.
pub fn assemble_block_with<S, F, T>(f: F, sources: S) -> Result<DenseArray<T>>
where
    S: Sources,
    F: FnMut(S::Item) -> DenseArray<T>,
    T: Clone,
{
    let blocks = elementwise_map(f, sources).collect::<Result<Vec<_>>>()?;
    assemble_block(&BlockGrid::from_vec(blocks))
}

/// Map `f` over zipped sources and assemble the results as a grid of shape
/// `grid_dims`, filled in row-major order.
pub fn assemble_block_grid_with<S, F, T>(
    grid_dims: &[usize],
    f: F,
    sources: S,
) -> Result<DenseArray<T>>
where
    S: Sources,
    F: FnMut(S::Item) -> DenseArray<T>,
    T: Clone,
{
    let blocks = elementwise_map(f, sources).collect::<Result<Vec<_>>>()?;
    assemble_block(&BlockGrid::new(grid_dims.to_vec(), blocks)?)
}

/// Validate the grid and report where its blocks land in the assembled array.
///
/// Returns one partition per grid axis: entry `i` of the partition for axis
/// `k` is the extent, along array axis `k`, of every block at grid index `i`
/// on that axis. Fails with [`AssemblyError::DimensionMismatch`] if blocks
/// sharing a grid index on axis `k` disagree on their extent along `k`, or
/// if blocks disagree on an axis not covered by the grid.
pub fn block_partitions<T>(grid: &BlockGrid<DenseArray<T>>) -> Result<Vec<BlockPartition>> {
    let rank = result_rank(grid);
    let grid_dims = grid.dims();
    if grid.is_empty() {
        return Ok(grid_dims.iter().map(|&n| BlockPartition::new(vec![0; n])).collect());
    }

    let padded = |b: &DenseArray<T>| {
        let mut dims = b.dims();
        dims.resize(rank.max(dims.len()), 1);
        dims
    };

    // Extents along grid axis k are read off the blocks at index 0 on every
    // other grid axis.
    let axis_sizes: Vec<Vec<usize>> = grid_dims
        .iter()
        .enumerate()
        .map(|(axis, &n)| {
            (0..n)
                .map(|i| {
                    let mut index = vec![0; grid_dims.len()];
                    index[axis] = i;
                    padded(&grid.elements()[block_linear_index(&index, grid_dims)])[axis]
                })
                .collect()
        })
        .collect();

    let first = padded(&grid.elements()[0]);
    for (linear, block) in grid.iter().enumerate() {
        let mut expected = first.clone();
        for (axis, i) in block_multi_index(linear, grid_dims).into_iter().enumerate() {
            expected[axis] = axis_sizes[axis][i];
        }
        let actual = padded(block);
        if let Some(axis) = (0..rank).find(|&a| expected[a] != actual[a]) {
            tracing::debug!(linear, axis, ?expected, ?actual, "misaligned block");
            return Err(AssemblyError::DimensionMismatch {
                axis,
                expected,
                actual,
            });
        }
    }
    Ok(axis_sizes.into_iter().map(BlockPartition::new).collect())
}

fn result_rank<T>(grid: &BlockGrid<DenseArray<T>>) -> usize {
    grid.iter()
        .map(DenseArray::rank)
        .max()
        .unwrap_or(0)
        .max(grid.rank())
}

/// Assemble a non-empty row-major sub-grid of shape `grid_dims`.
fn fold_axes<T: Clone>(blocks: &[&DenseArray<T>], grid_dims: &[usize]) -> Result<DenseArray<T>> {
    let axis = grid_dims.len() - 1;
    if axis == 0 {
        return DenseArray::concat(blocks, 0);
    }

    let n = grid_dims[axis];
    let sub_dims = &grid_dims[..axis];
    let mut pieces = Vec::with_capacity(n);
    for i in 0..n {
        let sub: Vec<&DenseArray<T>> = blocks.iter().skip(i).step_by(n).copied().collect();
        pieces.push(fold_axes(&sub, sub_dims)?);
    }
    tracing::trace!(axis, pieces = n, "concatenating sub-grids");
    let refs: Vec<&DenseArray<T>> = pieces.iter().collect();
    DenseArray::concat(&refs, axis)
}
