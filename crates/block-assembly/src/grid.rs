//! Dense rectangular grid of blocks.

use crate::error::{AssemblyError, Result};
use crate::partition::{block_linear_index, block_multi_index, shape_len};

/// A dense rectangular grid with a known shape, stored in row-major order.
///
/// The elements are usually [`DenseArray`](crate::DenseArray) blocks to be
/// tiled by [`assemble_block`](crate::assemble_block), but the grid itself
/// places no requirement on them.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGrid<A> {
    dims: Vec<usize>,
    elements: Vec<A>,
}

impl<A> BlockGrid<A> {
    /// Create a grid from row-major elements.
    pub fn new(dims: Vec<usize>, elements: Vec<A>) -> Result<Self> {
        match shape_len(&dims) {
            Some(len) if len == elements.len() => Ok(Self { dims, elements }),
            expected => Err(AssemblyError::ShapeMismatch {
                expected_len: expected.unwrap_or(usize::MAX),
                actual_len: elements.len(),
                dims,
            }),
        }
    }

    /// Create a rank-1 grid.
    pub fn from_vec(elements: Vec<A>) -> Self {
        Self {
            dims: vec![elements.len()],
            elements,
        }
    }

    /// Create a grid by evaluating `f` at every multi-index in row-major order.
    ///
    /// Fails with [`AssemblyError::ShapeMismatch`] if the number of grid
    /// positions overflows `usize`.
    pub fn from_fn<F>(dims: &[usize], mut f: F) -> Result<Self>
    where
        F: FnMut(&[usize]) -> A,
    {
        let len = shape_len(dims).ok_or_else(|| AssemblyError::ShapeMismatch {
            expected_len: usize::MAX,
            actual_len: 0,
            dims: dims.to_vec(),
        })?;
        let elements = (0..len)
            .map(|linear| f(&block_multi_index(linear, dims)))
            .collect();
        Ok(Self {
            dims: dims.to_vec(),
            elements,
        })
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Number of grid positions.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when some grid axis has extent 0.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at a multi-index, or `None` when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&A> {
        if index.len() != self.dims.len() || index.iter().zip(&self.dims).any(|(&i, &d)| i >= d)
        {
            return None;
        }
        self.elements.get(block_linear_index(index, &self.dims))
    }

    /// Elements in row-major order.
    pub fn elements(&self) -> &[A] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<A> {
        self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.elements.iter()
    }

    /// Apply `f` to every element, keeping the grid shape.
    pub fn map<B, F>(self, f: F) -> BlockGrid<B>
    where
        F: FnMut(A) -> B,
    {
        BlockGrid {
            dims: self.dims,
            elements: self.elements.into_iter().map(f).collect(),
        }
    }
}

impl<A> IntoIterator for BlockGrid<A> {
    type Item = A;
    type IntoIter = std::vec::IntoIter<A>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, A> IntoIterator for &'a BlockGrid<A> {
    type Item = &'a A;
    type IntoIter = std::slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<A> FromIterator<A> for BlockGrid<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
