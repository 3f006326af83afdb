//! Dense N-dimensional array storage.

use mdarray::{DynRank, Shape, Tensor};

use crate::error::{AssemblyError, Result};
use crate::partition::{block_linear_index, shape_len};

/// Dense row-major array with dynamic rank, wrapping mdarray's `Tensor`.
///
/// This is the output type of every assembler and the block type of a
/// [`BlockGrid`](crate::BlockGrid). Shape information is stored within the
/// tensor, so reshapes and axis insertions only rewrite the shape.
#[derive(Debug, Clone)]
pub struct DenseArray<T>(Tensor<T, DynRank>);

impl<T> DenseArray<T> {
    /// Create an array from row-major data with explicit shape.
    ///
    /// Fails with [`AssemblyError::ShapeMismatch`] if `data` does not hold
    /// exactly as many elements as `dims` describes, including shapes whose
    /// element count overflows `usize`.
    pub fn from_vec_with_shape(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        match shape_len(dims) {
            Some(len) if len == data.len() => {}
            expected => {
                return Err(AssemblyError::ShapeMismatch {
                    expected_len: expected.unwrap_or(usize::MAX),
                    actual_len: data.len(),
                    dims: dims.to_vec(),
                })
            }
        }
        let tensor = Tensor::from(data).into_shape(DynRank::from_dims(dims));
        Ok(Self(tensor))
    }

    /// Create a rank-1 array.
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        let tensor = Tensor::from(data).into_shape(DynRank::from_dims(&[len]));
        Self(tensor)
    }

    /// Create a scalar (0-dimensional) array from a single value.
    pub fn from_scalar(val: T) -> Self {
        let tensor = Tensor::from(vec![val]).into_shape(DynRank::from_dims(&[]));
        Self(tensor)
    }

    /// Get the shape (dimensions).
    pub fn dims(&self) -> Vec<usize> {
        self.0.shape().with_dims(|d| d.to_vec())
    }

    /// Get the rank (number of dimensions).
    pub fn rank(&self) -> usize {
        self.0.rank()
    }

    /// Get the total number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the row-major data as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.0[..]
    }

    /// Convert to the row-major data, consuming the array.
    pub fn into_vec(self) -> Vec<T> {
        self.0.into_vec()
    }

    /// Get the element at a multi-index, or `None` when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        let dims = self.dims();
        if index.len() != dims.len() || index.iter().zip(&dims).any(|(&i, &d)| i >= d) {
            return None;
        }
        self.as_slice().get(block_linear_index(index, &dims))
    }

    /// Reshape to new dimensions with the same number of elements.
    ///
    /// The row-major data is kept as is; only the shape changes.
    pub fn reshape(self, dims: &[usize]) -> Result<Self> {
        Self::from_vec_with_shape(self.into_vec(), dims)
    }

    /// Insert an axis of extent 1 before position `axis`.
    ///
    /// `axis` ranges over `0..=rank`; `axis == rank` appends a new last axis.
    pub fn insert_axis(self, axis: usize) -> Result<Self> {
        let mut dims = self.dims();
        if axis > dims.len() {
            return Err(AssemblyError::AxisOutOfBounds {
                axis,
                rank: dims.len(),
            });
        }
        dims.insert(axis, 1);
        self.reshape(&dims)
    }

    /// Append trailing axes of extent 1 until the array has rank `rank`.
    ///
    /// Arrays already at or above `rank` are returned unchanged.
    pub fn pad_rank(self, rank: usize) -> Self {
        let mut dims = self.dims();
        if dims.len() >= rank {
            return self;
        }
        dims.resize(rank, 1);
        let tensor = Tensor::from(self.into_vec()).into_shape(DynRank::from_dims(&dims));
        Self(tensor)
    }
}

impl<T: Clone> DenseArray<T> {
    /// Take the sub-array at `index` along `axis`, dropping that axis.
    pub fn select(&self, axis: usize, index: usize) -> Result<Self> {
        let dims = self.dims();
        if axis >= dims.len() {
            return Err(AssemblyError::AxisOutOfBounds {
                axis,
                rank: dims.len(),
            });
        }
        if index >= dims[axis] {
            let mut bad = vec![0; dims.len()];
            bad[axis] = index;
            return Err(AssemblyError::IndexOutOfBounds { index: bad, dims });
        }

        let mut new_dims = dims.clone();
        new_dims.remove(axis);
        if self.is_empty() {
            return Self::from_vec_with_shape(Vec::new(), &new_dims);
        }

        // Every extent is nonzero from here, so partial products fit.
        let outer: usize = dims[..axis].iter().product();
        let inner: usize = dims[axis + 1..].iter().product();
        let data = self.as_slice();
        let mut out = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let start = (o * dims[axis] + index) * inner;
            out.extend_from_slice(&data[start..start + inner]);
        }

        Self::from_vec_with_shape(out, &new_dims)
    }

    /// Concatenate arrays along an existing axis.
    ///
    /// All parts must have the same rank and agree on every extent except
    /// `axis`. The result's extent along `axis` is the sum of the parts'.
    pub fn concat(parts: &[&DenseArray<T>], axis: usize) -> Result<Self> {
        let first = parts.first().ok_or(AssemblyError::EmptyInput {
            context: "concatenation needs at least one array",
        })?;
        let expected = first.dims();
        let rank = expected.len();
        if axis >= rank {
            return Err(AssemblyError::AxisOutOfBounds { axis, rank });
        }

        let mut total = 0;
        for part in parts {
            let actual = part.dims();
            let compatible = actual.len() == rank
                && actual
                    .iter()
                    .zip(&expected)
                    .enumerate()
                    .all(|(i, (a, e))| i == axis || a == e);
            if !compatible {
                return Err(AssemblyError::DimensionMismatch {
                    axis,
                    expected,
                    actual,
                });
            }
            total += actual[axis];
        }

        let mut dims = expected;
        dims[axis] = total;
        tracing::trace!(axis, parts = parts.len(), ?dims, "concat");
        let len = match shape_len(&dims) {
            Some(len) if len > 0 => len,
            // Empty result, or an overflowing shape the constructor rejects.
            _ => return Self::from_vec_with_shape(Vec::new(), &dims),
        };

        let outer: usize = dims[..axis].iter().product();
        let inner: usize = dims[axis + 1..].iter().product();
        let mut out = Vec::with_capacity(len);
        for o in 0..outer {
            for part in parts {
                let chunk = part.dims()[axis] * inner;
                out.extend_from_slice(&part.as_slice()[o * chunk..(o + 1) * chunk]);
            }
        }
        Self::from_vec_with_shape(out, &dims)
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> DenseArray<U>
    where
        F: FnMut(&T) -> U,
    {
        let dims = self.dims();
        let data: Vec<U> = self.as_slice().iter().map(f).collect();
        let tensor = Tensor::from(data).into_shape(DynRank::from_dims(&dims));
        DenseArray(tensor)
    }
}

impl<T: PartialEq> PartialEq for DenseArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims() && self.as_slice() == other.as_slice()
    }
}

impl<T> From<Vec<T>> for DenseArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arange(dims: &[usize]) -> DenseArray<i32> {
        let n: usize = dims.iter().product();
        DenseArray::from_vec_with_shape((0..n as i32).collect(), dims).unwrap()
    }

    #[test]
    fn test_from_vec_with_shape_rejects_bad_length() {
        let err = DenseArray::from_vec_with_shape(vec![1, 2, 3], &[2, 2]).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::ShapeMismatch {
                expected_len: 4,
                actual_len: 3,
                dims: vec![2, 2],
            }
        );
    }

    #[test]
    fn test_scalar() {
        let s = DenseArray::from_scalar(7.5);
        assert_eq!(s.rank(), 0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(&[]), Some(&7.5));
    }

    #[test]
    fn test_get_row_major() {
        let a = arange(&[2, 3]);
        assert_eq!(a.get(&[0, 2]), Some(&2));
        assert_eq!(a.get(&[1, 0]), Some(&3));
        assert_eq!(a.get(&[2, 0]), None);
        assert_eq!(a.get(&[0]), None);
    }

    #[test]
    fn test_insert_axis() {
        let a = arange(&[2, 3]);
        assert_eq!(a.clone().insert_axis(0).unwrap().dims(), vec![1, 2, 3]);
        assert_eq!(a.clone().insert_axis(1).unwrap().dims(), vec![2, 1, 3]);
        assert_eq!(a.clone().insert_axis(2).unwrap().dims(), vec![2, 3, 1]);
        assert_eq!(
            a.insert_axis(3).unwrap_err(),
            AssemblyError::AxisOutOfBounds { axis: 3, rank: 2 }
        );
    }

    #[test]
    fn test_pad_rank() {
        let a = DenseArray::from_vec(vec![1, 2, 3]);
        let padded = a.clone().pad_rank(3);
        assert_eq!(padded.dims(), vec![3, 1, 1]);
        assert_eq!(padded.as_slice(), a.as_slice());
        assert_eq!(a.clone().pad_rank(1), a);
    }

    #[test]
    fn test_select() {
        let a = arange(&[2, 3, 2]);
        let mid = a.select(1, 1).unwrap();
        assert_eq!(mid.dims(), vec![2, 2]);
        assert_eq!(mid.as_slice(), &[2, 3, 8, 9]);

        let last = a.select(0, 1).unwrap();
        assert_eq!(last.as_slice(), &[6, 7, 8, 9, 10, 11]);

        assert!(matches!(
            a.select(1, 3),
            Err(AssemblyError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_concat_axis0() {
        let a = arange(&[1, 3]);
        let b = arange(&[2, 3]);
        let c = DenseArray::concat(&[&a, &b], 0).unwrap();
        assert_eq!(c.dims(), vec![3, 3]);
        assert_eq!(c.as_slice(), &[0, 1, 2, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_concat_axis1() {
        let a = arange(&[2, 1]);
        let b = arange(&[2, 2]);
        let c = DenseArray::concat(&[&a, &b], 1).unwrap();
        assert_eq!(c.dims(), vec![2, 3]);
        assert_eq!(c.as_slice(), &[0, 0, 1, 1, 2, 3]);
    }

    #[test]
    fn test_concat_mismatch() {
        let a = arange(&[2, 2]);
        let b = arange(&[3, 2]);
        let err = DenseArray::concat(&[&a, &b], 1).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::DimensionMismatch {
                axis: 1,
                expected: vec![2, 2],
                actual: vec![3, 2],
            }
        );
    }

    #[test]
    fn test_concat_empty_parts() {
        let parts: [&DenseArray<i32>; 0] = [];
        assert!(matches!(
            DenseArray::concat(&parts, 0),
            Err(AssemblyError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_concat_zero_extent_part() {
        let a = arange(&[2, 0]);
        let b = arange(&[2, 2]);
        let c = DenseArray::concat(&[&a, &b], 1).unwrap();
        assert_eq!(c, b);
    }

    #[test]
    fn test_overflowing_shape_is_an_error() {
        assert_eq!(
            DenseArray::from_vec_with_shape(vec![1, 2], &[usize::MAX, 3]).unwrap_err(),
            AssemblyError::ShapeMismatch {
                expected_len: usize::MAX,
                actual_len: 2,
                dims: vec![usize::MAX, 3],
            }
        );
    }

    #[test]
    fn test_map_keeps_shape() {
        let a = arange(&[2, 2]);
        let m = a.map(|&x| f64::from(x) * 0.5);
        assert_eq!(m.dims(), vec![2, 2]);
        assert_eq!(m.as_slice(), &[0.0, 0.5, 1.0, 1.5]);
    }
}
