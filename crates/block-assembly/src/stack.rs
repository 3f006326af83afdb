//! Stacking equally-shaped arrays along a new axis.

use crate::dense::DenseArray;
use crate::error::{AssemblyError, Result};
use crate::flatmap::{elementwise_map, Sources};

/// Stack equally-shaped arrays along a newly inserted axis.
///
/// Each element gets an axis of extent 1 inserted before position `axis`
/// (0-indexed, `0..=rank`), and the results are concatenated along it. The
/// default, `None`, is `rank`: a new last axis after all existing ones.
/// The result has rank one greater than the elements.
///
/// # Example
/// ```
/// use block_assembly::{stack_along_axis, DenseArray};
///
/// let xs = vec![DenseArray::from_vec(vec![1, 2]), DenseArray::from_vec(vec![3, 4])];
///
/// let rows = stack_along_axis(xs.clone(), Some(0)).unwrap();
/// assert_eq!(rows.dims(), vec![2, 2]);
/// assert_eq!(rows.as_slice(), &[1, 2, 3, 4]);
///
/// let cols = stack_along_axis(xs, None).unwrap();
/// assert_eq!(cols.as_slice(), &[1, 3, 2, 4]);
/// ```
pub fn stack_along_axis<T, I>(elements: I, axis: Option<usize>) -> Result<DenseArray<T>>
where
    T: Clone,
    I: IntoIterator<Item = DenseArray<T>>,
{
    stack_results(elements.into_iter().map(Ok), axis)
}

/// Map `f` over zipped sources and stack the resulting arrays.
///
/// Pass `(xs,)` for one source or `(xs, ys, ...)` to zip several.
pub fn stack_along_axis_with<S, F, T>(f: F, sources: S, axis: Option<usize>) -> Result<DenseArray<T>>
where
    S: Sources,
    F: FnMut(S::Item) -> DenseArray<T>,
    T: Clone,
{
    stack_results(elementwise_map(f, sources), axis)
}

/// Split an array into the sub-arrays along `axis`, dropping that axis.
///
/// Inverse of [`stack_along_axis`] at the same position.
pub fn unstack<T: Clone>(array: &DenseArray<T>, axis: usize) -> Result<Vec<DenseArray<T>>> {
    let rank = array.rank();
    if axis >= rank {
        return Err(AssemblyError::AxisOutOfBounds { axis, rank });
    }
    (0..array.dims()[axis])
        .map(|i| array.select(axis, i))
        .collect()
}

fn stack_results<T, I>(mut elements: I, axis: Option<usize>) -> Result<DenseArray<T>>
where
    T: Clone,
    I: Iterator<Item = Result<DenseArray<T>>>,
{
    let first = elements.next().ok_or(AssemblyError::EmptyInput {
        context: "stacking needs at least one array",
    })??;
    let element_dims = first.dims();
    let rank = element_dims.len();
    let axis = axis.unwrap_or(rank);
    if axis > rank {
        return Err(AssemblyError::AxisOutOfBounds { axis, rank });
    }
    tracing::debug!(?element_dims, axis, "stack_along_axis");

    let mut expanded = vec![first.insert_axis(axis)?];
    for element in elements {
        let element = element?;
        let actual = element.dims();
        if actual != element_dims {
            return Err(AssemblyError::DimensionMismatch {
                axis,
                expected: element_dims,
                actual,
            });
        }
        expanded.push(element.insert_axis(axis)?);
    }

    let refs: Vec<&DenseArray<T>> = expanded.iter().collect();
    DenseArray::concat(&refs, axis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mat(start: i32) -> DenseArray<i32> {
        DenseArray::from_vec_with_shape((start..start + 6).collect(), &[2, 3]).unwrap()
    }

    #[test]
    fn test_stack_positions() {
        let xs = vec![mat(0), mat(100)];
        for (axis, dims) in [(0, vec![2, 2, 3]), (1, vec![2, 2, 3]), (2, vec![2, 3, 2])] {
            let out = stack_along_axis(xs.clone(), Some(axis)).unwrap();
            assert_eq!(out.dims(), dims);
            assert_eq!(out.select(axis, 1).unwrap(), mat(100));
        }
    }

    #[test]
    fn test_default_axis_is_last() {
        let out = stack_along_axis(vec![mat(0), mat(6), mat(12)], None).unwrap();
        assert_eq!(out.dims(), vec![2, 3, 3]);
        assert_eq!(out.get(&[1, 2, 2]), Some(&17));
    }

    #[test]
    fn test_stack_scalars() {
        let out = stack_along_axis((0..4).map(DenseArray::from_scalar), None).unwrap();
        assert_eq!(out, DenseArray::from_vec(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_axis_out_of_bounds() {
        assert_eq!(
            stack_along_axis(vec![mat(0)], Some(3)).unwrap_err(),
            AssemblyError::AxisOutOfBounds { axis: 3, rank: 2 }
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let other = DenseArray::from_vec_with_shape(vec![0; 6], &[3, 2]).unwrap();
        assert_eq!(
            stack_along_axis(vec![mat(0), other], Some(0)).unwrap_err(),
            AssemblyError::DimensionMismatch {
                axis: 0,
                expected: vec![2, 3],
                actual: vec![3, 2],
            }
        );
    }

    #[test]
    fn test_empty() {
        let err = stack_along_axis(Vec::<DenseArray<f64>>::new(), None).unwrap_err();
        assert!(matches!(err, AssemblyError::EmptyInput { .. }));
    }

    #[test]
    fn test_stack_with_zipped_sources() {
        let out = stack_along_axis_with(
            |(a, b): (i32, i32)| DenseArray::from_vec(vec![a, b, a * b]),
            (vec![1, 2], vec![3, 4]),
            Some(0),
        )
        .unwrap();
        assert_eq!(out.dims(), vec![2, 3]);
        assert_eq!(out.as_slice(), &[1, 3, 3, 2, 4, 8]);
    }

    #[test]
    fn test_source_error_wins_over_axis_check() {
        let err = stack_along_axis_with(
            |(a, b): (i32, i32)| DenseArray::from_vec(vec![a, b]),
            (Vec::<i32>::new(), vec![1]),
            Some(1),
        )
        .unwrap_err();
        assert_eq!(err, AssemblyError::SourceLengthMismatch { source_index: 0 });
    }

    #[test]
    fn test_unstack() {
        let out = stack_along_axis(vec![mat(0), mat(6)], Some(1)).unwrap();
        let parts = unstack(&out, 1).unwrap();
        assert_eq!(parts, vec![mat(0), mat(6)]);
        assert!(unstack(&out, 3).is_err());
    }
}
