//! Shape-inferred assembly of nested sequences.
//!
//! The rank and extents of the result are read off the nesting itself.
//! Starting from the top-level sequence, the first element of the current
//! level is peeked:
//!
//! - if it is scalar-like, the level is the leaf level and every remaining
//!   element is collected into the flat output;
//! - otherwise its shape is appended to the accumulated inner shape and the
//!   level is flattened by one, splicing every element's children into a
//!   new, shallower sequence.
//!
//! The result has shape `outer ++ inner`, where `outer` is either the
//! known outer shape or a single axis inferred from the element count.
//! Values keep their depth-first order, so the innermost level varies
//! fastest in the row-major result.
//!
//! The input is consumed exactly once, lazily, through a one-element peek
//! buffer; no nested intermediate collection is built.

use std::cell::Cell;
use std::iter::Peekable;
use std::rc::Rc;

use crate::dense::DenseArray;
use crate::error::{AssemblyError, Result};
use crate::flatmap::{elementwise_map, Sources};
use crate::grid::BlockGrid;
use crate::nested::Nested;
use crate::options::{AssembleOptions, NestingValidation};
use crate::partition::shape_len;

type NodeStream<'a, T> = Box<dyn Iterator<Item = Result<Nested<T>>> + 'a>;
type Level<'a, T> = Peekable<NodeStream<'a, T>>;

/// Assemble a nested sequence into a dense array, inferring its shape.
///
/// Siblings are validated strictly; see [`assemble_by_shape_with_options`]
/// to change that or to supply a known outer shape.
///
/// # Example
/// ```
/// use block_assembly::{assemble_by_shape, Nested};
///
/// let rows = vec![Nested::leaves([1, 2]), Nested::leaves([3, 4])];
/// let m = assemble_by_shape(rows).unwrap();
/// assert_eq!(m.dims(), vec![2, 2]);
/// assert_eq!(m.as_slice(), &[1, 2, 3, 4]);
/// ```
pub fn assemble_by_shape<'a, T, I>(nesting: I) -> Result<DenseArray<T>>
where
    T: 'a,
    I: IntoIterator<Item = Nested<T>>,
    I::IntoIter: 'a,
{
    assemble_by_shape_with_options(nesting, &AssembleOptions::default())
}

/// [`assemble_by_shape`] with explicit options.
pub fn assemble_by_shape_with_options<'a, T, I>(
    nesting: I,
    options: &AssembleOptions,
) -> Result<DenseArray<T>>
where
    T: 'a,
    I: IntoIterator<Item = Nested<T>>,
    I::IntoIter: 'a,
{
    assemble_levels(Box::new(nesting.into_iter().map(Ok)), options)
}

/// Assemble a grid of nested values; the grid's shape is the outer shape.
pub fn assemble_by_shape_grid<T>(
    grid: BlockGrid<Nested<T>>,
    validation: NestingValidation,
) -> Result<DenseArray<T>> {
    let options = AssembleOptions::default()
        .with_validation(validation)
        .with_outer_shape(grid.dims().to_vec());
    assemble_levels(Box::new(grid.into_iter().map(Ok)), &options)
}

/// Map `f` over zipped sources and assemble the results by shape, lazily.
pub fn assemble_by_shape_with<'a, S, F, T>(f: F, sources: S) -> Result<DenseArray<T>>
where
    S: Sources,
    S::Iter: 'a,
    F: FnMut(S::Item) -> Nested<T> + 'a,
    T: 'a,
{
    assemble_levels(
        Box::new(elementwise_map(f, sources)),
        &AssembleOptions::default(),
    )
}

fn assemble_levels<'a, T: 'a>(
    source: NodeStream<'a, T>,
    options: &AssembleOptions,
) -> Result<DenseArray<T>> {
    let outer_count = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&outer_count);
    let counted: NodeStream<'a, T> =
        Box::new(source.inspect(move |_| counter.set(counter.get() + 1)));

    let mut level: Level<'a, T> = counted.peekable();
    let mut inner: Vec<usize> = Vec::new();
    let mut data: Vec<T> = Vec::new();
    let mut depth = 0;

    loop {
        let shape = match peek_node(&mut level)? {
            None if depth == 0 => {
                return Err(AssemblyError::EmptyInput {
                    context: "shape inference needs at least one element",
                })
            }
            None => break,
            Some(node) if node.is_scalar() => None,
            Some(node) => Some(node.shape()),
        };

        let Some(shape) = shape else {
            for (position, item) in level.enumerate() {
                let node = item?;
                match options.validation {
                    NestingValidation::Strict => {
                        let value = node.into_scalar().ok_or_else(|| {
                            AssemblyError::InconsistentNesting {
                                depth,
                                message: format!(
                                    "element {position} is a container but the first element is a scalar"
                                ),
                            }
                        })?;
                        data.push(value);
                    }
                    NestingValidation::FirstElement => node.flatten_into(&mut data),
                }
            }
            break;
        };

        tracing::trace!(depth, ?shape, "peeled nesting level");
        inner.extend_from_slice(&shape);
        level = flatten_level(level, shape, options.validation, depth).peekable();
        depth += 1;
    }

    let dims = match &options.outer_shape {
        Some(outer) => [outer.as_slice(), inner.as_slice()].concat(),
        None => {
            let outer = match shape_len(&inner) {
                Some(0) => outer_count.get(),
                Some(inner_len) => data.len() / inner_len,
                None => {
                    return Err(AssemblyError::ShapeMismatch {
                        expected_len: usize::MAX,
                        actual_len: data.len(),
                        dims: inner,
                    })
                }
            };
            [&[outer][..], inner.as_slice()].concat()
        }
    };
    tracing::debug!(?dims, levels = depth, "assembled by shape");
    DenseArray::from_vec_with_shape(data, &dims)
}

/// Peek the next node, surfacing a pending error instead.
fn peek_node<'b, T>(level: &'b mut Level<'_, T>) -> Result<Option<&'b Nested<T>>> {
    if let Some(Err(e)) = level.next_if(|item| item.is_err()) {
        return Err(e);
    }
    Ok(level.peek().and_then(|item| item.as_ref().ok()))
}

/// Splice the children of every node into one shallower stream.
fn flatten_level<'a, T: 'a>(
    level: Level<'a, T>,
    expected: Vec<usize>,
    validation: NestingValidation,
    depth: usize,
) -> NodeStream<'a, T> {
    Box::new(level.enumerate().flat_map(move |(position, item)| {
        let node = match item {
            Ok(node) => node,
            Err(e) => return vec![Err(e)],
        };
        if validation == NestingValidation::Strict {
            if node.is_scalar() {
                return vec![Err(AssemblyError::InconsistentNesting {
                    depth,
                    message: format!(
                        "element {position} is a scalar but the first element has shape {expected:?}"
                    ),
                })];
            }
            let actual = node.shape();
            if actual != expected {
                return vec![Err(AssemblyError::InconsistentNesting {
                    depth,
                    message: format!(
                        "element {position} has shape {actual:?}, expected {expected:?}"
                    ),
                })];
            }
        }
        node.into_children().into_iter().map(Ok).collect()
    }))
}
