//! Assemble dense N-dimensional arrays from their pieces.
//!
//! This crate provides three assemblers, all producing a row-major
//! [`DenseArray`]:
//! - [`assemble_block`]: tile a rectangular [`BlockGrid`] of arrays, where grid
//!   axis `k` tiles array axis `k` (block matrices generalized to any rank)
//! - [`assemble_by_shape`]: infer rank and shape from how deeply a sequence of
//!   [`Nested`] values is nested, then materialize it
//! - [`stack_along_axis`]: stack equally-shaped arrays along a new axis
//!
//! Each assembler has a `_with` variant taking a transform and one or more
//! sources, zipped lazily through [`elementwise_map`].
//!
//! # Example
//!
//! ```
//! use block_assembly::{assemble_block, assemble_by_shape, stack_along_axis};
//! use block_assembly::{BlockGrid, DenseArray, Nested};
//!
//! // [1 2 | 5]
//! // [3 4 | 6]
//! let a = DenseArray::from_vec_with_shape(vec![1, 2, 3, 4], &[2, 2]).unwrap();
//! let b = DenseArray::from_vec_with_shape(vec![5, 6], &[2, 1]).unwrap();
//! let m = assemble_block(&BlockGrid::new(vec![1, 2], vec![a, b]).unwrap()).unwrap();
//! assert_eq!(m.dims(), vec![2, 3]);
//! assert_eq!(m.as_slice(), &[1, 2, 5, 3, 4, 6]);
//!
//! let n = assemble_by_shape(vec![Nested::leaves([1, 2, 5]), Nested::leaves([3, 4, 6])]).unwrap();
//! assert_eq!(n, m);
//!
//! let s = stack_along_axis(vec![m.clone(), n], Some(0)).unwrap();
//! assert_eq!(s.dims(), vec![2, 2, 3]);
//! ```

mod block;
mod dense;
pub mod error;
mod flatmap;
mod grid;
mod nested;
pub mod options;
mod partition;
mod shape_inference;
mod stack;

pub use block::{assemble_block, assemble_block_grid_with, assemble_block_with, block_partitions};
pub use dense::DenseArray;
pub use error::{AssemblyError, Result};
pub use flatmap::{elementwise_map, ElementwiseMap, Sources, ZipSources};
pub use grid::BlockGrid;
pub use nested::Nested;
pub use options::{AssembleOptions, NestingValidation};
pub use partition::{block_linear_index, block_multi_index, BlockPartition, MultiIndex};
pub use shape_inference::{
    assemble_by_shape, assemble_by_shape_grid, assemble_by_shape_with,
    assemble_by_shape_with_options,
};
pub use stack::{stack_along_axis, stack_along_axis_with, unstack};
