//! Error types for array assembly.

use thiserror::Error;

/// Error type for block, shape-inferred and stacking assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// Two pieces being concatenated disagree on an axis that must match.
    #[error("Dimension mismatch concatenating along axis {axis}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        axis: usize,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A first element had to be inspected but the sequence was empty.
    #[error("Empty input: {context}")]
    EmptyInput { context: &'static str },

    /// Siblings at one nesting level differ in depth or shape.
    #[error("Inconsistent nesting at depth {depth}: {message}")]
    InconsistentNesting { depth: usize, message: String },

    /// Data length does not match the requested shape. `expected_len` is
    /// `usize::MAX` when the shape's element count overflows.
    #[error("Cannot shape {actual_len} elements as {dims:?} (expected {expected_len} elements)")]
    ShapeMismatch {
        expected_len: usize,
        actual_len: usize,
        dims: Vec<usize>,
    },

    /// Axis position is outside the valid range.
    #[error("Axis {axis} out of bounds for rank {rank}")]
    AxisOutOfBounds { axis: usize, rank: usize },

    /// Multi-index is outside the array or grid.
    #[error("Index {index:?} out of bounds for shape {dims:?}")]
    IndexOutOfBounds { index: Vec<usize>, dims: Vec<usize> },

    /// Zipped sources ran out at different lengths.
    #[error("Source {source_index} ended before the others (sources must have equal length)")]
    SourceLengthMismatch { source_index: usize },
}

/// Result type for array assembly.
pub type Result<T> = std::result::Result<T, AssemblyError>;
