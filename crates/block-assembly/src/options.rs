//! Configuration options for shape-inferred assembly.

/// How siblings at one nesting level are checked against the first one.
///
/// Shape inference decides the structure of a whole level from its first
/// element. This selects whether the remaining siblings are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestingValidation {
    /// Every sibling must match the first element: scalars next to
    /// scalars, containers of identical shape next to containers.
    /// Violations raise [`AssemblyError::InconsistentNesting`](crate::AssemblyError::InconsistentNesting).
    #[default]
    Strict,
    /// Trust the first element. Siblings are flattened as they come and
    /// only the final element count is checked against the inferred shape.
    FirstElement,
}

/// Options for [`assemble_by_shape_with_options`](crate::assemble_by_shape_with_options).
///
/// # Example
///
/// ```
/// use block_assembly::{AssembleOptions, NestingValidation};
///
/// let opts = AssembleOptions::default().with_outer_shape(vec![2, 3]);
/// assert_eq!(opts.validation, NestingValidation::Strict);
///
/// let lenient = AssembleOptions::first_element();
/// assert!(lenient.outer_shape.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Sibling validation policy.
    pub validation: NestingValidation,

    /// Known shape of the top-level sequence.
    ///
    /// When set, it forms the leading axes of the result and must account
    /// for every top-level element. When `None`, a single leading axis is
    /// inferred from the number of collected elements.
    pub outer_shape: Option<Vec<usize>>,
}

impl AssembleOptions {
    /// Options that validate every sibling.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Options that trust the first element of each level.
    pub fn first_element() -> Self {
        Self {
            validation: NestingValidation::FirstElement,
            ..Default::default()
        }
    }

    pub fn with_validation(mut self, validation: NestingValidation) -> Self {
        self.validation = validation;
        self
    }

    /// Set the known shape of the top-level sequence.
    pub fn with_outer_shape(mut self, outer_shape: Vec<usize>) -> Self {
        self.outer_shape = Some(outer_shape);
        self
    }
}
