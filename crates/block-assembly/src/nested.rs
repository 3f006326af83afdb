//! Explicitly tagged nested arrays.

use crate::dense::DenseArray;

/// A value in a nested sequence: a scalar leaf or a container.
///
/// Leaf and container are told apart by the tag, never by probing for
/// iteration support, so mixed siblings are always detectable.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    /// A scalar value (rank 0).
    Leaf(T),
    /// A container of known shape whose elements are leaves.
    Array(DenseArray<T>),
    /// A container of shape `[len]` holding nested values.
    List(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn leaf(value: T) -> Self {
        Nested::Leaf(value)
    }

    pub fn list<I: IntoIterator<Item = Nested<T>>>(items: I) -> Self {
        Nested::List(items.into_iter().collect())
    }

    /// A list of leaves.
    ///
    /// ```
    /// use block_assembly::Nested;
    /// let row = Nested::leaves([1, 2, 3]);
    /// assert_eq!(row.shape(), vec![3]);
    /// ```
    pub fn leaves<I: IntoIterator<Item = T>>(values: I) -> Self {
        Nested::List(values.into_iter().map(Nested::Leaf).collect())
    }

    /// True when the value holds exactly one scalar component.
    ///
    /// That is a leaf, an array with a single element (including rank 0),
    /// or a one-element list whose item is itself scalar-like.
    pub fn is_scalar(&self) -> bool {
        match self {
            Nested::Leaf(_) => true,
            Nested::Array(a) => a.len() == 1,
            Nested::List(items) => items.len() == 1 && items[0].is_scalar(),
        }
    }

    /// Shape of this container level (empty for a leaf).
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Nested::Leaf(_) => Vec::new(),
            Nested::Array(a) => a.dims(),
            Nested::List(items) => vec![items.len()],
        }
    }

    /// Number of container levels down to the first leaf.
    pub fn depth(&self) -> usize {
        match self {
            Nested::Leaf(_) => 0,
            Nested::Array(_) => 1,
            Nested::List(items) => 1 + items.first().map_or(0, Nested::depth),
        }
    }

    /// Extract the scalar of a scalar-like value.
    pub fn into_scalar(self) -> Option<T> {
        match self {
            Nested::Leaf(v) => Some(v),
            Nested::Array(a) if a.len() == 1 => a.into_vec().into_iter().next(),
            Nested::List(mut items) if items.len() == 1 => items.pop().and_then(Nested::into_scalar),
            _ => None,
        }
    }

    /// Elements one nesting level down, in row-major order.
    ///
    /// A leaf yields itself.
    pub fn into_children(self) -> Vec<Nested<T>> {
        match self {
            Nested::Leaf(v) => vec![Nested::Leaf(v)],
            Nested::Array(a) => a.into_vec().into_iter().map(Nested::Leaf).collect(),
            Nested::List(items) => items,
        }
    }

    /// Append every leaf, depth first, to `out`.
    pub fn flatten_into(self, out: &mut Vec<T>) {
        match self {
            Nested::Leaf(v) => out.push(v),
            Nested::Array(a) => out.extend(a.into_vec()),
            Nested::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

impl<T> From<DenseArray<T>> for Nested<T> {
    fn from(array: DenseArray<T>) -> Self {
        Nested::Array(array)
    }
}
