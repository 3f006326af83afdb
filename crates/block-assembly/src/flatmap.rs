//! Lazy "map, then assemble" adapters.
//!
//! Every assembler has a variant that takes a transform plus one or more
//! source collections. The sources are zipped lazily, the transform is
//! applied element by element and the results stream straight into the
//! assembler, so no intermediate nested collection is ever built.
//!
//! Sources are passed as a tuple: `(xs,)` for a single source (the
//! transform receives bare elements) and `(xs, ys, ...)` for up to four
//! zipped sources (the transform receives a tuple).

use crate::error::{AssemblyError, Result};

/// One or more source collections that can be zipped element-wise.
pub trait Sources {
    /// Element handed to the transform.
    type Item;
    /// Zipped iterator; yields an error if the sources differ in length.
    type Iter: Iterator<Item = Result<Self::Item>>;

    fn zip_sources(self) -> Self::Iter;
}

/// Iterator over zipped sources.
///
/// Ends cleanly when every source is exhausted at the same time and yields
/// [`AssemblyError::SourceLengthMismatch`] once otherwise.
#[derive(Debug, Clone)]
pub struct ZipSources<I> {
    iters: I,
    done: bool,
}

impl<A: IntoIterator> Sources for (A,) {
    type Item = A::Item;
    type Iter = ZipSources<(A::IntoIter,)>;

    fn zip_sources(self) -> Self::Iter {
        ZipSources {
            iters: (self.0.into_iter(),),
            done: false,
        }
    }
}

impl<A: Iterator> Iterator for ZipSources<(A,)> {
    type Item = Result<A::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.iters.0.next();
        self.done = next.is_none();
        next.map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iters.0.size_hint()
    }
}

macro_rules! impl_zip_sources {
    ($(($idx:tt, $S:ident, $v:ident)),+) => {
        impl<$($S: IntoIterator),+> Sources for ($($S,)+) {
            type Item = ($($S::Item,)+);
            type Iter = ZipSources<($($S::IntoIter,)+)>;

            fn zip_sources(self) -> Self::Iter {
                ZipSources {
                    iters: ($(self.$idx.into_iter(),)+),
                    done: false,
                }
            }
        }

        impl<$($S: Iterator),+> Iterator for ZipSources<($($S,)+)> {
            type Item = Result<($($S::Item,)+)>;

            fn next(&mut self) -> Option<Self::Item> {
                if self.done {
                    return None;
                }
                match ($(self.iters.$idx.next(),)+) {
                    ($(Some($v),)+) => Some(Ok(($($v,)+))),
                    partial => {
                        self.done = true;
                        let ended = [$(partial.$idx.is_none()),+];
                        if ended.iter().all(|&e| e) {
                            None
                        } else {
                            let source_index = ended.iter().position(|&e| e).unwrap_or(0);
                            Some(Err(AssemblyError::SourceLengthMismatch { source_index }))
                        }
                    }
                }
            }
        }
    };
}

impl_zip_sources!((0, A, a), (1, B, b));
impl_zip_sources!((0, A, a), (1, B, b), (2, C, c));
impl_zip_sources!((0, A, a), (1, B, b), (2, C, c), (3, D, d));

/// Lazily applies a transform to zipped sources.
#[derive(Debug, Clone)]
pub struct ElementwiseMap<I, F> {
    sources: I,
    f: F,
}

impl<I, F, X, R> Iterator for ElementwiseMap<I, F>
where
    I: Iterator<Item = Result<X>>,
    F: FnMut(X) -> R,
{
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let f = &mut self.f;
        self.sources.next().map(|item| item.map(f))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sources.size_hint()
    }
}

/// Zip `sources` and apply `f` to each element, lazily.
///
/// # Example
/// ```
/// use block_assembly::elementwise_map;
///
/// let sums: Vec<i32> = elementwise_map(|(a, b)| a + b, (vec![1, 2], vec![10, 20]))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(sums, vec![11, 22]);
/// ```
pub fn elementwise_map<S, F, R>(f: F, sources: S) -> ElementwiseMap<S::Iter, F>
where
    S: Sources,
    F: FnMut(S::Item) -> R,
{
    ElementwiseMap {
        sources: sources.zip_sources(),
        f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_source_passes_bare_items() {
        let out: Vec<i32> = elementwise_map(|x: i32| x * 3, (vec![1, 2, 3],))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(out, vec![3, 6, 9]);
    }

    #[test]
    fn test_three_sources() {
        let out: Vec<String> = elementwise_map(
            |(a, b, c)| format!("{a}{b}{c}"),
            (vec!['x', 'y'], 1..3, vec!["p", "q"]),
        )
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(out, vec!["x1p", "y2q"]);
    }

    #[test]
    fn test_unequal_lengths() {
        let mut it = elementwise_map(|(a, b): (i32, i32)| a * b, (vec![1, 2, 3], vec![4, 5]));
        assert_eq!(it.next(), Some(Ok(4)));
        assert_eq!(it.next(), Some(Ok(10)));
        assert_eq!(
            it.next(),
            Some(Err(AssemblyError::SourceLengthMismatch { source_index: 1 }))
        );
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_is_lazy() {
        let mut calls = 0;
        {
            let mut it = elementwise_map(
                |x: i32| {
                    calls += 1;
                    x
                },
                (0..100,),
            );
            it.next();
            it.next();
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_four_sources_equal_length() {
        let out: Vec<i32> = elementwise_map(
            |(a, b, c, d)| a + b + c + d,
            (vec![1], vec![2], vec![3], vec![4]),
        )
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(out, vec![10]);
    }
}
