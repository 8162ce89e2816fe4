//! Drivers for the [`Fold`] protocol.
//!
//! [`sequential`] is the single-threaded convenience; [`combine_tree`] merges partial
//! accumulators pairwise the way a reduction tree would; [`parallel`] (feature `parallel`)
//! partitions rows across a rayon thread pool.
pub mod traits;

pub use traits::*;

/// Accumulate every row into one accumulator, in order, then finish.
pub fn sequential<'a, Row: 'a, F: Fold<Row>>(
    fold: &F,
    rows: impl IntoIterator<Item = &'a Row>,
) -> Result<F::Output, F::Error> {
    let mut acc = fold.create();
    for row in rows {
        fold.accumulate(&mut acc, row);
    }
    fold.finish(acc)
}

/// Accumulate a single partition of rows into a fresh accumulator.
pub fn partial<'a, Row: 'a, F: Fold<Row>>(
    fold: &F,
    rows: impl IntoIterator<Item = &'a Row>,
) -> F::Acc {
    let mut acc = fold.create();
    for row in rows {
        fold.accumulate(&mut acc, row);
    }
    acc
}

/// Merge partial accumulators pairwise, level by level, keeping their left-to-right order.
///
/// An empty list yields [`Fold::create`].
pub fn combine_tree<Row, F: Fold<Row>>(fold: &F, parts: Vec<F::Acc>) -> F::Acc {
    let mut level = parts;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut parts = level.into_iter();
        while let Some(a) = parts.next() {
            match parts.next() {
                Some(b) => next.push(fold.combine(a, b)),
                None => next.push(a),
            }
        }
        level = next;
    }
    level.pop().unwrap_or_else(|| fold.create())
}

/// Fold `rows` on the rayon thread pool.
///
/// Rayon splits the slice into contiguous partitions and reduces them in order, so the result
/// equals that of [`sequential`] over the same slice.
#[cfg(feature = "parallel")]
pub fn parallel<Row: Sync, F: Fold<Row> + Sync>(
    fold: &F,
    rows: &[Row],
) -> Result<F::Output, F::Error>
where
    F::Acc: Send,
{
    use rayon::prelude::*;

    let acc = rows
        .par_iter()
        .fold(
            || fold.create(),
            |mut acc, row| {
                fold.accumulate(&mut acc, row);
                acc
            },
        )
        .reduce(|| fold.create(), |a, b| fold.combine(a, b));
    fold.finish(acc)
}
