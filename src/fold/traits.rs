/// A type with an associative binary operation and a unit.
pub trait Monoid: Sized {
    /// the unit of [`Monoid::combine`]
    fn empty() -> Self;

    /// Combine two values in order: `self ; other`.
    ///
    /// Must be associative. Need not be commutative.
    fn combine(self, other: Self) -> Self;
}

/// The create / accumulate / combine / finish protocol.
///
/// A reduction engine may drive a [`Fold`] sequentially (one accumulator, every row in turn), or
/// split the rows into partitions, accumulate each into its own accumulator on its own worker,
/// and merge the partial accumulators pairwise with [`Fold::combine`] in any association order.
/// Both must produce equivalent results.
pub trait Fold<Row> {
    type Acc;
    type Output;
    type Error;

    /// A fresh accumulator: the unit of [`Fold::combine`].
    fn create(&self) -> Self::Acc;

    /// Add one row to an accumulator.
    fn accumulate(&self, acc: &mut Self::Acc, row: &Row);

    /// Merge two partial accumulators. `a` holds the rows that came first.
    fn combine(&self, a: Self::Acc, b: Self::Acc) -> Self::Acc;

    /// Consume the accumulator and produce the result.
    ///
    /// # Errors
    ///
    /// Validation that is only meaningful once every row has been seen is deferred to here.
    fn finish(&self, acc: Self::Acc) -> Result<Self::Output, Self::Error>;
}
