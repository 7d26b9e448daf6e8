use alloc::string::String;

/// Result alias for table operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract violations surfaced by the ordered sequence, the model and the cache.
///
/// None of these are retried internally. After an `UnsortedInput` or `UnstableComparison`
/// the affected sequence may be partially mutated; rebuild it from a known-good state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A bulk insertion run was not sorted under the active comparator.
    #[error("unsorted input: run element {index} orders before its predecessor")]
    UnsortedInput { index: usize },

    /// The comparator could not order two values (mixed kinds, NaN, ...).
    ///
    /// `index` is the position probed when the failure happened, or 0 when it surfaced while
    /// sorting a whole vector.
    #[error("unstable comparison against element {index}")]
    UnstableComparison { index: usize },

    /// The filter column holds a value that is not text.
    #[error("filter column '{column}' is not a text value")]
    FilterValueNotText { column: String },

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// `update` was given an old and a new item with different ids.
    #[error("old and new item ids differ")]
    IdMismatch,
}
