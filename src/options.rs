use crate::SortSpec;

/// Configuration for [`crate::Table`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableOptions {
    /// Fixed height of every cell in the scroll axis.
    pub cell_height: u32,

    /// Lookahead padding, in rows, on each side of the strictly visible range.
    ///
    /// This only trades churn for memory: a larger buffer absorbs small scroll deltas without
    /// creating or evicting cells.
    pub buffer_size: usize,

    /// Initial sort. Defaults to insertion order, ascending.
    pub sort: SortSpec,

    /// Initial viewport extent in the scroll axis.
    pub viewport_size: u32,

    /// Initial scroll offset.
    pub initial_offset: u64,
}

impl TableOptions {
    pub const DEFAULT_BUFFER_SIZE: usize = 10;

    pub fn new(cell_height: u32) -> Self {
        Self {
            cell_height,
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
            sort: SortSpec::default(),
            viewport_size: 0,
            initial_offset: 0,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_viewport_size(mut self, viewport_size: u32) -> Self {
        self.viewport_size = viewport_size;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }
}
