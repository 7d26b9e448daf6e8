use alloc::sync::Arc;

/// Where a freshly materialized cell goes in display order.
pub enum Anchor<'a, C> {
    /// Right after the leading boundary marker (the top spacer).
    Leading,
    /// Right after the live cell for `index`.
    After { index: usize, cell: &'a C },
}

impl<C> Clone for Anchor<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Anchor<'_, C> {}

impl<C> core::fmt::Debug for Anchor<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Leading => f.write_str("Leading"),
            Self::After { index, .. } => f.debug_struct("After").field("index", index).finish(),
        }
    }
}

/// The display layer a [`crate::ViewportCache`] drives.
///
/// Only `render` is required. Hosts that keep their own display list should implement `attach`
/// (splicing after the given anchor keeps cells in ascending index order regardless of creation
/// order) and `detach`. The two spacer extents stand in for the rows above and below the window
/// so the scrollable extent stays `count * cell_height`.
pub trait CellHost<T> {
    type Cell;

    /// Materializes the row at view position `index`.
    fn render(&mut self, item: &Arc<T>, index: usize) -> Self::Cell;

    /// Inserts a new cell into display order after `after`.
    fn attach(&mut self, index: usize, cell: &Self::Cell, after: Anchor<'_, Self::Cell>) {
        let _ = (index, cell, after);
    }

    /// Called before the cache drops a cell.
    fn detach(&mut self, index: usize, cell: Self::Cell) {
        let _ = (index, cell);
    }

    fn set_spacers(&mut self, before: u64, after: u64) {
        let _ = (before, after);
    }

    fn set_total_extent(&mut self, extent: u64) {
        let _ = extent;
    }
}
