use alloc::collections::BTreeMap;
use alloc::sync::Arc;

use crate::{Anchor, CellHost, Interval, Model, Record, Result, TableOptions};

/// Extents of the two boundary markers around the live window.
///
/// `before` covers the rows above the window and `after` the rows below it, so the scrollable
/// region keeps its full height without rendering off-screen rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacers {
    pub before: u64,
    pub after: u64,
}

/// What a refresh did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefreshStats {
    pub created: usize,
    pub evicted: usize,
}

/// The windowing engine.
///
/// Tracks the live cells by view index plus the window they were computed for. A refresh only
/// touches the difference between the previous window and the new one, so per-scroll work is
/// bounded by the window size (viewport rows plus `2 * buffer_size`), never by the row count.
///
/// The cache does not own the model or the host; both are passed to each operation.
pub struct ViewportCache<C> {
    cells: BTreeMap<usize, C>,
    cached: Interval,
    buffer_size: usize,
    cell_height: u32,
    viewport_size: u32,
    scroll_offset: u64,
    spacers: Spacers,
    total_extent: u64,
}

impl<C> ViewportCache<C> {
    pub fn new(options: &TableOptions) -> Self {
        Self {
            cells: BTreeMap::new(),
            cached: Interval::EMPTY,
            buffer_size: options.buffer_size,
            cell_height: options.cell_height,
            viewport_size: options.viewport_size,
            scroll_offset: options.initial_offset,
            spacers: Spacers::default(),
            total_extent: 0,
        }
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn set_viewport_size(&mut self, viewport_size: u32) {
        self.viewport_size = viewport_size;
    }

    pub fn set_scroll_offset(&mut self, scroll_offset: u64) {
        self.scroll_offset = scroll_offset;
    }

    /// The window the live cells were computed for.
    pub fn cached_interval(&self) -> Interval {
        self.cached
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains_key(&index)
    }

    pub fn cell(&self, index: usize) -> Option<&C> {
        self.cells.get(&index)
    }

    /// Live cells in ascending index order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &C)> + '_ {
        self.cells.iter().map(|(i, c)| (*i, c))
    }

    pub fn spacers(&self) -> Spacers {
        self.spacers
    }

    /// `count * cell_height` as of the last forced refresh or extent sync.
    pub fn total_extent(&self) -> u64 {
        self.total_extent
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_extent.saturating_sub(self.viewport_size as u64)
    }

    /// The window for the current geometry over `count` rows.
    pub fn visible_interval(&self, count: usize) -> Interval {
        Interval::visible(
            self.scroll_offset,
            self.viewport_size,
            self.cell_height,
            self.buffer_size,
            count,
        )
    }

    /// Brings the live cells in line with the current geometry.
    ///
    /// Missing rows of the new window are materialized in ascending order, each spliced after
    /// its predecessor (or after the leading marker), then rows of the previous window that left
    /// it are evicted.
    pub fn refresh<T, H>(&mut self, model: &Model<T>, host: &mut H) -> RefreshStats
    where
        T: Record,
        H: CellHost<T, Cell = C> + ?Sized,
    {
        let count = model.len();
        let visible = self.visible_interval(count);
        let mut stats = RefreshStats::default();

        let mut anchor: Option<usize> = None;
        for index in visible.indices() {
            if !self.cells.contains_key(&index) {
                let Some(item) = model.get(index) else {
                    iwarn!(index, count, "refresh: model has no row at index");
                    continue;
                };
                let cell = host.render(item, index);
                self.cells.insert(index, cell);
                if let Some(cell) = self.cells.get(&index) {
                    let after = anchor
                        .and_then(|a| self.cells.get(&a).map(|c| Anchor::After { index: a, cell: c }))
                        .unwrap_or(Anchor::Leading);
                    host.attach(index, cell, after);
                }
                stats.created += 1;
            }
            anchor = Some(index);
        }

        for index in self.cached.indices() {
            if !visible.contains_index(index) && self.evict::<T, H>(index, host) {
                stats.evicted += 1;
            }
        }

        self.update_spacers::<T, H>(visible, count, host);
        self.cached = visible;
        itrace!(
            min = visible.min,
            max = visible.max,
            created = stats.created,
            evicted = stats.evicted,
            "ViewportCache::refresh"
        );
        stats
    }

    /// Evicts every live cell, resyncs the total extent and refreshes from scratch.
    ///
    /// Used after sort, filter, initial load and any change that shifts indexes.
    pub fn force_refresh<T, H>(&mut self, model: &Model<T>, host: &mut H) -> RefreshStats
    where
        T: Record,
        H: CellHost<T, Cell = C> + ?Sized,
    {
        let evicted = self.evict_all::<T, H>(host);
        self.sync_extent::<T, H>(model.len(), host);
        let mut stats = self.refresh(model, host);
        stats.evicted += evicted;
        idebug!(
            len = model.len(),
            created = stats.created,
            evicted = stats.evicted,
            "ViewportCache::force_refresh"
        );
        stats
    }

    /// Evicts every live cell and forgets the cached window. Returns how many were evicted.
    pub fn evict_all<T, H>(&mut self, host: &mut H) -> usize
    where
        H: CellHost<T, Cell = C> + ?Sized,
    {
        let cells = core::mem::take(&mut self.cells);
        let n = cells.len();
        for (index, cell) in cells {
            host.detach(index, cell);
        }
        self.cached = Interval::EMPTY;
        n
    }

    /// Inserts or replaces a row through the model and keeps the live cells consistent.
    ///
    /// - A new id goes through [`Model::insert`]. If the row lands at or before the end of the
    ///   cached window, every index after it shifted and the cache is force-refreshed; otherwise
    ///   only the extents change.
    /// - An existing id goes through [`Model::update_tracked`]. Live cells between the old and
    ///   new position are re-materialized in place; a row entering or leaving the filtered view
    ///   follows the insertion rule.
    ///
    /// With `force_display_update == false` no cell is touched; only the total extent follows a
    /// change in the row count.
    pub fn set<T, H>(
        &mut self,
        model: &mut Model<T>,
        host: &mut H,
        item: impl Into<Arc<T>>,
        force_display_update: bool,
    ) -> Result<RefreshStats>
    where
        T: Record,
        H: CellHost<T, Cell = C> + ?Sized,
    {
        let item = item.into();
        let count = model.len();
        let Some(old) = model.get_by_id(&item.id()).cloned() else {
            let position = model.insert(item)?;
            return Ok(match position {
                Some(index) if force_display_update => self.shift_from(index, model, host),
                _ => {
                    self.sync_extent_if_changed::<T, H>(count, model.len(), host);
                    RefreshStats::default()
                }
            });
        };

        let moved = model.update_tracked(&old, item)?;
        if !force_display_update {
            self.sync_extent_if_changed::<T, H>(count, model.len(), host);
            return Ok(RefreshStats::default());
        }
        Ok(match (moved.from, moved.to) {
            (None, None) => RefreshStats::default(),
            (Some(from), Some(to)) => {
                let window = self.cached.indices();
                let lo = from.min(to).max(window.start);
                let hi = from.max(to).saturating_add(1).min(window.end);
                let mut stats = RefreshStats::default();
                for index in lo..hi {
                    if self.rematerialize(index, model, host) {
                        stats.created += 1;
                        stats.evicted += 1;
                    }
                }
                stats
            }
            (Some(index), None) | (None, Some(index)) => self.shift_from(index, model, host),
        })
    }

    /// Handles a row entering or leaving the view at `index`.
    fn shift_from<T, H>(&mut self, index: usize, model: &Model<T>, host: &mut H) -> RefreshStats
    where
        T: Record,
        H: CellHost<T, Cell = C> + ?Sized,
    {
        if i64::try_from(index).is_ok_and(|i| i <= self.cached.max) {
            return self.force_refresh(model, host);
        }
        self.sync_extent::<T, H>(model.len(), host);
        self.refresh(model, host)
    }

    /// Replaces the live cell at `index` with a fresh one for the model's current row.
    fn rematerialize<T, H>(&mut self, index: usize, model: &Model<T>, host: &mut H) -> bool
    where
        T: Record,
        H: CellHost<T, Cell = C> + ?Sized,
    {
        let Some(old) = self.cells.remove(&index) else {
            return false;
        };
        host.detach(index, old);
        let Some(item) = model.get(index) else {
            iwarn!(index, "rematerialize: model has no row at index");
            return false;
        };
        let cell = host.render(item, index);
        self.cells.insert(index, cell);
        if let Some(cell) = self.cells.get(&index) {
            let after = index
                .checked_sub(1)
                .and_then(|prev| self.cells.get(&prev).map(|c| Anchor::After { index: prev, cell: c }))
                .unwrap_or(Anchor::Leading);
            host.attach(index, cell, after);
        }
        true
    }

    fn evict<T, H>(&mut self, index: usize, host: &mut H) -> bool
    where
        H: CellHost<T, Cell = C> + ?Sized,
    {
        match self.cells.remove(&index) {
            Some(cell) => {
                host.detach(index, cell);
                true
            }
            None => false,
        }
    }

    fn sync_extent<T, H>(&mut self, count: usize, host: &mut H)
    where
        H: CellHost<T, Cell = C> + ?Sized,
    {
        self.total_extent = (count as u64).saturating_mul(self.cell_height as u64);
        host.set_total_extent(self.total_extent);
    }

    fn sync_extent_if_changed<T, H>(&mut self, before: usize, after: usize, host: &mut H)
    where
        H: CellHost<T, Cell = C> + ?Sized,
    {
        if before != after {
            self.sync_extent::<T, H>(after, host);
        }
    }

    fn update_spacers<T, H>(&mut self, visible: Interval, count: usize, host: &mut H)
    where
        H: CellHost<T, Cell = C> + ?Sized,
    {
        let cell = self.cell_height as u64;
        let rows = visible.indices();
        let spacers = Spacers {
            before: (rows.start as u64).saturating_mul(cell),
            after: (count.saturating_sub(rows.end) as u64).saturating_mul(cell),
        };
        self.spacers = spacers;
        host.set_spacers(spacers.before, spacers.after);
    }
}

impl<C> core::fmt::Debug for ViewportCache<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportCache")
            .field("live", &self.cells.len())
            .field("cached", &self.cached)
            .field("buffer_size", &self.buffer_size)
            .field("cell_height", &self.cell_height)
            .field("viewport_size", &self.viewport_size)
            .field("scroll_offset", &self.scroll_offset)
            .field("spacers", &self.spacers)
            .field("total_extent", &self.total_extent)
            .finish()
    }
}
