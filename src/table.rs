use alloc::string::String;
use alloc::sync::Arc;

use crate::{
    CellHost, Interval, Model, Record, RefreshStats, Result, SortSpec, TableOptions,
    ViewportCache,
};

/// One table operation, for hosts that queue or forward operations instead of calling methods.
#[derive(Clone, Debug)]
pub enum Command<T> {
    /// Evict everything and rebuild the window.
    Refresh,
    Sort(SortSpec),
    Filter {
        column: Option<String>,
        query: Option<String>,
    },
    Set {
        item: T,
        force_display_update: bool,
    },
    Scroll {
        offset: u64,
    },
    Resize {
        viewport_size: u32,
    },
}

/// A windowed table instance.
///
/// Owns the [`Model`], the [`ViewportCache`] and the host. Every operation runs to completion on
/// the calling thread.
///
/// Call [`Self::destroy`] to get the host back with every cell detached; dropping a table drops
/// its live cells without notifying the host.
pub struct Table<T: Record, H: CellHost<T>> {
    model: Model<T>,
    cache: ViewportCache<H::Cell>,
    host: H,
    options: TableOptions,
}

impl<T: Record, H: CellHost<T>> Table<T, H> {
    /// Builds the model from `items` and renders the initial window.
    pub fn new(options: TableOptions, items: impl IntoIterator<Item = T>, host: H) -> Result<Self> {
        let model = Model::new(items, options.sort.clone())?;
        Ok(Self::with_model(options, model, host))
    }

    /// Wraps an existing model and renders the initial window.
    ///
    /// The model keeps its own sort; `options.sort` is overwritten with it.
    pub fn with_model(mut options: TableOptions, model: Model<T>, host: H) -> Self {
        options.sort = model.sort_spec().clone();
        idebug!(
            len = model.len(),
            cell_height = options.cell_height,
            buffer_size = options.buffer_size,
            "Table::with_model"
        );
        let mut table = Self {
            cache: ViewportCache::new(&options),
            model,
            host,
            options,
        };
        table.refresh();
        table
    }

    /// Detaches every live cell, collapses the spacers and returns the host.
    pub fn destroy(mut self) -> H {
        idebug!(live = self.cache.len(), "Table::destroy");
        self.cache.evict_all::<T, H>(&mut self.host);
        self.host.set_spacers(0, 0);
        self.host.set_total_extent(0);
        self.host
    }

    /// Current configuration; `sort` tracks the active sort.
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn model(&self) -> &Model<T> {
        &self.model
    }

    pub fn cache(&self) -> &ViewportCache<H::Cell> {
        &self.cache
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Number of rows in the filtered view.
    pub fn len(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// The window the live cells cover.
    pub fn window(&self) -> Interval {
        self.cache.cached_interval()
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.cache.max_scroll_offset()
    }

    /// Evicts every cell and rebuilds the window from scratch.
    pub fn refresh(&mut self) -> RefreshStats {
        self.cache.force_refresh(&self.model, &mut self.host)
    }

    /// Incrementally refreshes the window for the current geometry.
    pub fn update_visible(&mut self) -> RefreshStats {
        self.cache.refresh(&self.model, &mut self.host)
    }

    /// Applies a scroll event from the host.
    pub fn apply_scroll_offset(&mut self, offset: u64) -> RefreshStats {
        itrace!(offset, "Table::apply_scroll_offset");
        self.cache.set_scroll_offset(offset);
        self.update_visible()
    }

    /// Applies a resize event from the host.
    pub fn set_viewport_size(&mut self, viewport_size: u32) -> RefreshStats {
        itrace!(viewport_size, "Table::set_viewport_size");
        self.cache.set_viewport_size(viewport_size);
        self.update_visible()
    }

    /// Applies viewport size and scroll offset together with a single refresh.
    pub fn apply_scroll_frame(&mut self, viewport_size: u32, offset: u64) -> RefreshStats {
        itrace!(viewport_size, offset, "Table::apply_scroll_frame");
        self.cache.set_viewport_size(viewport_size);
        self.cache.set_scroll_offset(offset);
        self.update_visible()
    }

    pub fn sort(&mut self, sort: SortSpec) -> Result<RefreshStats> {
        self.model.sort(sort)?;
        self.options.sort = self.model.sort_spec().clone();
        Ok(self.refresh())
    }

    pub fn filter(&mut self, column: Option<&str>, query: Option<&str>) -> Result<RefreshStats> {
        self.model.filter(column, query)?;
        Ok(self.refresh())
    }

    pub fn get(&self, id: &T::Id) -> Option<&Arc<T>> {
        self.model.get_by_id(id)
    }

    /// Inserts a new row or replaces the row with the same id. See [`ViewportCache::set`].
    pub fn set(&mut self, item: impl Into<Arc<T>>, force_display_update: bool) -> Result<RefreshStats> {
        self.cache
            .set(&mut self.model, &mut self.host, item, force_display_update)
    }

    /// Adds many rows at once and rebuilds the window.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) -> Result<usize> {
        let stored = self.model.extend(items)?;
        self.refresh();
        Ok(stored)
    }

    pub fn apply(&mut self, command: Command<T>) -> Result<RefreshStats> {
        match command {
            Command::Refresh => Ok(self.refresh()),
            Command::Sort(sort) => self.sort(sort),
            Command::Filter { column, query } => self.filter(column.as_deref(), query.as_deref()),
            Command::Set {
                item,
                force_display_update,
            } => self.set(item, force_display_update),
            Command::Scroll { offset } => Ok(self.apply_scroll_offset(offset)),
            Command::Resize { viewport_size } => Ok(self.set_viewport_size(viewport_size)),
        }
    }
}

impl<T: Record, H: CellHost<T>> core::fmt::Debug for Table<T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("model", &self.model)
            .field("cache", &self.cache)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
