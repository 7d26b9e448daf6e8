use alloc::sync::Arc;
use alloc::vec::Vec;

use infinitable::{CellHost, Model, Record, RefreshStats, SortSpec, Table, TableOptions};

use crate::{AdapterError, Args, Method, ScrollAnchor, apply_anchor, capture_first_visible_anchor};

/// What a named call produced.
#[derive(Debug)]
pub enum Reply<T> {
    /// Nothing to report: the call was a no-op on an uninitialized controller.
    Done,
    /// `init`/`destroy`: whether the lifecycle state changed.
    Applied(bool),
    Stats(RefreshStats),
    Item(Option<Arc<T>>),
}

enum Slot<T: Record, H: CellHost<T>> {
    Idle(H),
    Live(Table<T, H>),
    // Only observable if a table operation panics mid-transition.
    Vacant,
}

/// Owns a host and, between `init` and `destroy`, the table driving it.
///
/// Mirrors the lifecycle of a widget plugin: operations on an uninitialized controller are
/// silent no-ops through [`Self::invoke`], while the typed anchored operations report
/// [`AdapterError::NotInitialized`].
pub struct Controller<T: Record, H: CellHost<T>> {
    slot: Slot<T, H>,
}

impl<T: Record, H: CellHost<T>> Controller<T, H> {
    pub fn new(host: H) -> Self {
        Self {
            slot: Slot::Idle(host),
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.slot, Slot::Live(_))
    }

    pub fn table(&self) -> Option<&Table<T, H>> {
        match &self.slot {
            Slot::Live(table) => Some(table),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut Table<T, H>> {
        match &mut self.slot {
            Slot::Live(table) => Some(table),
            _ => None,
        }
    }

    pub fn host(&self) -> Option<&H> {
        match &self.slot {
            Slot::Idle(host) => Some(host),
            Slot::Live(table) => Some(table.host()),
            Slot::Vacant => None,
        }
    }

    /// Tears down any live table and returns the host.
    pub fn into_host(self) -> Option<H> {
        match self.slot {
            Slot::Idle(host) => Some(host),
            Slot::Live(table) => Some(table.destroy()),
            Slot::Vacant => None,
        }
    }

    /// Builds the table and renders the initial window.
    ///
    /// Returns `Ok(false)` without touching anything when a table is already live. If the rows
    /// cannot be ordered the controller stays uninitialized and keeps its host.
    pub fn init(&mut self, options: TableOptions, items: Vec<T>) -> Result<bool, AdapterError> {
        if !matches!(self.slot, Slot::Idle(_)) {
            return Ok(false);
        }
        let model = Model::new(items, options.sort.clone())?;
        let Slot::Idle(host) = core::mem::replace(&mut self.slot, Slot::Vacant) else {
            return Ok(false);
        };
        self.slot = Slot::Live(Table::with_model(options, model, host));
        Ok(true)
    }

    /// Detaches every cell and drops the table. Returns `false` when nothing was live.
    pub fn destroy(&mut self) -> bool {
        if !self.is_initialized() {
            return false;
        }
        let Slot::Live(table) = core::mem::replace(&mut self.slot, Slot::Vacant) else {
            return false;
        };
        self.slot = Slot::Idle(table.destroy());
        true
    }

    /// Forwards a scroll event. `None` when uninitialized.
    pub fn on_scroll(&mut self, offset: u64) -> Option<RefreshStats> {
        self.table_mut().map(|t| t.apply_scroll_offset(offset))
    }

    /// Forwards a resize event. `None` when uninitialized.
    pub fn on_resize(&mut self, viewport_size: u32) -> Option<RefreshStats> {
        self.table_mut().map(|t| t.set_viewport_size(viewport_size))
    }

    pub fn capture_first_visible_anchor(&self) -> Option<ScrollAnchor<T::Id>> {
        self.table().and_then(capture_first_visible_anchor)
    }

    /// Re-applies `anchor`. Returns `Ok(false)` when uninitialized or the row left the view.
    pub fn apply_anchor(&mut self, anchor: &ScrollAnchor<T::Id>) -> Result<bool, AdapterError> {
        match self.table_mut() {
            Some(table) => Ok(apply_anchor(table, anchor)?),
            None => Ok(false),
        }
    }

    /// Sorts while keeping the row at the top of the viewport in place.
    ///
    /// Returns the scroll offset the host should adopt.
    pub fn sort_anchored(&mut self, sort: SortSpec) -> Result<u64, AdapterError> {
        let table = self.table_mut().ok_or(AdapterError::NotInitialized)?;
        let anchor = capture_first_visible_anchor(table);
        table.sort(sort)?;
        Self::settle(table, anchor)
    }

    /// Filters while keeping the row at the top of the viewport in place, if it still passes.
    ///
    /// Returns the scroll offset the host should adopt.
    pub fn filter_anchored(
        &mut self,
        column: Option<&str>,
        query: Option<&str>,
    ) -> Result<u64, AdapterError> {
        let table = self.table_mut().ok_or(AdapterError::NotInitialized)?;
        let anchor = capture_first_visible_anchor(table);
        table.filter(column, query)?;
        Self::settle(table, anchor)
    }

    fn settle(table: &mut Table<T, H>, anchor: Option<ScrollAnchor<T::Id>>) -> Result<u64, AdapterError> {
        let applied = match &anchor {
            Some(anchor) => apply_anchor(table, anchor)?,
            None => false,
        };
        if !applied {
            // Keep the offset inside the (possibly shrunk) extent.
            let clamped = table.cache().scroll_offset().min(table.max_scroll_offset());
            table.apply_scroll_offset(clamped);
        }
        Ok(table.cache().scroll_offset())
    }

    /// Dispatches an operation by name.
    ///
    /// Unknown names fail with [`AdapterError::UnknownMethod`] and arguments of the wrong shape
    /// with [`AdapterError::BadArguments`]. Every method except `init` is a no-op returning
    /// [`Reply::Done`] (or `Reply::Item(None)` for `get`) while uninitialized.
    pub fn invoke(&mut self, method: &str, args: Args<T>) -> Result<Reply<T>, AdapterError> {
        let method: Method = method.parse()?;
        if !args.fits(method) {
            return Err(AdapterError::BadArguments { method });
        }

        if let Args::Init { options, items } = args {
            return Ok(Reply::Applied(self.init(options, items)?));
        }
        if method == Method::Destroy {
            return Ok(Reply::Applied(self.destroy()));
        }

        let Some(table) = self.table_mut() else {
            return Ok(match method {
                Method::Get => Reply::Item(None),
                _ => Reply::Done,
            });
        };
        let reply = match args {
            Args::None => Reply::Stats(table.refresh()),
            Args::Sort(sort) => Reply::Stats(table.sort(sort)?),
            Args::Filter { column, query } => {
                Reply::Stats(table.filter(column.as_deref(), query.as_deref())?)
            }
            Args::Get(id) => Reply::Item(table.get(&id).cloned()),
            Args::Set {
                item,
                force_display_update,
            } => Reply::Stats(table.set(item, force_display_update)?),
            Args::Init { .. } => Reply::Done,
        };
        Ok(reply)
    }
}

impl<T: Record, H: CellHost<T>> core::fmt::Debug for Controller<T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = match &self.slot {
            Slot::Idle(_) => "idle",
            Slot::Live(_) => "live",
            Slot::Vacant => "vacant",
        };
        f.debug_struct("Controller")
            .field("state", &state)
            .field("table", &self.table())
            .finish()
    }
}
