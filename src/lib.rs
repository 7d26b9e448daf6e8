//! A headless windowed table engine.
//!
//! For host-facing helpers (string method dispatch, scroll anchoring), see the
//! `infinitable-adapter` crate.
//!
//! This crate renders very large ordered, filterable, sortable datasets without materializing
//! every row: only a small window of cells around the visible scroll range is kept alive, and
//! cells that leave the window are evicted.
//!
//! The pieces, leaves first:
//! - [`OrderedSequence`]: a collection kept sorted under a pluggable comparator.
//! - [`Interval`]: half-open index ranges and the scroll offset → window computation.
//! - [`Model`]: an id-keyed store plus the derived sorted/filtered view.
//! - [`ViewportCache`]: the windowing engine that diffs windows and creates/evicts cells.
//! - [`Table`]: the per-instance handle tying the three together with a [`CellHost`].
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - cell materialization (`CellHost::render`) and, optionally, display-order splicing
//! - viewport size and scroll offset
//! - a fixed cell height
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod error;
mod host;
mod interval;
mod key;
mod model;
mod options;
mod ordered;
mod record;
mod table;


pub use cache::{RefreshStats, Spacers, ViewportCache};
pub use error::{Error, Result};
pub use host::{Anchor, CellHost};
pub use interval::Interval;
pub use model::{FilterSpec, Model, Relocation, SortSpec};
pub use options::TableOptions;
pub use ordered::{CompareFn, OrderedSequence};
pub use record::{ORIGINAL_ORDER, Record, Value};
pub use table::{Command, Table};

#[doc(hidden)]
pub use key::ItemId;
