use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::key::IdMap;
use crate::ordered::{CompareFn, OrderedSequence};
use crate::record::{ORIGINAL_ORDER, Record, Value};
use crate::{Error, Result};

/// Sort configuration: a column and a direction.
///
/// No column (or [`ORIGINAL_ORDER`]) sorts by insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSpec {
    pub column: Option<String>,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: None,
            ascending: true,
        }
    }
}

impl SortSpec {
    /// Ascending by `column`.
    pub fn by(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            ascending: true,
        }
    }

    pub fn insertion_order() -> Self {
        Self::default()
    }

    pub fn with_ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    pub fn descending(self) -> Self {
        self.with_ascending(false)
    }

    fn sorts_by_original_order(&self) -> bool {
        self.column.as_deref().is_none_or(|c| c == ORIGINAL_ORDER)
    }

    /// Builds the pure comparator for this spec.
    pub(crate) fn comparator<T: Record>(&self) -> CompareFn<Entry<T>> {
        let ascending = self.ascending;
        let directed = move |ord: Ordering| if ascending { ord } else { ord.reverse() };

        if self.sorts_by_original_order() {
            return Arc::new(move |a: &Entry<T>, b: &Entry<T>| {
                Some(directed(a.order.cmp(&b.order)))
            });
        }

        let column = self.column.clone().unwrap_or_default();
        Arc::new(move |a: &Entry<T>, b: &Entry<T>| {
            let va = a.item.field(&column).unwrap_or(Value::Null);
            let vb = b.item.field(&column).unwrap_or(Value::Null);
            va.compare(&vb).map(directed)
        })
    }
}

/// Filter configuration: case-insensitive substring match on one text column.
///
/// A missing column or an empty query lets every row through.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSpec {
    pub column: Option<String>,
    /// Stored lowercased.
    pub query: Option<String>,
}

impl FilterSpec {
    pub fn new(column: Option<&str>, query: Option<&str>) -> Self {
        Self {
            column: column.map(String::from),
            query: query.filter(|q| !q.is_empty()).map(|q| q.to_lowercase()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_pass_through(&self) -> bool {
        self.column.is_none() || self.query.is_none()
    }

    /// Tests one record. A non-text value in the filter column is a contract violation.
    pub fn matches<T: Record>(&self, item: &T) -> Result<bool> {
        let (Some(column), Some(query)) = (&self.column, &self.query) else {
            return Ok(true);
        };
        let text = item
            .field(column)
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::FilterValueNotText {
                column: column.clone(),
            })?;
        Ok(text.to_lowercase().contains(query.as_str()))
    }
}

/// Where an updated row was and where it ended up in the filtered view.
///
/// `None` means "not in the view" (filtered out).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relocation {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

impl Relocation {
    pub fn is_visible_change(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// A stored row: the caller's item plus its stamped insertion position.
pub(crate) struct Entry<T> {
    pub(crate) item: Arc<T>,
    pub(crate) order: usize,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            item: Arc::clone(&self.item),
            order: self.order,
        }
    }
}

impl<T> Entry<T> {
    fn same(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.item, &b.item)
    }
}

/// An id-keyed store plus a derived view sorted by the current comparator and restricted to the
/// rows passing the current filter.
///
/// Invariants:
/// - every row in the view is the very `Arc` stored under its id;
/// - every stored row passing the filter appears in the view exactly once;
/// - rows failing the filter live only in the store.
pub struct Model<T: Record> {
    elements: IdMap<T::Id, Entry<T>>,
    transform: OrderedSequence<Entry<T>>,
    sort: SortSpec,
    filter: FilterSpec,
    next_order: usize,
}

impl<T: Record> Model<T> {
    /// Builds a model from an initial sequence.
    ///
    /// Rows are stamped with their input position; duplicate ids after the first are ignored.
    pub fn new(items: impl IntoIterator<Item = T>, sort: SortSpec) -> Result<Self> {
        let mut model = Self {
            elements: IdMap::default(),
            transform: OrderedSequence::new(sort.comparator()),
            sort,
            filter: FilterSpec::none(),
            next_order: 0,
        };
        model.extend(items)?;
        idebug!(len = model.len(), "Model::new");
        Ok(model)
    }

    /// Number of rows in the filtered view.
    pub fn len(&self) -> usize {
        self.transform.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transform.is_empty()
    }

    /// Number of stored rows, filtered or not.
    pub fn stored_len(&self) -> usize {
        self.elements.len()
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort
    }

    pub fn filter_spec(&self) -> &FilterSpec {
        &self.filter
    }

    /// Row at a view position.
    pub fn get(&self, index: usize) -> Option<&Arc<T>> {
        self.transform.get(index).map(|e| &e.item)
    }

    pub fn get_by_id(&self, id: &T::Id) -> Option<&Arc<T>> {
        self.elements.get(id).map(|e| &e.item)
    }

    /// Rows of the view in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> + '_ {
        self.transform.iter().map(|e| &e.item)
    }

    /// View position of the row stored under `id`, if it passes the filter.
    pub fn position_of(&self, id: &T::Id) -> Result<Option<usize>> {
        match self.elements.get(id) {
            Some(entry) => self.transform.index_of_by(entry, Entry::same),
            None => Ok(None),
        }
    }

    /// Consumes `next_order` once a new row is committed.
    fn stamp(&mut self) {
        self.next_order += 1;
    }

    /// Adds a new row.
    ///
    /// Returns its view position, or `None` when the id already exists (nothing changes; use
    /// [`Self::update`] to replace) or the row does not pass the filter.
    pub fn insert(&mut self, item: impl Into<Arc<T>>) -> Result<Option<usize>> {
        let item = item.into();
        let id = item.id();
        if self.elements.contains_key(&id) {
            return Ok(None);
        }
        let visible = self.filter.matches(&*item)?;
        let entry = Entry {
            item,
            order: self.next_order,
        };
        let position = if visible {
            Some(self.transform.push(entry.clone())?)
        } else {
            None
        };
        self.stamp();
        self.elements.insert(id, entry);
        Ok(position)
    }

    /// Adds many rows at once.
    ///
    /// New visible rows are sorted into a run and merged into the view in one pass. Duplicate
    /// ids (against the store or within `items`) are ignored. Returns how many rows were stored.
    ///
    /// Nothing is stored unless every row could be filtered and ordered.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) -> Result<usize> {
        let mut fresh: IdMap<T::Id, Entry<T>> = IdMap::default();
        let mut run = Vec::new();
        let mut order = self.next_order;
        for item in items {
            let id = item.id();
            if self.elements.contains_key(&id) || fresh.contains_key(&id) {
                continue;
            }
            let item = Arc::new(item);
            let entry = Entry { item, order };
            order += 1;
            if self.filter.matches(&*entry.item)? {
                run.push(entry.clone());
            }
            fresh.insert(id, entry);
        }

        let run = OrderedSequence::from_vec(run, Arc::clone(self.transform.compare_fn()))?;
        if self.transform.is_empty() {
            self.transform = run;
        } else if !run.is_empty() {
            let mut merged = self.transform.clone();
            merged.insert(run.into_vec())?;
            self.transform = merged;
        }

        let stored = fresh.len();
        self.next_order = order;
        self.elements.extend(fresh);
        Ok(stored)
    }

    /// Replaces the row `old` with `new` and returns `new`'s view position.
    ///
    /// `None` means the row is not in the view (filtered out), which callers treat as "no
    /// visible change".
    pub fn update(&mut self, old: &Arc<T>, new: impl Into<Arc<T>>) -> Result<Option<usize>> {
        Ok(self.update_tracked(old, new)?.to)
    }

    /// Like [`Self::update`], also reporting where the row was before.
    ///
    /// `old` is located by identity. A row that starts passing the filter enters the view; one
    /// that stops passing it leaves the view.
    pub fn update_tracked(&mut self, old: &Arc<T>, new: impl Into<Arc<T>>) -> Result<Relocation> {
        let new = new.into();
        let id = new.id();
        if old.id() != id {
            return Err(Error::IdMismatch);
        }

        let visible = self.filter.matches(&*new)?;
        let order = self
            .elements
            .get(&id)
            .map_or(self.next_order, |e| e.order);
        let probe = Entry {
            item: Arc::clone(old),
            order,
        };
        let from = self.transform.index_of_by(&probe, Entry::same)?;
        let removed = from.and_then(|i| self.transform.remove(i).map(|e| (i, e)));

        let entry = Entry { item: new, order };
        let to = if visible {
            match self.transform.push(entry.clone()) {
                Ok(i) => Some(i),
                Err(err) => {
                    if let Some((i, e)) = removed {
                        self.transform.restore(i, e);
                    }
                    return Err(err);
                }
            }
        } else {
            None
        };
        if order == self.next_order {
            self.stamp();
        }
        self.elements.insert(id, entry);
        itrace!(?from, ?to, "Model::update");
        Ok(Relocation { from, to })
    }

    /// Re-derives the view under a new sort.
    ///
    /// An unchanged `SortSpec` keeps the comparator and copies the view. On error the model
    /// is left unchanged.
    pub fn sort(&mut self, sort: SortSpec) -> Result<()> {
        let compare = if sort == self.sort {
            Arc::clone(self.transform.compare_fn())
        } else {
            sort.comparator()
        };
        self.transform = self.transform.sort(compare)?;
        idebug!(column = ?sort.column, ascending = sort.ascending, "Model::sort");
        self.sort = sort;
        Ok(())
    }

    /// Rebuilds the view from every stored row under a new filter.
    ///
    /// Rows are visited in insertion order before sorting, so equal keys land in insertion
    /// order. On error the model is left unchanged.
    pub fn filter(&mut self, column: Option<&str>, query: Option<&str>) -> Result<()> {
        let filter = FilterSpec::new(column, query);
        let mut passing = Vec::with_capacity(self.elements.len());
        for entry in self.elements.values() {
            if filter.matches(&*entry.item)? {
                passing.push(entry.clone());
            }
        }
        passing.sort_unstable_by_key(|e| e.order);

        self.transform = OrderedSequence::from_vec(passing, Arc::clone(self.transform.compare_fn()))?;
        idebug!(
            column = ?filter.column,
            len = self.transform.len(),
            "Model::filter"
        );
        self.filter = filter;
        Ok(())
    }
}

impl<T: Record> core::fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Model")
            .field("len", &self.transform.len())
            .field("stored", &self.elements.len())
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
