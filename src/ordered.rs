use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Range;

use crate::{Error, Result};

/// A comparator over two elements.
///
/// Returning `None` means the pair cannot be ordered; every operation that hits such a pair
/// fails with [`Error::UnstableComparison`]. Comparators must be pure: the same pair must always
/// produce the same answer.
///
/// Comparator identity (used by [`OrderedSequence::sort`]) is `Arc::ptr_eq`.
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Option<Ordering> + Send + Sync>;

/// A sequence kept sorted under a comparator.
///
/// Invariant: for every adjacent pair `(a, b)`, `compare(a, b)` is `Less` or `Equal`.
///
/// Elements comparing `Equal` may appear in any relative order: the binary search stops at the
/// first equal element it probes, so ties are not placed deterministically. Comparators that need
/// a stable order among equal keys must break ties with a unique secondary key.
pub struct OrderedSequence<T> {
    elements: Vec<T>,
    compare: CompareFn<T>,
}

impl<T> OrderedSequence<T> {
    /// Creates an empty sequence.
    pub fn new(compare: CompareFn<T>) -> Self {
        Self {
            elements: Vec::new(),
            compare,
        }
    }

    /// Creates a sequence from a vector.
    ///
    /// An already sorted vector is adopted as is; otherwise it is stably sorted.
    ///
    /// An un-orderable adjacent pair in the input fails with `UnstableComparison` carrying the
    /// input index of the pair's second element. A failure that only surfaces while sorting has
    /// no meaningful input position and reports index 0.
    pub fn from_vec(mut elements: Vec<T>, compare: CompareFn<T>) -> Result<Self> {
        if !is_sorted_by(&elements, &compare)? {
            let mut failure = None;
            elements.sort_by(|a, b| match compare(a, b) {
                Some(ord) => ord,
                None => {
                    failure = Some(Error::UnstableComparison { index: 0 });
                    Ordering::Equal
                }
            });
            if let Some(err) = failure {
                return Err(err);
            }
        }
        Ok(Self { elements, compare })
    }

    /// Adopts a vector the caller guarantees is sorted under `compare`.
    pub(crate) fn from_sorted(elements: Vec<T>, compare: CompareFn<T>) -> Self {
        Self { elements, compare }
    }

    pub fn compare_fn(&self) -> &CompareFn<T> {
        &self.compare
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }

    /// Checks the sortedness invariant.
    pub fn is_sorted(&self) -> Result<bool> {
        is_sorted_by(&self.elements, &self.compare)
    }

    fn cmp_at(&self, x: &T, index: usize) -> Result<Ordering> {
        (self.compare)(x, &self.elements[index]).ok_or(Error::UnstableComparison { index })
    }

    /// Returns the insertion point for `x` over the whole sequence.
    ///
    /// Every element before the returned index orders before `x` and every element from it on
    /// orders at or after `x`. When the search probes an element equal to `x` it stops there.
    pub fn find_index(&self, x: &T) -> Result<usize> {
        self.find_index_in(x, 0..self.elements.len())
    }

    /// Same as [`Self::find_index`], restricted to `range` (clamped to the sequence).
    pub fn find_index_in(&self, x: &T, range: Range<usize>) -> Result<usize> {
        let end = range.end.min(self.elements.len());
        let mut lo = range.start.min(end);
        let mut hi = end;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.cmp_at(x, mid)? {
                Ordering::Equal => return Ok(mid),
                Ordering::Less => hi = mid,
                Ordering::Greater => lo = mid + 1,
            }
        }
        Ok(lo)
    }

    /// Inserts `x` at its sorted position and returns that position.
    pub fn push(&mut self, x: T) -> Result<usize> {
        let index = self.find_index(&x)?;
        self.elements.insert(index, x);
        Ok(index)
    }

    /// Merges a run that is already sorted under this sequence's comparator.
    ///
    /// The run is validated up front; an unsorted run fails with [`Error::UnsortedInput`] and
    /// leaves the sequence untouched. Each run element is then placed by a binary search bounded
    /// by the positions of the run's first and last element.
    pub fn insert(&mut self, run: Vec<T>) -> Result<()> {
        for (i, pair) in run.windows(2).enumerate() {
            match (self.compare)(&pair[0], &pair[1]) {
                Some(Ordering::Greater) => return Err(Error::UnsortedInput { index: i + 1 }),
                Some(_) => {}
                None => return Err(Error::UnstableComparison { index: i + 1 }),
            }
        }

        let (Some(first), Some(last)) = (run.first(), run.last()) else {
            return Ok(());
        };
        let start = self.find_index(first)?;
        let mut end = if run.len() > 1 {
            self.find_index(last)?.saturating_add(1).min(self.elements.len())
        } else {
            start
        };

        self.elements.reserve(run.len());
        for x in run {
            let index = self.find_index_in(&x, start..end)?;
            self.elements.insert(index, x);
            end += 1;
        }
        Ok(())
    }

    /// Removes the element at `index` and re-inserts `x` at its sorted position.
    ///
    /// Returns the new position, which may differ from `index`. On error the sequence is
    /// unchanged.
    pub fn set(&mut self, index: usize, x: T) -> Result<usize> {
        let len = self.elements.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        let old = self.elements.remove(index);
        match self.find_index(&x) {
            Ok(to) => {
                self.elements.insert(to, x);
                Ok(to)
            }
            Err(err) => {
                self.restore(index, old);
                Err(err)
            }
        }
    }

    /// Puts back an element at the position it was just removed from.
    pub(crate) fn restore(&mut self, index: usize, x: T) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, x);
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    pub fn pop(&mut self) -> Option<T> {
        self.elements.pop()
    }

    pub fn shift(&mut self) -> Option<T> {
        self.remove(0)
    }

    /// Finds `x` by identity (`eq`) among the elements comparing equal to it.
    ///
    /// Only succeeds when `x` orders the same way it did when it was inserted.
    pub fn index_of_by(&self, x: &T, mut eq: impl FnMut(&T, &T) -> bool) -> Result<Option<usize>> {
        let hit = self.find_index(x)?;
        if hit >= self.elements.len() {
            return Ok(None);
        }
        if eq(&self.elements[hit], x) {
            return Ok(Some(hit));
        }

        let mut i = hit;
        while i > 0 && self.cmp_at(x, i - 1)? == Ordering::Equal {
            i -= 1;
            if eq(&self.elements[i], x) {
                return Ok(Some(i));
            }
        }
        let mut j = hit + 1;
        while j < self.elements.len() && self.cmp_at(x, j)? == Ordering::Equal {
            if eq(&self.elements[j], x) {
                return Ok(Some(j));
            }
            j += 1;
        }
        Ok(None)
    }

    pub fn index_of(&self, x: &T) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        self.index_of_by(x, |a, b| a == b)
    }

    /// Re-derives the sequence under `compare`.
    ///
    /// The same comparator (by identity) yields a copy; a different one rebuilds, adopting the
    /// current order when it already satisfies the new comparator.
    pub fn sort(&self, compare: CompareFn<T>) -> Result<Self>
    where
        T: Clone,
    {
        if Arc::ptr_eq(&self.compare, &compare) {
            return Ok(self.clone());
        }
        Self::from_vec(self.elements.clone(), compare)
    }

    /// Keeps the elements matching `pred`; order is preserved so no re-sort happens.
    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> Self
    where
        T: Clone,
    {
        let elements = self.elements.iter().filter(|x| pred(x)).cloned().collect();
        Self::from_sorted(elements, Arc::clone(&self.compare))
    }

    /// Maps every element and re-sorts the result under the same comparator.
    pub fn map(&self, f: impl FnMut(&T) -> T) -> Result<Self> {
        let elements = self.elements.iter().map(f).collect();
        Self::from_vec(elements, Arc::clone(&self.compare))
    }

    pub fn slice(&self, range: Range<usize>) -> Self
    where
        T: Clone,
    {
        let end = range.end.min(self.elements.len());
        let start = range.start.min(end);
        Self::from_sorted(self.elements[start..end].to_vec(), Arc::clone(&self.compare))
    }
}

impl<T: Clone> Clone for OrderedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for OrderedSequence<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderedSequence")
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSequence<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Checks every adjacent pair, so an un-orderable pair is reported even after an inversion.
fn is_sorted_by<T>(elements: &[T], compare: &CompareFn<T>) -> Result<bool> {
    let mut sorted = true;
    for (i, pair) in elements.windows(2).enumerate() {
        match compare(&pair[0], &pair[1]) {
            Some(Ordering::Greater) => sorted = false,
            Some(_) => {}
            None => return Err(Error::UnstableComparison { index: i + 1 }),
        }
    }
    Ok(sorted)
}
