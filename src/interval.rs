use core::ops::Range;

/// A half-open index range `[min, max)`.
///
/// Bounds are signed so intermediate results (the `-1` bias of the window computation, or an
/// `expand` by a negative amount) can leave the index space before being clipped back into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub min: i64,
    pub max: i64, // exclusive
}

impl Interval {
    pub const EMPTY: Self = Self { min: 0, max: 0 };

    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// `[0, count)`.
    pub fn bounds(count: usize) -> Self {
        Self::new(0, i64::try_from(count).unwrap_or(i64::MAX))
    }

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    pub fn len(&self) -> usize {
        usize::try_from(self.max.saturating_sub(self.min)).unwrap_or(0)
    }

    /// Widens both ends by `n`.
    pub fn expand(&mut self, n: i64) {
        self.min = self.min.saturating_sub(n);
        self.max = self.max.saturating_add(n);
    }

    /// Intersects with `bounds`. A disjoint (or inverted) result collapses to [`Self::EMPTY`].
    pub fn clip(&mut self, bounds: Interval) {
        if self.max <= bounds.min || self.min >= bounds.max || self.is_empty() {
            *self = Self::EMPTY;
            return;
        }
        self.min = self.min.max(bounds.min);
        self.max = self.max.min(bounds.max);
    }

    pub fn contains(&self, i: i64) -> bool {
        i >= self.min && i < self.max
    }

    pub fn contains_index(&self, index: usize) -> bool {
        i64::try_from(index).is_ok_and(|i| self.contains(i))
    }

    pub fn iter(&self) -> Range<i64> {
        self.min..self.max.max(self.min)
    }

    /// Calls `f` for each index in ascending order.
    pub fn each(&self, mut f: impl FnMut(i64)) {
        for i in self.iter() {
            f(i);
        }
    }

    /// The non-negative part of the interval as `usize` indexes.
    pub fn indices(&self) -> Range<usize> {
        let start = usize::try_from(self.min.max(0)).unwrap_or(usize::MAX);
        let end = usize::try_from(self.max.max(0)).unwrap_or(usize::MAX);
        start..end.max(start)
    }

    /// Computes the window of indexes that must have live cells.
    ///
    /// The strictly visible rows are `[offset / cell - 1, (offset + viewport - 1) / cell]`
    /// (floored), biased to over-include the row straddling the top edge. The range is then
    /// padded by `buffer` on both sides and clipped to `[0, count)`.
    ///
    /// A zero `cell_height` yields [`Self::EMPTY`].
    pub fn visible(
        scroll_offset: u64,
        viewport_size: u32,
        cell_height: u32,
        buffer: usize,
        count: usize,
    ) -> Self {
        if cell_height == 0 {
            iwarn!("Interval::visible: cell_height is zero");
            return Self::EMPTY;
        }
        let cell = i64::from(cell_height);
        let offset = i64::try_from(scroll_offset).unwrap_or(i64::MAX);
        let bottom = offset
            .saturating_add(i64::from(viewport_size))
            .saturating_sub(1);

        let mut visible = Self::new(
            offset.div_euclid(cell) - 1,
            bottom.div_euclid(cell),
        );
        visible.expand(i64::try_from(buffer).unwrap_or(i64::MAX));
        visible.clip(Self::bounds(count));
        visible
    }
}

impl From<Range<usize>> for Interval {
    fn from(r: Range<usize>) -> Self {
        Self::new(
            i64::try_from(r.start).unwrap_or(i64::MAX),
            i64::try_from(r.end).unwrap_or(i64::MAX),
        )
    }
}
