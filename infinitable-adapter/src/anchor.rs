use core::fmt;

use infinitable::{CellHost, Record, Table};

/// A scroll position expressed relative to a row id instead of an index.
///
/// Sorting or filtering moves rows to new indexes; re-applying an anchor scrolls so the anchored
/// row sits at the same distance from the top of the viewport as before.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor<K> {
    pub id: K,
    /// Distance from the anchored row's start to the scroll offset.
    pub offset_in_viewport: u64,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("id", &self.id)
            .field("offset_in_viewport", &self.offset_in_viewport)
            .finish()
    }
}

/// Captures an anchor on the row under the top edge of the viewport.
///
/// Returns `None` for an empty view, a zero cell height, or a scroll offset past the last row.
pub fn capture_first_visible_anchor<T, H>(table: &Table<T, H>) -> Option<ScrollAnchor<T::Id>>
where
    T: Record,
    H: CellHost<T>,
{
    let cell = u64::from(table.cache().cell_height());
    if cell == 0 {
        return None;
    }
    let offset = table.cache().scroll_offset();
    let index = usize::try_from(offset / cell).ok()?;
    let row = table.model().get(index)?;
    Some(ScrollAnchor {
        id: row.id(),
        offset_in_viewport: offset % cell,
    })
}

/// Scrolls so the anchored row is back at its captured distance from the top.
///
/// The target offset is clamped to the scrollable extent. Returns `Ok(false)` (and leaves the
/// scroll offset alone) when the row is no longer in the view.
pub fn apply_anchor<T, H>(
    table: &mut Table<T, H>,
    anchor: &ScrollAnchor<T::Id>,
) -> infinitable::Result<bool>
where
    T: Record,
    H: CellHost<T>,
{
    let Some(index) = table.model().position_of(&anchor.id)? else {
        return Ok(false);
    };
    let cell = u64::from(table.cache().cell_height());
    let target = (index as u64)
        .saturating_mul(cell)
        .saturating_add(anchor.offset_in_viewport)
        .min(table.max_scroll_offset());
    table.apply_scroll_offset(target);
    Ok(true)
}
