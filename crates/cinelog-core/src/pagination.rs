//! Page arithmetic for listing views. Pages are 1-based throughout.

use std::ops::RangeInclusive;

/// Movie and TV grids show this many titles per page
pub const PAGE_SIZE: usize = 28;

/// TMDB refuses search pages past this point
pub const MAX_SEARCH_PAGES: u32 = 20;

const WINDOW: u32 = 5;

/// The page numbers to render as buttons: at most five contiguous pages,
/// centered on `current` once there are more than five in total.
///
/// `current` is clamped into `[1, total]`; a zero total gives an empty window.
pub fn page_window(current: u32, total: u32) -> RangeInclusive<u32> {
    if total == 0 {
        return 1..=0;
    }
    if total <= WINDOW {
        return 1..=total;
    }

    let current = current.clamp(1, total);
    if current <= 3 {
        1..=WINDOW
    } else if current >= total - 1 {
        (total - WINDOW + 1)..=total
    } else {
        (current - 2)..=(current + 2)
    }
}

pub fn total_pages(len: usize, per_page: usize) -> u32 {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page) as u32
}

/// Slice out one page of `items`; out-of-range pages are empty
pub fn paginate<T>(items: &[T], page: u32, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page as usize - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

pub fn prev_page(current: u32) -> Option<u32> {
    (current > 1).then(|| current - 1)
}

pub fn next_page(current: u32, total: u32) -> Option<u32> {
    (current < total).then(|| current + 1)
}
