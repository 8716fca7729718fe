//! Pure filter + slice pagination engine.
//!
//! Works over any ordered sequence of tagged items. The caller establishes
//! ordering (the feed sorts descending by creation time) before calling;
//! this module never re-sorts, performs no I/O, and is deterministic.

use std::num::NonZeroUsize;

use driftwood_core::Page;

/// Filter sentinel meaning "no filtering".
pub const FILTER_ALL: &str = "all";

/// An item that can be filtered by its content-type tag.
pub trait PageItem {
    /// The item's free-form content-type tag, if it carries one.
    fn content_type(&self) -> Option<&str>;
}

/// Filter, then slice an ordered sequence into one page.
///
/// - `filter` absent or equal to [`FILTER_ALL`] keeps everything;
///   otherwise an item survives when its tag is non-empty and contains
///   `filter` as a case-sensitive substring.
/// - `page_index` defaults to 0; an out-of-range index yields an empty
///   slice with the metadata intact rather than an error.
/// - `total_pages` is `ceil(filtered / page_size)`; zero filtered items
///   mean zero pages.
#[must_use]
pub fn paginate<T: PageItem>(
    items: Vec<T>,
    filter: Option<&str>,
    page_index: Option<usize>,
    page_size: NonZeroUsize,
) -> Page<T> {
    let filtered = match filter {
        None | Some(FILTER_ALL) => items,
        Some(tag) => items
            .into_iter()
            .filter(|item| {
                item.content_type()
                    .is_some_and(|ct| !ct.is_empty() && ct.contains(tag))
            })
            .collect(),
    };

    let size = page_size.get();
    let total_pages = filtered.len().div_ceil(size);
    let selected_page = page_index.unwrap_or(0);

    let items = filtered
        .into_iter()
        .skip(selected_page.saturating_mul(size))
        .take(size)
        .collect();

    Page {
        items,
        total_pages,
        selected_page,
    }
}
