//! Pagination envelope for bounded views over larger collections.

use serde::{Deserialize, Serialize};

/// A bounded, ordered slice of a larger filtered collection, plus the
/// metadata a pager needs to render navigation.
///
/// `selected_page` is 0-based. An empty collection has `total_pages == 0`
/// and an empty `items` slice; an out-of-range `selected_page` simply
/// carries an empty slice rather than being an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on the selected page, in caller-established order.
    pub items: Vec<T>,
    /// Total number of pages in the filtered collection.
    pub total_pages: usize,
    /// The 0-based index of this page.
    pub selected_page: usize,
}

impl<T> Page<T> {
    /// An empty page with no pagination metadata.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
            selected_page: 0,
        }
    }

    /// `true` if this page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
