use serde::Serialize;

use super::types::PageWindow;

/// Slice `[offset, offset + limit)` clipped to the sequence; out-of-range windows are empty
pub fn paginate<T>(sequence: &[T], limit: usize, offset: usize) -> &[T] {
    if limit == 0 || offset >= sequence.len() {
        return &[];
    }
    let end = offset.saturating_add(limit).min(sequence.len());
    &sequence[offset..end]
}

/// `ceil(len / limit)`, zero when the page size is zero
pub fn total_pages(len: usize, limit: usize) -> usize {
    if limit == 0 { 0 } else { len.div_ceil(limit) }
}

/// One rendered page of a list plus the counters pagination controls need
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub offset: usize,
    pub limit: usize,
    pub page: usize,
    pub total_pages: usize,
    pub total_list_size: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total_list_size: usize) -> Self {
        Self {
            items,
            offset: window.offset,
            limit: window.limit,
            page: window.page(),
            total_pages: total_pages(total_list_size, window.limit),
            total_list_size,
            has_next: window.limit > 0 && window.offset.saturating_add(window.limit) < total_list_size,
            has_prev: window.offset > 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListPage<U> {
        ListPage {
            items: self.items.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            total_list_size: self.total_list_size,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}
