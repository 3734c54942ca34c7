use std::ops::Range;

/// Rows per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Fixed-size windowing over a view, addressed by 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
}

/// One page of a view together with its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow<'a, T> {
    pub items: &'a [T],
    pub current_page: usize,
    pub total_pages: usize,
    /// Offset of `items[0]` within the whole view
    pub start: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// A page size of 0 is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// The requested page clamped into `[1, total_pages]`
    pub fn effective_page(&self, len: usize) -> usize {
        self.current_page.clamp(1, self.total_pages(len))
    }

    /// Jump to page `n`, clamped; returns the page actually selected
    pub fn set_page(&mut self, n: usize, len: usize) -> usize {
        self.current_page = n.clamp(1, self.total_pages(len));
        self.current_page
    }

    pub fn next(&mut self, len: usize) -> usize {
        let page = self.effective_page(len);
        self.set_page(page.saturating_add(1), len)
    }

    pub fn previous(&mut self, len: usize) -> usize {
        let page = self.effective_page(len);
        self.set_page(page.saturating_sub(1), len)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Index range of the current page within a view of `len` items
    pub fn bounds(&self, len: usize) -> Range<usize> {
        let page = self.effective_page(len);
        let start = ((page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    pub fn window<'a, T>(&self, items: &'a [T]) -> PageWindow<'a, T> {
        let len = items.len();
        let range = self.bounds(len);
        PageWindow {
            start: range.start,
            items: &items[range],
            current_page: self.effective_page(len),
            total_pages: self.total_pages(len),
        }
    }
}
