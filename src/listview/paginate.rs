// src/listview/paginate.rs

/// Largest page a list view will show or request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Sizes offered in the page-size picker.
pub const PAGE_SIZES: &[usize] = &[10, 25, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    /// Clamps size into `1..=MAX_PAGE_SIZE` and page to at least 1.
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Pulls the page back inside `1..=total_pages`.
    pub fn clamp_to(self, total_pages: usize) -> Self {
        Self {
            page: self.page.clamp(1, total_pages.max(1)),
            ..self
        }
    }

    /// Items before this page. Saturates, since `page` comes straight from
    /// the query string.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

/// Number of pages needed for `total` items; an empty list still has one page.
pub fn total_pages(total: usize, size: usize) -> usize {
    total.div_ceil(size.max(1)).max(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Client-side slicing of the full filtered sequence.
    pub fn slice(items: Vec<T>, req: PageRequest) -> Self {
        let total = items.len();
        let pages = total_pages(total, req.size);
        let req = req.clamp_to(pages);

        let items = items
            .into_iter()
            .skip(req.offset())
            .take(req.size)
            .collect();

        Self {
            items,
            page: req.page,
            size: req.size,
            total,
            total_pages: pages,
        }
    }

    /// A page the server already cut. Totals are the server's, falling back
    /// to what arrived when the envelope didn't carry any.
    pub fn from_server(
        mut items: Vec<T>,
        req: PageRequest,
        total: Option<usize>,
        pages: Option<usize>,
    ) -> Self {
        items.truncate(req.size);
        let total = total.unwrap_or_else(|| req.offset().saturating_add(items.len()));
        let pages = pages
            .filter(|p| *p > 0)
            .unwrap_or_else(|| total_pages(total, req.size));

        Self {
            items,
            page: req.page.min(pages),
            size: req.size,
            total,
            total_pages: pages,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based index of the first item shown, 0 when empty.
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.page
                .saturating_sub(1)
                .saturating_mul(self.size)
                .saturating_add(1)
        }
    }

    pub fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index().saturating_add(self.items.len() - 1)
        }
    }
}
