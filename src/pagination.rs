pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 4;
pub const MAX_LIMIT: i64 = 100;

/// Window over a paginated listing. Inputs are clamped so `skip` can never
/// go negative and a single page can never request an unbounded number of
/// documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub skip: i64,
    pub total_pages: i64,
}

impl PageWindow {
    pub fn new(total_docs: i64, page: i64, limit: i64) -> Self {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_LIMIT);
        let total_docs = total_docs.max(0);
        let skip = (page - 1) * limit;
        let total_pages = (total_docs + limit - 1) / limit;
        Self {
            page,
            limit,
            skip,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_docs_page_two_limit_four() {
        let w = PageWindow::new(10, 2, 4);
        assert_eq!(w.skip, 4);
        assert_eq!(w.limit, 4);
        assert_eq!(w.total_pages, 3);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let w = PageWindow::new(8, 1, 4);
        assert_eq!(w.total_pages, 2);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let w = PageWindow::new(0, 1, 4);
        assert_eq!(w.skip, 0);
        assert_eq!(w.total_pages, 0);
    }

    #[test]
    fn zero_and_negative_page_clamp_to_first() {
        assert_eq!(PageWindow::new(10, 0, 4).skip, 0);
        assert_eq!(PageWindow::new(10, -3, 4).skip, 0);
    }

    #[test]
    fn limit_is_clamped_to_sane_bounds() {
        let w = PageWindow::new(10, 1, 0);
        assert_eq!(w.limit, 1);
        let w = PageWindow::new(10, 1, 10_000);
        assert_eq!(w.limit, MAX_LIMIT);
    }

    #[test]
    fn negative_total_treated_as_empty() {
        assert_eq!(PageWindow::new(-5, 1, 4).total_pages, 0);
    }
}
