// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared pagination window type for feeds and search results.

/// One page of an ordered listing, plus the totals needed to decide
/// whether next/previous pages exist.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number
    pub page: u32,
    pub per_page: u32,
    /// Total number of items across all pages
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: i64) -> Self {
        Self {
            items,
            page,
            per_page,
            total,
        }
    }

    /// A page past the end has no next link, only the items it lacks.
    pub fn has_next(&self) -> bool {
        i64::from(self.page) * i64::from(self.per_page) < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev().then(|| self.page - 1)
    }
}

/// OFFSET for a 1-indexed page. Callers validate `page >= 1` first.
pub fn offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page_has_both_links() {
        let page = Page::new(vec![0u8; 10], 2, 10, 25);
        assert!(page.has_next());
        assert!(page.has_prev());
        assert_eq!(page.next_page(), Some(3));
        assert_eq!(page.prev_page(), Some(1));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = Page::new(vec![0u8; 5], 3, 10, 25);
        assert!(!page.has_next());
        assert_eq!(page.next_page(), None);
        assert_eq!(page.prev_page(), Some(2));
    }

    #[test]
    fn test_page_beyond_end_is_empty_with_no_next() {
        let page: Page<u8> = Page::new(vec![], 9, 10, 25);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
        // prev is purely positional
        assert!(page.has_prev());
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let page = Page::new(vec![0u8; 10], 1, 10, 25);
        assert_eq!(page.prev_page(), None);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(3, 10), 20);
        // saturates instead of underflowing on a zero page
        assert_eq!(offset(0, 10), 0);
    }
}
