use serde::{Deserialize, Serialize};

/// Items per page assumed when upstream omits pagination.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 24;

/// Pagination metadata of a movie list.
///
/// Values are taken from upstream as-is; `total_pages` is never recomputed
/// from `total_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_items: u64,
    pub items_per_page: u32,
    /// 1-indexed.
    pub current_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// The single-page default substituted for a missing upstream fragment.
    pub fn fallback(requested_page: u32) -> Self {
        Self {
            total_items: 0,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            current_page: requested_page.max(1),
            total_pages: 1,
        }
    }

    /// Whether a pager should be shown at all.
    pub fn is_paged(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev().then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.current_page + 1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::fallback(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_single_page() {
        let p = Pagination::fallback(3);
        assert_eq!(p.current_page, 3);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.total_items, 0);
        assert_eq!(p.items_per_page, 24);
        assert!(!p.is_paged());
    }

    #[test]
    fn test_fallback_clamps_zero_to_first_page() {
        assert_eq!(Pagination::fallback(0).current_page, 1);
    }

    #[test]
    fn test_navigation_bounds() {
        let first = Pagination {
            total_items: 100,
            items_per_page: 24,
            current_page: 1,
            total_pages: 5,
        };
        assert_eq!(first.prev_page(), None);
        assert_eq!(first.next_page(), Some(2));

        let last = Pagination {
            current_page: 5,
            ..first
        };
        assert_eq!(last.prev_page(), Some(4));
        assert_eq!(last.next_page(), None);
    }
}
