use mika_core::models::Pagination;

/// Pager line, or `None` when there is only one page.
pub fn pagination(p: &Pagination) -> Option<String> {
    if !p.is_paged() {
        return None;
    }
    let prev = match p.prev_page() {
        Some(page) => format!("« Trước (--page {page})"),
        None => "« Trước".to_string(),
    };
    let next = match p.next_page() {
        Some(page) => format!("Sau (--page {page}) »"),
        None => "Sau »".to_string(),
    };
    Some(format!(
        "{prev} | Trang {} / {} | {next}",
        p.current_page, p.total_pages
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current: u32, total: u32) -> Pagination {
        Pagination {
            total_items: u64::from(total) * 24,
            items_per_page: 24,
            current_page: current,
            total_pages: total,
        }
    }

    #[test]
    fn test_single_page_hides_pager() {
        assert_eq!(pagination(&Pagination::fallback(1)), None);
    }

    #[test]
    fn test_middle_page_links_both_ways() {
        assert_eq!(
            pagination(&page(2, 5)).unwrap(),
            "« Trước (--page 1) | Trang 2 / 5 | Sau (--page 3) »"
        );
    }

    #[test]
    fn test_edges_disable_links() {
        assert_eq!(
            pagination(&page(1, 3)).unwrap(),
            "« Trước | Trang 1 / 3 | Sau (--page 2) »"
        );
        assert_eq!(
            pagination(&page(3, 3)).unwrap(),
            "« Trước (--page 2) | Trang 3 / 3 | Sau »"
        );
    }
}
