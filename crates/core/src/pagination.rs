//! Page arithmetic for paginated listings.
//!
//! Pages are 1-based. A page past the end is not an error; it simply holds
//! no rows.

/// Number of listings shown per page.
pub const PAGE_SIZE: u32 = 12;

/// Parse a `page` query value.
///
/// Leading digits are used (`"2abc"` is page 2); anything without leading
/// digits, or a page of zero, falls back to page 1. Numbers too large for a
/// `u32` saturate, so they land past the last page rather than on the first.
#[must_use]
pub fn parse_page(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return 1;
    }

    match digits.parse::<u32>() {
        Ok(0) => 1,
        Ok(page) => page,
        Err(_) => u32::MAX,
    }
}

/// Number of rows to skip to reach `page`.
#[must_use]
pub const fn offset(page: u32) -> u64 {
    (page.saturating_sub(1) as u64) * PAGE_SIZE as u64
}

/// Number of pages needed for `total` rows. Zero rows means zero pages.
#[must_use]
pub const fn total_pages(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE as u64)
}

/// An entry in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A numbered page.
    Page(u64),
    /// Elided run of pages.
    Gap,
}

/// Pages to show in a pagination control.
///
/// Always includes the first page, the pages adjacent to `current`, and the
/// last page, with a [`PageLink::Gap`] standing in for anything skipped.
#[must_use]
pub fn page_window(current: u64, total: u64) -> Vec<PageLink> {
    let mut links = vec![PageLink::Page(1)];

    if current > 3 {
        links.push(PageLink::Gap);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total.saturating_sub(1));
    links.extend((start..=end).map(PageLink::Page));

    if current + 2 < total {
        links.push(PageLink::Gap);
    }

    if total > 1 {
        links.push(PageLink::Page(total));
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Gap, Page};

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page("3"), 3);
        assert_eq!(parse_page(" 2 "), 2);
        assert_eq!(parse_page("2abc"), 2);
        assert_eq!(parse_page("abc"), 1);
        assert_eq!(parse_page(""), 1);
        assert_eq!(parse_page("0"), 1);
        assert_eq!(parse_page("-4"), 1);
        assert_eq!(parse_page("000"), 1);
    }

    #[test]
    fn test_parse_page_saturates_huge_numbers() {
        assert_eq!(parse_page("99999999999"), u32::MAX);
        assert_eq!(parse_page("4294967296x"), u32::MAX);
        assert!(offset(parse_page("99999999999")) > u64::from(PAGE_SIZE) * 1_000_000);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1), 0);
        assert_eq!(offset(2), 12);
        assert_eq!(offset(0), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(12), 1);
        assert_eq!(total_pages(15), 2);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn test_window_small() {
        assert_eq!(page_window(1, 1), vec![Page(1)]);
        assert_eq!(page_window(1, 2), vec![Page(1), Page(2)]);
        assert_eq!(page_window(2, 3), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn test_window_gaps_both_sides() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]
        );
    }

    #[test]
    fn test_window_near_start() {
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Gap, Page(10)]
        );
    }

    #[test]
    fn test_window_near_end() {
        assert_eq!(
            page_window(10, 10),
            vec![Page(1), Gap, Page(9), Page(10)]
        );
    }
}
