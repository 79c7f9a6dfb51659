use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Window into the result set requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Parses raw `page`/`limit` values, defaulting to page 1 of 10 items.
    /// Anything that is not a positive integer is rejected.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            page: parse_positive(page, 1, "page")?,
            limit: parse_positive(limit, 10, "limit")?,
        })
    }

    pub fn offset(&self) -> u64 {
        // Saturates; a window past the end of the set reads as an empty page.
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(raw: Option<&str>, default: u64, field: &str) -> AppResult<u64> {
    let Some(text) = raw else {
        return Ok(default);
    };

    let value: u64 = text
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a positive number", field)))?;
    if value < 1 {
        return Err(AppError::Validation(format!(
            "{} must be a positive number",
            field
        )));
    }
    Ok(value)
}

/// Page metadata included in the search envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_pages: u64,
    pub current_page: u64,
    pub page_items: u64,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl Pagination {
    /// Metadata for a window over `total_items` records, of which `page_items`
    /// were actually returned on this page.
    pub fn build(window: PageWindow, total_items: u64, page_items: usize) -> Self {
        let total_pages = total_items.div_ceil(window.limit);
        Self {
            total_pages,
            current_page: window.page,
            page_items: page_items as u64,
            next_page: (window.page < total_pages).then(|| window.page + 1),
            prev_page: (window.page > 1).then(|| window.page - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_and_offset() {
        let window = PageWindow::from_raw(None, None).unwrap();
        assert_eq!(window, PageWindow { page: 1, limit: 10 });
        assert_eq!(window.offset(), 0);

        let window = PageWindow::from_raw(Some("3"), Some("10")).unwrap();
        assert_eq!(window.offset(), 20);
    }

    #[test]
    fn test_window_rejects_non_numeric_and_zero() {
        assert!(PageWindow::from_raw(Some("abc"), None).is_err());
        assert!(PageWindow::from_raw(None, Some("-1")).is_err());
        assert!(PageWindow::from_raw(Some("0"), None).is_err());
    }

    #[test]
    fn test_offset_saturates_at_the_integer_limit() {
        let window = PageWindow::from_raw(Some("18446744073709551615"), Some("2")).unwrap();
        assert_eq!(window.offset(), u64::MAX);
    }

    #[test]
    fn test_last_page_metadata() {
        let window = PageWindow { page: 3, limit: 10 };
        let pagination = Pagination::build(window, 25, 5);

        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.page_items, 5);
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.prev_page, Some(2));
    }

    #[test]
    fn test_first_page_metadata() {
        let window = PageWindow { page: 1, limit: 10 };
        let pagination = Pagination::build(window, 25, 10);

        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.next_page, Some(2));
        assert_eq!(pagination.prev_page, None);
    }

    #[test]
    fn test_empty_result_metadata() {
        let window = PageWindow { page: 1, limit: 10 };
        let pagination = Pagination::build(window, 0, 0);

        assert_eq!(pagination.total_pages, 0);
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.prev_page, None);
    }
}
