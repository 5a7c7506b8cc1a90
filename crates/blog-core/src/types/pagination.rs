//! Search parameters and page-window math for list endpoints.

use serde::{Deserialize, Serialize};

/// Default number of records per page.
const DEFAULT_RECORD_SIZE: i64 = 10;
/// Default number of page links shown in one window.
const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on records per page.
const MAX_RECORD_SIZE: i64 = 100;

/// Which post field a keyword is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Match the title.
    Title,
    /// Match the body.
    Content,
    /// Match the writer's nickname.
    Writer,
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Current page (1-based).
    #[serde(default = "default_page")]
    pub page: i64,
    /// Records per page.
    #[serde(default = "default_record_size")]
    pub record_size: i64,
    /// Page links per window.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Search keyword.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Field the keyword applies to; `None` matches title or content.
    #[serde(default)]
    pub search_type: Option<SearchType>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            record_size: default_record_size(),
            page_size: default_page_size(),
            keyword: None,
            search_type: None,
        }
    }
}

impl SearchParams {
    /// Clamp out-of-range values supplied by the client.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.record_size = self.record_size.clamp(1, MAX_RECORD_SIZE);
        self.page_size = self.page_size.max(1);
        self.keyword = self
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    /// The keyword wrapped for a SQL `LIKE` match, if any.
    pub fn like_pattern(&self) -> Option<String> {
        self.keyword.as_ref().map(|k| format!("%{k}%"))
    }
}

/// Page-window information returned alongside a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total matching records.
    pub total_record_count: i64,
    /// Total number of pages.
    pub total_page_count: i64,
    /// First page number in the current window.
    pub start_page: i64,
    /// Last page number in the current window.
    pub end_page: i64,
    /// SQL offset of the first record on the current page.
    pub limit_start: i64,
    /// Whether a window precedes this one.
    pub exist_prev_page: bool,
    /// Whether records exist past this window.
    pub exist_next_page: bool,
}

impl Pagination {
    /// Compute the window for `total` records.
    ///
    /// A page past the end is clamped to the last page, and the clamped value
    /// is written back into `params` so the subsequent query uses it.
    pub fn new(total: i64, params: &mut SearchParams) -> Self {
        let total_page_count = ((total - 1) / params.record_size) + 1;
        if params.page > total_page_count {
            params.page = total_page_count;
        }

        let start_page = ((params.page - 1) / params.page_size) * params.page_size + 1;
        let end_page = (start_page + params.page_size - 1).min(total_page_count);

        Self {
            total_record_count: total,
            total_page_count,
            start_page,
            end_page,
            limit_start: (params.page - 1) * params.record_size,
            exist_prev_page: start_page != 1,
            exist_next_page: end_page * params.record_size < total,
        }
    }
}

/// A list plus its page window. An empty result carries no window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Items on the current page.
    pub list: Vec<T>,
    /// Page window, absent when nothing matched.
    pub pagination: Option<Pagination>,
}

impl<T> PageResult<T> {
    /// A result with no items and no window.
    pub fn empty() -> Self {
        Self {
            list: Vec::new(),
            pagination: None,
        }
    }

    /// Map every item, keeping the window.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            list: self.list.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_record_size() -> i64 {
    DEFAULT_RECORD_SIZE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, record_size: i64, page_size: i64) -> SearchParams {
        SearchParams {
            page,
            record_size,
            page_size,
            ..SearchParams::default()
        }
    }

    #[test]
    fn test_first_window() {
        let mut p = params(1, 10, 10);
        let pg = Pagination::new(95, &mut p);
        assert_eq!(pg.total_page_count, 10);
        assert_eq!((pg.start_page, pg.end_page), (1, 10));
        assert_eq!(pg.limit_start, 0);
        assert!(!pg.exist_prev_page);
        assert!(!pg.exist_next_page);
    }

    #[test]
    fn test_second_window_has_prev() {
        let mut p = params(12, 10, 10);
        let pg = Pagination::new(250, &mut p);
        assert_eq!(pg.total_page_count, 25);
        assert_eq!((pg.start_page, pg.end_page), (11, 20));
        assert_eq!(pg.limit_start, 110);
        assert!(pg.exist_prev_page);
        assert!(pg.exist_next_page);
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let mut p = params(9, 10, 10);
        let pg = Pagination::new(21, &mut p);
        assert_eq!(p.page, 3);
        assert_eq!(pg.limit_start, 20);
        assert_eq!(pg.end_page, 3);
    }

    #[test]
    fn test_normalized_rejects_bad_input() {
        let p = SearchParams {
            page: -3,
            record_size: 0,
            page_size: 0,
            keyword: Some("   ".into()),
            search_type: None,
        }
        .normalized();
        assert_eq!(p.page, 1);
        assert_eq!(p.record_size, 1);
        assert_eq!(p.page_size, 1);
        assert!(p.keyword.is_none());
    }

    #[test]
    fn test_query_string_names() {
        let p: SearchParams =
            serde_json::from_str(r#"{"page":2,"recordSize":5,"searchType":"writer"}"#).unwrap();
        assert_eq!(p.record_size, 5);
        assert_eq!(p.page_size, 10);
        assert_eq!(p.search_type, Some(SearchType::Writer));
    }
}
